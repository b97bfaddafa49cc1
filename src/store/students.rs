use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use crate::models::Student;

/// Stored student line: `name,id`.
pub type StudentRecord = (String, i64);

/// Read every student record from `path`. Same absence-is-empty rule as the
/// course file.
pub fn load_students(path: &Path) -> Result<Vec<StudentRecord>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "student file not found, starting empty");
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()))
        }
    };

    let mut records = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        match parse_student_line(line) {
            Ok(record) => records.push(record),
            Err(err) => warn!(line = idx + 1, error = %err, "skipping malformed student line"),
        }
    }

    info!(path = %path.display(), count = records.len(), "students loaded");
    Ok(records)
}

pub fn save_students(path: &Path, students: &[Student]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let contents: String = students
        .iter()
        .map(|student| format!("{},{}\n", student.name, student.id))
        .collect();

    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), count = students.len(), "students saved");
    Ok(())
}

pub fn parse_student_line(line: &str) -> Result<StudentRecord> {
    let (name, id) = line
        .split_once(',')
        .ok_or_else(|| anyhow!("expected name,id"))?;
    let id = id.trim().parse::<i64>().context("id must be an integer")?;
    Ok((name.to_string(), id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_format() {
        assert_eq!(parse_student_line("Ana,1").unwrap(), ("Ana".to_string(), 1));
        assert!(parse_student_line("Ana").is_err());
        assert!(parse_student_line("Ana,one").is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.txt");
        let students = vec![
            Student { name: "Ana".into(), id: 1 },
            Student { name: "Bruno Lima".into(), id: 22 },
        ];

        save_students(&path, &students).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Ana,1\nBruno Lima,22\n");
        assert_eq!(
            load_students(&path).unwrap(),
            vec![("Ana".to_string(), 1), ("Bruno Lima".to_string(), 22)]
        );
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_students(&dir.path().join("students.txt"))
            .unwrap()
            .is_empty());
    }
}
