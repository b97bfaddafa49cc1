use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use crate::models::Course;

/// Stored course line: `name,duration,priority`.
pub type CourseRecord = (String, u32, i32);

/// Read every course record from `path`. A missing file means an empty
/// catalog; lines that do not parse are skipped with a warning.
pub fn load_courses(path: &Path) -> Result<Vec<CourseRecord>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "course file not found, starting empty");
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
        match parse_course_line(line) {
            Ok(record) => records.push(record),
            Err(err) => warn!(line = idx + 1, error = %err, "skipping malformed course line"),
        }
    }

    info!(path = %path.display(), count = records.len(), "courses loaded");
    Ok(records)
}

/// Overwrite `path` with one line per course, in current catalog order.
pub fn save_courses(path: &Path, courses: &[Course]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let mut contents = String::new();
    for course in courses {
        contents.push_str(&format_course_line(course));
        contents.push('\n');
    }

    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), count = courses.len(), "courses saved");
    Ok(())
}

pub fn format_course_line(course: &Course) -> String {
    format!("{},{},{}", course.name, course.duration, course.priority)
}

/// Split on the first comma for the name, then parse the two integers.
pub fn parse_course_line(line: &str) -> Result<CourseRecord> {
    let (name, rest) = line
        .split_once(',')
        .ok_or_else(|| anyhow!("expected name,duration,priority"))?;
    let (duration, priority) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("missing priority field"))?;

    let duration = duration
        .trim()
        .parse::<u32>()
        .context("duration must be a non-negative integer")?;
    let priority = priority
        .trim()
        .parse::<i32>()
        .context("priority must be an integer")?;

    Ok((name.to_string(), duration, priority))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CourseId;

    fn course(name: &str, duration: u32, priority: i32) -> Course {
        Course {
            id: CourseId(0),
            name: name.to_string(),
            duration,
            priority,
        }
    }

    #[test]
    fn parses_record_format() {
        assert_eq!(
            parse_course_line("CS101,40,8").unwrap(),
            ("CS101".to_string(), 40, 8)
        );
        assert_eq!(format_course_line(&course("CS101", 40, 8)), "CS101,40,8");
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_course_line("CS101").is_err());
        assert!(parse_course_line("CS101,40").is_err());
        assert!(parse_course_line("CS101,forty,8").is_err());
        assert!(parse_course_line("CS101,40,8,extra").is_err());
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let records = load_courses(&dir.path().join("courses.txt")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("courses.txt");
        let courses = vec![
            course("CS101", 40, 8),
            course("MATH1", 30, 5),
            course("ART2", 20, 9),
        ];

        save_courses(&path, &courses).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "CS101,40,8\nMATH1,30,5\nART2,20,9\n"
        );

        let loaded = load_courses(&path).unwrap();
        let expected: Vec<CourseRecord> = courses
            .iter()
            .map(|c| (c.name.clone(), c.duration, c.priority))
            .collect();
        assert_eq!(loaded, expected);
    }

    #[test]
    fn load_skips_blank_and_broken_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.txt");
        fs::write(&path, "CS101,40,8\r\n\nbroken\nART2,20,9\n").unwrap();

        let loaded = load_courses(&path).unwrap();
        assert_eq!(
            loaded,
            vec![("CS101".to_string(), 40, 8), ("ART2".to_string(), 20, 9)]
        );
    }
}
