use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
pub const DATA_DIR_NAME: &str = ".course-enrollment-manager";
/// Course catalog file inside the data directory.
pub const COURSES_FILE_NAME: &str = "courses.txt";
/// Student roster file inside the data directory.
pub const STUDENTS_FILE_NAME: &str = "students.txt";
/// Subdirectory for rolling log files.
pub const LOG_DIR_NAME: &str = "logs";

/// Resolve the default data directory inside the user's home. Falls back to
/// the working directory when no home can be located.
pub fn default_data_dir() -> PathBuf {
    match BaseDirs::new() {
        Some(base_dirs) => base_dirs.home_dir().join(DATA_DIR_NAME),
        None => PathBuf::from(DATA_DIR_NAME),
    }
}

/// Where every file of one data directory lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,
    pub courses: PathBuf,
    pub students: PathBuf,
    pub logs: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            courses: root.join(COURSES_FILE_NAME),
            students: root.join(STUDENTS_FILE_NAME),
            logs: root.join(LOG_DIR_NAME),
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_sit_under_the_root() {
        let paths = DataPaths::new("/tmp/enrollment");
        assert_eq!(paths.courses, Path::new("/tmp/enrollment/courses.txt"));
        assert_eq!(paths.students, Path::new("/tmp/enrollment/students.txt"));
        assert_eq!(paths.logs, Path::new("/tmp/enrollment/logs"));
    }

    #[test]
    fn default_dir_ends_with_app_folder() {
        assert!(default_data_dir().ends_with(DATA_DIR_NAME));
    }
}
