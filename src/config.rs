//! Command-line and environment settings.
//!
//! Everything has a default, so running the binary with no arguments keeps the
//! data in `~/.course-enrollment-manager`.

use std::path::PathBuf;

use clap::Parser;

use crate::store::{default_data_dir, DataPaths};

/// Terminal course-enrollment manager
#[derive(Parser, Debug)]
#[command(name = "course-enrollment-manager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding courses.txt, students.txt and logs/
    #[arg(long, env = "COURSE_MANAGER_DATA_DIR", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Default log filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: DataPaths,
    pub log_filter: String,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Self {
        let root = cli.data_dir.unwrap_or_else(default_data_dir);
        Self {
            paths: DataPaths::new(root),
            log_filter: cli.log_level,
        }
    }

    /// Parse the process arguments and resolve them.
    pub fn load() -> Self {
        Self::from_cli(Cli::parse())
    }
}
