//! Core library surface for the course enrollment manager.
//!
//! The kernel in `engine` owns the catalog, roster, enrollment queue and
//! action history; `store` reads and writes the flat files; `ui` drives it all
//! from a terminal menu.
pub mod config;
pub mod engine;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// Persistence entry points used by `main.rs` at start-up and exit.
pub use store::{load_registrar, save_registrar, DataPaths};

/// Domain types other layers manipulate.
pub use models::{Course, CourseId, Enrollment, HistoryEntry, Student};

pub use config::Settings;
pub use engine::{EngineError, Registrar};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
