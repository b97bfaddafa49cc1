//! Ratatui front-end: a command menu over the enrollment kernel plus live
//! views of the catalog, roster, pending queue and history.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::{App, MenuItem};
pub use terminal::run_app;
