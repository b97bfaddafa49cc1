//! Enrollment kernel split across logical submodules.

mod error;
mod history;
mod ordering;
mod queue;
mod registrar;
mod registry;

pub use error::EngineError;
pub use history::HistoryStack;
pub use ordering::{
    find_by_priority, find_course_by_name, find_student_by_id, is_priority_descending,
    sort_by_priority_desc, SortedCourses,
};
pub use queue::EnrollmentQueue;
pub use registrar::{Processed, Registrar, ShutdownReport, PRIORITY_RANGE};
pub use registry::{Registry, GROWTH_INCREMENT};
