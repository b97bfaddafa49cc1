use thiserror::Error;

/// Everything the enrollment kernel can report back to its caller.
///
/// All variants except [`EngineError::ResourceExhausted`] are recoverable: the
/// operation that produced them left every structure untouched and the UI just
/// shows the message and returns to the menu.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Student with id {0} not found.")]
    StudentNotFound(i64),
    #[error("Course \"{0}\" not found.")]
    CourseNotFound(String),
    #[error("No course with priority {0}.")]
    PriorityNotFound(i32),
    #[error("Enrollment queue is empty.")]
    EmptyQueue,
    #[error("Courses are not sorted by priority. Sort them first.")]
    NotSorted,
    #[error("{0}")]
    InvalidCourse(String),
    #[error("{0}")]
    InvalidStudent(String),
    #[error("Out of memory while growing the {0}.")]
    ResourceExhausted(&'static str),
}

impl EngineError {
    /// Whether the error means the process cannot keep going.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::ResourceExhausted(_))
    }
}
