//! Domain models passed between the enrollment kernel, the flat-file store and
//! the TUI. These stay plain data holders; validation and bookkeeping live in
//! `engine`.

use std::fmt;

use chrono::{DateTime, Local};

/// Longest name (in characters) kept for courses, students and history
/// entries. Longer input is cut, never rejected.
pub const MAX_NAME_CHARS: usize = 49;

/// Cut `text` to at most `MAX_NAME_CHARS` characters without splitting a
/// multi-byte character.
pub fn truncate_name(text: &str) -> String {
    match text.char_indices().nth(MAX_NAME_CHARS) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Stable course identity. Handed out once per course and never reused, so
/// queued enrollments keep pointing at the right course after a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseId(pub u64);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A course in the catalog. `name` doubles as the lookup key used when
/// enrolling, while `priority` (1-10, 10 highest) drives the descending sort.
pub struct Course {
    pub id: CourseId,
    pub name: String,
    /// Length in hours. Always positive.
    pub duration: u32,
    pub priority: i32,
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A registered student. Ids are meant to be unique but nothing enforces it;
/// lookups return the first match.
pub struct Student {
    pub name: String,
    pub id: i64,
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[derive(Debug, Clone)]
/// A pending enrollment request waiting in the queue.
pub struct Enrollment {
    /// Snapshot of the student at the time of the request.
    pub student: Student,
    pub course_id: CourseId,
    pub requested_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Short description of a completed action, kept for the undo report.
pub struct HistoryEntry {
    pub action: String,
}

impl HistoryEntry {
    pub fn new(action: &str) -> Self {
        Self {
            action: truncate_name(action),
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action)
    }
}
