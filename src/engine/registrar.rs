use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::models::{truncate_name, Course, CourseId, Enrollment, HistoryEntry, Student};

use super::error::EngineError;
use super::history::HistoryStack;
use super::ordering::{
    find_by_priority, find_course_by_name, find_student_by_id, is_priority_descending,
    sort_by_priority_desc, SortedCourses,
};
use super::queue::EnrollmentQueue;
use super::registry::Registry;

/// Highest and lowest priority a course may carry.
pub const PRIORITY_RANGE: std::ops::RangeInclusive<i32> = 1..=10;

/// Result of handing the oldest pending enrollment off for processing.
#[derive(Debug, Clone)]
pub struct Processed {
    pub enrollment: Enrollment,
    pub course: Course,
}

/// What was thrown away when the registrar shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    pub pending_enrollments: usize,
    pub history_entries: usize,
    pub courses: usize,
    pub students: usize,
}

/// Owns every piece of enrollment bookkeeping for one session.
///
/// Courses and students persist across runs through `store`; the queue and the
/// history are rebuilt empty every start.
#[derive(Debug)]
pub struct Registrar {
    courses: Registry<Course>,
    students: Registry<Student>,
    queue: EnrollmentQueue,
    history: HistoryStack,
    next_course_id: u64,
    sorted: bool,
}

impl Default for Registrar {
    fn default() -> Self {
        Self::new()
    }
}

impl Registrar {
    pub fn new() -> Self {
        Self {
            courses: Registry::new("course registry"),
            students: Registry::new("student registry"),
            queue: EnrollmentQueue::new(),
            history: HistoryStack::new(),
            next_course_id: 1,
            // An empty catalog is trivially in order.
            sorted: true,
        }
    }

    pub fn courses(&self) -> &[Course] {
        self.courses.as_slice()
    }

    pub fn students(&self) -> &[Student] {
        self.students.as_slice()
    }

    pub fn queue(&self) -> &EnrollmentQueue {
        &self.queue
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Whether the catalog is known to be in descending priority order.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn course_by_id(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    /// Typed proof of ordering, available only while the catalog is sorted.
    pub fn sorted_courses(&self) -> Option<SortedCourses<'_>> {
        self.sorted
            .then(|| SortedCourses::new_unchecked(self.courses.as_slice()))
    }

    /// Append a course to the catalog and return its position.
    ///
    /// Names longer than the bounded field are cut. A repeated name is accepted
    /// with a warning; lookups by name return the first match in current order.
    /// Appending clears the sorted flag unless the new course keeps the catalog
    /// descending.
    pub fn add_course(
        &mut self,
        name: &str,
        duration: u32,
        priority: i32,
    ) -> Result<usize, EngineError> {
        let name = validate_name(name, "Course").map_err(EngineError::InvalidCourse)?;
        if duration == 0 {
            return Err(EngineError::InvalidCourse(
                "Duration must be a positive number of hours.".to_string(),
            ));
        }
        if !PRIORITY_RANGE.contains(&priority) {
            return Err(EngineError::InvalidCourse(format!(
                "Priority must be between {} and {}.",
                PRIORITY_RANGE.start(),
                PRIORITY_RANGE.end()
            )));
        }

        if self.find_course_by_name(&name).is_some() {
            warn!(%name, "course name already registered; lookups return the first match");
        }

        let id = CourseId(self.next_course_id);
        let keeps_order = self
            .courses
            .as_slice()
            .last()
            .map_or(true, |last| last.priority >= priority);

        let index = self.courses.push(Course {
            id,
            name,
            duration,
            priority,
        })?;
        self.next_course_id += 1;
        self.sorted = self.sorted && keeps_order;

        debug!(%id, index, priority, sorted = self.sorted, "course added");
        Ok(index)
    }

    /// Append a student and return its position. Duplicate ids are accepted.
    pub fn add_student(&mut self, name: &str, id: i64) -> Result<usize, EngineError> {
        let name = validate_name(name, "Student").map_err(EngineError::InvalidStudent)?;
        if self.find_student_by_id(id).is_some() {
            warn!(id, "student id already registered; lookups return the first match");
        }
        let index = self.students.push(Student { name, id })?;
        debug!(id, index, "student added");
        Ok(index)
    }

    pub fn find_student_by_id(&self, id: i64) -> Option<usize> {
        find_student_by_id(self.students.as_slice(), id)
    }

    pub fn find_course_by_name(&self, name: &str) -> Option<usize> {
        find_course_by_name(self.courses.as_slice(), name)
    }

    /// Queue an enrollment of student `student_id` into the course named
    /// `course_name` and record it in the history.
    ///
    /// Nothing changes unless both lookups succeed and the queue accepts the
    /// request. Returns the number of pending enrollments afterwards.
    pub fn enroll(
        &mut self,
        student_id: i64,
        course_name: &str,
        at: DateTime<Local>,
    ) -> Result<usize, EngineError> {
        let student_idx = self
            .find_student_by_id(student_id)
            .ok_or(EngineError::StudentNotFound(student_id))?;
        let course_idx = self
            .find_course_by_name(course_name)
            .ok_or_else(|| EngineError::CourseNotFound(course_name.to_string()))?;

        let student = self.students[student_idx].clone();
        let course = &self.courses[course_idx];
        let action = format!("Enrolled: {} in {}", student.name, course.name);
        let enrollment = Enrollment {
            student,
            course_id: course.id,
            requested_at: at,
        };

        self.history.reserve_one()?;
        self.queue.enqueue(enrollment)?;
        self.history.push(&action);

        debug!(student_id, course = course_name, pending = self.queue.len(), "enrollment queued");
        Ok(self.queue.len())
    }

    /// Take the oldest pending enrollment off the queue and record it.
    ///
    /// An empty queue yields [`EngineError::EmptyQueue`], which callers report
    /// as "nothing to process".
    pub fn process_next(&mut self) -> Result<Processed, EngineError> {
        let course_id = self.queue.peek().ok_or(EngineError::EmptyQueue)?.course_id;
        let course = self
            .course_by_id(course_id)
            .cloned()
            .ok_or_else(|| EngineError::CourseNotFound(course_id.to_string()))?;

        self.history.reserve_one()?;
        let enrollment = self.queue.dequeue()?;
        self.history.push(&format!(
            "Processed: {} in {}",
            enrollment.student.name, course.name
        ));

        debug!(
            student_id = enrollment.student.id,
            course = %course.name,
            pending = self.queue.len(),
            "enrollment processed"
        );
        Ok(Processed { enrollment, course })
    }

    /// Reorder the catalog by descending priority, in place.
    pub fn sort_courses(&mut self) {
        sort_by_priority_desc(self.courses.as_mut_slice());
        self.sorted = true;
        debug!(courses = self.courses.len(), "courses sorted by priority");
    }

    /// Position of a course with the given priority.
    ///
    /// Requires the catalog to be sorted; otherwise reports
    /// [`EngineError::NotSorted`] instead of searching blindly.
    pub fn find_course_by_priority(&self, priority: i32) -> Result<usize, EngineError> {
        let sorted = self.sorted_courses().ok_or(EngineError::NotSorted)?;
        find_by_priority(sorted, priority).ok_or(EngineError::PriorityNotFound(priority))
    }

    /// Discard the most recent history entry and hand it back for reporting.
    /// The action it describes stays in effect.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.history.pop();
        if let Some(entry) = &entry {
            debug!(action = %entry.action, "history entry discarded");
        }
        entry
    }

    /// Restore courses loaded from disk. Ids are assigned in file order and the
    /// sorted flag reflects whether the file was already in priority order.
    ///
    /// Records the catalog rejects are skipped with a warning; only a fatal
    /// error stops the load.
    pub fn load_courses<I>(&mut self, records: I) -> Result<usize, EngineError>
    where
        I: IntoIterator<Item = (String, u32, i32)>,
    {
        let mut loaded = 0;
        for (name, duration, priority) in records {
            match self.add_course(&name, duration, priority) {
                Ok(_) => loaded += 1,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => warn!(%name, error = %err, "skipping stored course"),
            }
        }
        self.sorted = is_priority_descending(self.courses.as_slice());
        Ok(loaded)
    }

    /// Restore students loaded from disk, skipping rejected records.
    pub fn load_students<I>(&mut self, records: I) -> Result<usize, EngineError>
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let mut loaded = 0;
        for (name, id) in records {
            match self.add_student(&name, id) {
                Ok(_) => loaded += 1,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => warn!(id, error = %err, "skipping stored student"),
            }
        }
        Ok(loaded)
    }

    /// Tear everything down without replaying any pending work.
    pub fn shutdown(mut self) -> ShutdownReport {
        let report = ShutdownReport {
            pending_enrollments: self.queue.drain(),
            history_entries: self.history.drain(),
            courses: self.courses.len(),
            students: self.students.len(),
        };
        info!(
            pending = report.pending_enrollments,
            history = report.history_entries,
            "registrar shut down; pending work discarded"
        );
        report
    }
}

/// Trim, reject names the record format cannot hold, and cut to the bounded
/// length. The cut result is trimmed again so a name never ends in a space.
fn validate_name(raw: &str, kind: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{kind} name is required."));
    }
    if trimmed.contains(',') {
        return Err(format!("{kind} name cannot contain a comma."));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(format!("{kind} name cannot contain control characters."));
    }
    Ok(truncate_name(trimmed).trim_end().to_string())
}
