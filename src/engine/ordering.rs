//! Priority ordering and lookups over the course and student registries.
//!
//! The course sort is a Lomuto quicksort with the last element as pivot. Any
//! element whose priority is `>=` the pivot's goes to the low side, which
//! yields descending order. Equal priorities may swap places; the sort is not
//! stable. Already-descending input hits the O(n²) worst case. To keep that
//! from also meaning O(n) stack frames, the sort recurses into the smaller
//! partition and loops on the larger one; the comparisons and swaps are the
//! same ones the plain recursive version performs.

use crate::models::{Course, Student};

/// Proof that a course slice is currently in descending priority order.
///
/// Only [`SortedCourses::new_unchecked`] (used right after a sort or after a
/// verified load) and [`SortedCourses::verify`] build one, so holding a
/// `SortedCourses` is how [`find_by_priority`] knows its precondition holds.
#[derive(Debug, Clone, Copy)]
pub struct SortedCourses<'a> {
    courses: &'a [Course],
}

impl<'a> SortedCourses<'a> {
    /// Wrap `courses` if they are non-increasing by priority.
    pub fn verify(courses: &'a [Course]) -> Option<Self> {
        if is_priority_descending(courses) {
            Some(Self { courses })
        } else {
            None
        }
    }

    pub(crate) fn new_unchecked(courses: &'a [Course]) -> Self {
        debug_assert!(is_priority_descending(courses));
        Self { courses }
    }

    pub fn as_slice(&self) -> &'a [Course] {
        self.courses
    }
}

/// True when every adjacent pair satisfies `priority[i] >= priority[i + 1]`.
pub fn is_priority_descending(courses: &[Course]) -> bool {
    courses
        .windows(2)
        .all(|pair| pair[0].priority >= pair[1].priority)
}

/// Sort `courses` in place, highest priority first.
pub fn sort_by_priority_desc(courses: &mut [Course]) {
    if courses.len() < 2 {
        return;
    }
    quick_sort(courses, 0, courses.len() - 1);
}

fn quick_sort(courses: &mut [Course], mut low: usize, mut high: usize) {
    while low < high {
        let pivot = partition(courses, low, high);
        let left_len = pivot - low;
        let right_len = high - pivot;

        if left_len < right_len {
            if pivot > low {
                quick_sort(courses, low, pivot - 1);
            }
            low = pivot + 1;
        } else {
            if pivot < high {
                quick_sort(courses, pivot + 1, high);
            }
            if pivot == 0 {
                return;
            }
            high = pivot - 1;
        }
    }
}

/// Lomuto partition of `courses[low..=high]` around the last element. Returns
/// the pivot's final position.
fn partition(courses: &mut [Course], low: usize, high: usize) -> usize {
    let pivot = courses[high].priority;
    let mut store = low;
    for j in low..high {
        if courses[j].priority >= pivot {
            courses.swap(store, j);
            store += 1;
        }
    }
    courses.swap(store, high);
    store
}

/// Binary search for a course with priority `target` in a descending slice.
///
/// When the midpoint's priority is greater than the target the search moves
/// right, otherwise left. With duplicates any matching index may come back.
pub fn find_by_priority(sorted: SortedCourses<'_>, target: i32) -> Option<usize> {
    let courses = sorted.as_slice();
    if courses.is_empty() {
        return None;
    }
    let mut low = 0usize;
    let mut high = courses.len() - 1;

    while low <= high {
        let mid = low + (high - low) / 2;
        let priority = courses[mid].priority;
        if priority == target {
            return Some(mid);
        }
        if priority > target {
            low = mid + 1;
        } else if mid == 0 {
            break;
        } else {
            high = mid - 1;
        }
    }
    None
}

/// First student whose id matches, scanning in insertion order.
pub fn find_student_by_id(students: &[Student], id: i64) -> Option<usize> {
    students.iter().position(|student| student.id == id)
}

/// First course whose name matches exactly, scanning the current order.
pub fn find_course_by_name(courses: &[Course], name: &str) -> Option<usize> {
    courses.iter().position(|course| course.name == name)
}
