//! Property-based tests for the enrollment kernel.
//!
//! Queue and history are checked against std collections as models; the sort
//! and binary search are checked over arbitrary priority vectors.

use std::collections::VecDeque;

use chrono::Local;
use proptest::prelude::*;

use course_enrollment_manager::engine::{
    find_by_priority, is_priority_descending, sort_by_priority_desc, EngineError,
    EnrollmentQueue, HistoryStack, SortedCourses,
};
use course_enrollment_manager::models::{Course, CourseId, Enrollment, Student};

/// One step against a queue or stack: add the value, or take one out.
#[derive(Debug, Clone)]
enum Op {
    Put(i64),
    Take,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![any::<i64>().prop_map(Op::Put), Just(Op::Take)]
}

fn enrollment(student_id: i64) -> Enrollment {
    Enrollment {
        student: Student {
            name: format!("student-{student_id}"),
            id: student_id,
        },
        course_id: CourseId(1),
        requested_at: Local::now(),
    }
}

fn courses(priorities: &[i32]) -> Vec<Course> {
    priorities
        .iter()
        .enumerate()
        .map(|(idx, &priority)| Course {
            id: CourseId(idx as u64),
            name: format!("C{idx}"),
            duration: 10,
            priority,
        })
        .collect()
}

proptest! {
    #[test]
    fn queue_matches_fifo_model(ops in prop::collection::vec(op(), 0..200)) {
        let mut queue = EnrollmentQueue::new();
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                Op::Put(id) => {
                    queue.enqueue(enrollment(id)).unwrap();
                    model.push_back(id);
                }
                Op::Take => match model.pop_front() {
                    Some(expected) => {
                        prop_assert_eq!(queue.dequeue().unwrap().student.id, expected);
                    }
                    None => {
                        prop_assert_eq!(queue.dequeue().unwrap_err(), EngineError::EmptyQueue);
                    }
                },
            }
            prop_assert_eq!(queue.len(), model.len());
            prop_assert_eq!(queue.peek().map(|e| e.student.id), model.front().copied());
        }

        let pending: Vec<i64> = queue.iter().map(|e| e.student.id).collect();
        prop_assert_eq!(pending, model.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn history_matches_lifo_model(ops in prop::collection::vec(op(), 0..200)) {
        let mut history = HistoryStack::new();
        let mut model: Vec<String> = Vec::new();

        for op in ops {
            match op {
                Op::Put(n) => {
                    let action = format!("action {n}");
                    history.push(&action);
                    model.push(action);
                }
                Op::Take => {
                    let popped = history.pop().map(|entry| entry.action);
                    prop_assert_eq!(popped, model.pop());
                }
            }
            prop_assert_eq!(history.len(), model.len());
        }
    }

    #[test]
    fn sort_yields_descending_permutation(priorities in prop::collection::vec(1i32..=10, 0..120)) {
        let mut list = courses(&priorities);
        sort_by_priority_desc(&mut list);

        prop_assert!(is_priority_descending(&list));
        prop_assert_eq!(list.len(), priorities.len());

        let mut ids: Vec<u64> = list.iter().map(|c| c.id.0).collect();
        ids.sort_unstable();
        prop_assert_eq!(ids, (0..priorities.len() as u64).collect::<Vec<_>>());

        // Each course still carries the priority it was created with.
        for course in &list {
            prop_assert_eq!(course.priority, priorities[course.id.0 as usize]);
        }
    }

    #[test]
    fn search_after_sort_finds_exactly_present_priorities(
        priorities in prop::collection::vec(1i32..=10, 0..120)
    ) {
        let mut list = courses(&priorities);
        sort_by_priority_desc(&mut list);
        let sorted = SortedCourses::verify(&list).unwrap();

        for target in 0..=11 {
            match find_by_priority(sorted, target) {
                Some(idx) => prop_assert_eq!(list[idx].priority, target),
                None => prop_assert!(!priorities.contains(&target)),
            }
        }
    }
}
