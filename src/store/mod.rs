//! Flat-file persistence for the course catalog and student roster. Queue and
//! history are never written; they live only as long as the session.

mod courses;
mod paths;
mod students;

use anyhow::{Context, Result};

use crate::engine::Registrar;

pub use courses::{
    format_course_line, load_courses, parse_course_line, save_courses, CourseRecord,
};
pub use paths::{default_data_dir, DataPaths};
pub use students::{load_students, parse_student_line, save_students, StudentRecord};

/// Build a registrar from whatever is on disk under `paths`.
pub fn load_registrar(paths: &DataPaths) -> Result<Registrar> {
    let mut registrar = Registrar::new();
    registrar
        .load_courses(load_courses(&paths.courses)?)
        .context("failed to restore courses")?;
    registrar
        .load_students(load_students(&paths.students)?)
        .context("failed to restore students")?;
    Ok(registrar)
}

/// Overwrite both files with the registrar's current catalog and roster.
pub fn save_registrar(paths: &DataPaths, registrar: &Registrar) -> Result<()> {
    save_courses(&paths.courses, registrar.courses())?;
    save_students(&paths.students, registrar.students())
}
