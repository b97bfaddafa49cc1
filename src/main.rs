//! Binary entry point: resolve settings, start logging, restore the catalog
//! and roster from disk, run the menu until exit, then save and tear down.
use anyhow::Context;
use course_enrollment_manager::{load_registrar, logging, run_app, App, Settings};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load();
    let _log_guard = logging::init(&settings.paths.logs, &settings.log_filter)?;
    info!(data_dir = %settings.paths.root.display(), "starting");

    let registrar = load_registrar(&settings.paths).context("failed to load saved data")?;
    let mut app = App::new(registrar);
    run_app(&mut app)?;

    let report = app.finish(&settings.paths)?;
    println!(
        "Data saved ({} courses, {} students). Discarded {} pending enrollments.",
        report.courses, report.students, report.pending_enrollments
    );
    Ok(())
}
