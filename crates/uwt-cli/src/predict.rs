//! Resolver pipeline: project completion windows for pending applications.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;

use uwt_core::{load_applications, parse_received_date, AppConfig, Application};
use uwt_egov::{completion_window, ProcessingTimeReport};
use uwt_store::SnapshotStore;

/// Resolve every application in the input file against its most recent
/// archived snapshot and print one tab-separated window line per
/// application. The first failing application halts the batch; its label,
/// form, office, and subtype are carried in the error.
///
/// # Errors
///
/// Returns an error if the applications file cannot be loaded or any
/// application fails to resolve (no snapshot, unknown subtype, non-month
/// range, unparseable received date).
pub(crate) async fn run_predict(
    config: &AppConfig,
    applications_path: &Path,
) -> anyhow::Result<()> {
    let applications = load_applications(applications_path)?;
    let store = SnapshotStore::new(&config.data_dir);

    for application in &applications {
        let line = resolve_application(&store, application)
            .await
            .with_context(|| {
                format!(
                    "resolving '{}' ({}/{}, subtype '{}')",
                    application.label,
                    application.form_code,
                    application.office_code,
                    application.subtype_form_type
                )
            })?;
        println!("{line}");
    }

    Ok(())
}

async fn resolve_application(
    store: &SnapshotStore,
    application: &Application,
) -> anyhow::Result<String> {
    let received = parse_received_date(&application.received_date).ok_or_else(|| {
        anyhow::anyhow!(
            "received_date '{}' does not match \"Month D, YYYY\"",
            application.received_date
        )
    })?;

    let snapshot = store
        .latest(&application.form_code, &application.office_code)
        .await?;
    tracing::debug!(
        form = %application.form_code,
        office = %application.office_code,
        snapshot_date = %snapshot.date,
        "resolving against latest snapshot"
    );

    let report = ProcessingTimeReport::from_snapshot(&snapshot.payload)?;
    let (lower, upper) = completion_window(&report, &application.subtype_form_type, received)?;

    Ok(window_line(application, lower, upper))
}

/// `label<TAB>form<TAB>lower<TAB>upper<TAB>(subtype)`, dates in ISO form.
fn window_line(application: &Application, lower: NaiveDate, upper: NaiveDate) -> String {
    format!(
        "{}\t{}\t{}\t{}\t({})",
        application.label, application.form_code, lower, upper, application.subtype_form_type
    )
}
