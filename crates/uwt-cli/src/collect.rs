//! Collection pipeline: archive today's raw processing-time payloads.
//!
//! Walks the configured form catalog in order, resolves each form's serving
//! offices, and archives one raw snapshot per (form, office) under the run's
//! calendar date. Requests are strictly sequential with a fixed pause
//! between them — the pacing is part of the contract with the upstream host
//! and must survive any future refactor.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::{Local, NaiveDate, Utc};
use tokio::io::AsyncWriteExt;

use uwt_core::{AppConfig, FormCatalog};
use uwt_egov::types::Office;
use uwt_egov::{normalize, EgovClient, ProcessingTimeReport};
use uwt_store::SnapshotStore;

/// Run a full collection pass over the catalog (or a single `--form`).
///
/// By default the first failed request aborts the run with its
/// (form, office) context. With `keep_going`, per-office failures are
/// logged and counted instead, and the run only fails when nothing at all
/// was archived.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the form filter names
/// an unknown form, the client cannot be constructed, or (without
/// `keep_going`) any fetch, archive write, or payload validation fails.
pub(crate) async fn run_collect(
    config: &AppConfig,
    form_filter: Option<&str>,
    keep_going: bool,
    records_path: Option<&Path>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let catalog = FormCatalog::load_or_builtin(&config.forms_path)?;
    let forms = select_forms(&catalog, form_filter)?;

    if dry_run {
        println!(
            "dry-run: would collect {} forms: [{}]",
            forms.len(),
            forms.join(", ")
        );
        return Ok(());
    }

    let client = EgovClient::new(
        &config.base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let store = SnapshotStore::new(&config.data_dir);

    let mut records_sink = match records_path {
        Some(path) => Some(open_records_sink(path).await?),
        None => None,
    };

    // One calendar date for the whole run, even if it crosses midnight.
    let run_date = Local::now().date_naive();
    let pause = Duration::from_millis(config.inter_request_delay_ms);

    let mut snapshots: usize = 0;
    let mut failures: usize = 0;

    for form in &forms {
        let offices = match client.list_offices(form).await {
            Ok(offices) => offices,
            Err(e) if keep_going => {
                tracing::error!(form = %form, error = %e, "failed to list offices; skipping form");
                failures += 1;
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("listing offices for form {form}"));
            }
        };
        tracing::info!(form = %form, offices = offices.len(), "collecting form");
        tokio::time::sleep(pause).await;

        for office in &offices {
            match collect_office(&client, &store, records_sink.as_mut(), form, office, run_date)
                .await
            {
                Ok(records) => {
                    snapshots += 1;
                    tracing::info!(
                        form = %form,
                        office = %office.office_code,
                        records,
                        "snapshot archived"
                    );
                }
                Err(e) if keep_going => {
                    tracing::error!(
                        form = %form,
                        office = %office.office_code,
                        error = %format!("{e:#}"),
                        "failed to collect office"
                    );
                    failures += 1;
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("collecting {form}/{}", office.office_code));
                }
            }
            tokio::time::sleep(pause).await;
        }
    }

    if failures > 0 {
        tracing::warn!(failures, snapshots, "collection finished with failures");
    }
    if snapshots == 0 && failures > 0 {
        anyhow::bail!("all {failures} fetches failed; nothing archived");
    }

    println!(
        "archived {snapshots} snapshots across {} forms for {run_date}",
        forms.len()
    );
    Ok(())
}

/// Fetch, archive, and validate one (form, office) pair. The raw payload is
/// written to the archive verbatim before any parsing, so even a payload the
/// normalizer rejects is preserved for inspection.
async fn collect_office(
    client: &EgovClient,
    store: &SnapshotStore,
    records_sink: Option<&mut tokio::fs::File>,
    form: &str,
    office: &Office,
    run_date: NaiveDate,
) -> anyhow::Result<usize> {
    let payload = client.get_processing_time(form, &office.office_code).await?;
    store
        .write(form, &office.office_code, run_date, &payload)
        .await?;

    // Flatten now so a malformed payload surfaces at collection time, not
    // months later when someone asks for a prediction.
    let report = ProcessingTimeReport::from_snapshot(&payload)?;
    let records = normalize(
        &report,
        &office.office_name,
        form,
        &office.office_code,
        Utc::now(),
    )?;

    if let Some(sink) = records_sink {
        for record in &records {
            let line = serde_json::to_string(record)?;
            sink.write_all(line.as_bytes()).await?;
            sink.write_all(b"\n").await?;
        }
    }

    Ok(records.len())
}

fn select_forms(catalog: &FormCatalog, filter: Option<&str>) -> anyhow::Result<Vec<String>> {
    match filter {
        Some(form) => {
            if !catalog.contains(form) {
                anyhow::bail!("form '{form}' is not in the catalog; check the forms file");
            }
            Ok(vec![form.to_string()])
        }
        None => Ok(catalog.forms.clone()),
    }
}

async fn open_records_sink(path: &Path) -> anyhow::Result<tokio::fs::File> {
    tokio::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .await
        .with_context(|| format!("opening records file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(forms: &[&str]) -> FormCatalog {
        FormCatalog {
            forms: forms.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn select_forms_defaults_to_whole_catalog_in_order() {
        let forms = select_forms(&catalog(&["I-485", "N-400"]), None).unwrap();
        assert_eq!(forms, vec!["I-485", "N-400"]);
    }

    #[test]
    fn select_forms_honors_filter() {
        let forms = select_forms(&catalog(&["I-485", "N-400"]), Some("N-400")).unwrap();
        assert_eq!(forms, vec!["N-400"]);
    }

    #[test]
    fn select_forms_rejects_unknown_form() {
        let result = select_forms(&catalog(&["I-485"]), Some("X-1"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("not in the catalog"));
    }
}
