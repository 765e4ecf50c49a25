use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::ConfigError;

/// One pending case supplied to the resolver pipeline.
///
/// Ephemeral query input: applications are read per run and never persisted
/// by this system.
#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    pub label: String,
    pub form_code: String,
    pub office_code: String,
    pub subtype_form_type: String,
    /// Received date as printed on the USCIS receipt notice,
    /// e.g. `"March 5, 2024"`.
    pub received_date: String,
}

/// Load and validate the applications list from a JSON file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_applications(path: &Path) -> Result<Vec<Application>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let applications: Vec<Application> = serde_json::from_str(&content)?;
    validate_applications(&applications)?;
    Ok(applications)
}

/// Parse a receipt-notice date such as `"March 5, 2024"`.
///
/// Returns `None` if the string does not match the expected format.
#[must_use]
pub fn parse_received_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%B %d, %Y").ok()
}

fn validate_applications(applications: &[Application]) -> Result<(), ConfigError> {
    if applications.is_empty() {
        return Err(ConfigError::Validation(
            "applications file must list at least one application".to_string(),
        ));
    }

    for app in applications {
        for (field, value) in [
            ("label", &app.label),
            ("form_code", &app.form_code),
            ("office_code", &app.office_code),
            ("subtype_form_type", &app.subtype_form_type),
            ("received_date", &app.received_date),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "application '{}': {field} must be non-empty",
                    app.label
                )));
            }
        }
    }

    Ok(())
}
