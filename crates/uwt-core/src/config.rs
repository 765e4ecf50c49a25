use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing logic, decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var`
/// needed. Every setting has a default; nothing is required.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("UWT_LOG_LEVEL", "info");
    let base_url = or_default("UWT_BASE_URL", "https://egov.uscis.gov/processing-times");
    let data_dir = PathBuf::from(or_default("UWT_DATA_DIR", "./data"));
    let forms_path = PathBuf::from(or_default("UWT_FORMS_PATH", "./config/forms.yaml"));

    let request_timeout_secs = parse_u64("UWT_REQUEST_TIMEOUT_SECS", "30")?;
    let inter_request_delay_ms = parse_u64("UWT_INTER_REQUEST_DELAY_MS", "1000")?;
    let user_agent = or_default("UWT_USER_AGENT", "uwt/0.1 (processing-time tracking)");

    Ok(AppConfig {
        log_level,
        base_url,
        data_dir,
        forms_path,
        request_timeout_secs,
        inter_request_delay_ms,
        user_agent,
    })
}
