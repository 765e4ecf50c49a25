use std::path::PathBuf;

/// Runtime settings shared by the collector and resolver pipelines.
///
/// Every field has a default, so a bare environment gets a working
/// configuration pointed at the production API and `./data`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Base URL of the processing-times service, without the `/api/...` path.
    pub base_url: String,
    /// Root directory of the snapshot archive.
    pub data_dir: PathBuf,
    /// Path to the YAML form catalog; the built-in catalog is used when the
    /// file does not exist.
    pub forms_path: PathBuf,
    pub request_timeout_secs: u64,
    /// Fixed pause between consecutive upstream requests. This is the pacing
    /// contract with the upstream host, not a tunable performance knob.
    pub inter_request_delay_ms: u64,
    pub user_agent: String,
}
