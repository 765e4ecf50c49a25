mod app_config;
mod applications;
mod config;
mod forms;

pub use app_config::AppConfig;
pub use applications::{load_applications, parse_received_date, Application};
pub use config::{load_app_config, load_app_config_from_env};
pub use forms::FormCatalog;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse form catalog: {0}")]
    CatalogParse(#[from] serde_yaml::Error),

    #[error("failed to parse applications file: {0}")]
    ApplicationsParse(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
