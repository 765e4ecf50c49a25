use thiserror::Error;

#[derive(Debug, Error)]
pub enum EgovError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed processing-time payload for {context}: {reason}")]
    MalformedPayload { context: String, reason: String },

    #[error("subtype '{form_type}' not present in snapshot")]
    SubtypeNotFound { form_type: String },

    #[error("unsupported range unit '{unit}'; only \"Months\" ranges are supported")]
    UnsupportedUnit { unit: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
