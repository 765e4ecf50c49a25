use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No snapshot has been archived yet for the requested pair. An expected
    /// operational condition (first run, or an office new to a form), so it
    /// gets its own variant rather than surfacing as an I/O fault.
    #[error("no snapshot archived for {form_code}/{office_code}")]
    NotFound {
        form_code: String,
        office_code: String,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("corrupt snapshot at {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
