use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("expected a JSON array of records in {}", path.display())]
    NotAnArray { path: PathBuf },
}
