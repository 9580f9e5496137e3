//! Error types for distsum-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from manifest persistence.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Underlying I/O failure (file not found mid-read, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error (write/save path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parse error on load — includes file path and line context from serde_json.
    #[error("failed to parse manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
