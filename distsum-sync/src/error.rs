//! Error types for distsum-sync.

use std::path::PathBuf;

use thiserror::Error;

use distsum_core::ManifestError;

/// All errors that can arise from reconciliation operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from manifest load or save.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact glob pattern failed to compile.
    #[error("invalid artifact pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Installer script missing for a patch operation.
    #[error("installer script not found at {path}")]
    ScriptNotFound { path: PathBuf },

    /// Installer script extension is neither `.sh` nor `.ps1`.
    #[error("unsupported installer script '{path}'; expected a .sh or .ps1 file")]
    UnsupportedScript { path: PathBuf },

    /// The patch anchor line was not found in the installer script.
    #[error("could not find anchor line {anchor:?} in {path}")]
    AnchorNotFound {
        path: PathBuf,
        anchor: &'static str,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
