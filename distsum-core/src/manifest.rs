//! Manifest persistence.
//!
//! Loading tolerates absence: a missing manifest is a valid input for an
//! invocation that only maintains sidecar files, so [`load_at`] returns
//! `Ok(None)` rather than an error. A manifest that exists but fails to parse
//! is an error — that file is shared release state and must not be clobbered.
//!
//! Saves are pretty-printed for diff-friendliness and atomic: write
//! `<path>.tmp`, then rename over the original.

use std::path::{Path, PathBuf};

use crate::error::ManifestError;
use crate::types::Manifest;

/// Load the manifest at `path`.
///
/// Returns `Ok(None)` if the file does not exist,
/// `ManifestError::Parse` (with path context) if it exists but is malformed.
pub fn load_at(path: &Path) -> Result<Option<Manifest>, ManifestError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Save `manifest` to `path` atomically.
///
/// Writes pretty-printed JSON to `<path>.tmp` then renames to `<path>`.
pub fn save_at(path: &Path, manifest: &Manifest) -> Result<(), ManifestError> {
    let json = serde_json::to_string_pretty(manifest)?;
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, &json)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(ManifestError::Io(e));
    }
    Ok(())
}
