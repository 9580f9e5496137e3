//! Installer-script checksum propagation.
//!
//! Installer scripts embed artifact digests as literal strings so an
//! installer can verify a download without consulting the manifest.
//! Propagation is deliberately an opaque text substitution: replace every
//! occurrence of each old digest with its replacement, never parse the
//! script.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// Outcome for one installer script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptResult {
    /// Script contained stale digests and was rewritten.
    Rewritten { path: PathBuf },
    /// Script exists but contained none of the old digests.
    Unchanged { path: PathBuf },
    /// Dry-run mode: the script *would* have been rewritten.
    WouldRewrite { path: PathBuf },
    /// Script does not exist — not every release ships every installer flavor.
    Missing { path: PathBuf },
}

/// Replace every occurrence of each old digest with its replacement across
/// `scripts`.
///
/// Missing scripts are skipped without error. A read or write failure on an
/// existing script is fatal: a half-updated installer would embed a stale
/// digest.
pub fn propagate_scripts(
    replacements: &BTreeMap<String, String>,
    scripts: &[PathBuf],
    dry_run: bool,
) -> Result<Vec<ScriptResult>, SyncError> {
    let mut results = Vec::new();
    for path in scripts {
        results.push(propagate_script(replacements, path, dry_run)?);
    }
    Ok(results)
}

fn propagate_script(
    replacements: &BTreeMap<String, String>,
    path: &Path,
    dry_run: bool,
) -> Result<ScriptResult, SyncError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!("no installer script at {}; skipping", path.display());
            return Ok(ScriptResult::Missing {
                path: path.to_path_buf(),
            });
        }
        Err(err) => return Err(io_err(path, err)),
    };

    let rewritten = apply_replacements(&text, replacements);
    if rewritten == text {
        return Ok(ScriptResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would rewrite: {}", path.display());
        return Ok(ScriptResult::WouldRewrite {
            path: path.to_path_buf(),
        });
    }

    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, &rewritten).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("rewrote embedded digests: {}", path.display());
    Ok(ScriptResult::Rewritten {
        path: path.to_path_buf(),
    })
}

/// Global literal substitution of each old digest.
///
/// Application order cannot matter: digests are independent, so no
/// replacement value ever equals another pair's search value.
fn apply_replacements(text: &str, replacements: &BTreeMap<String, String>) -> String {
    let mut out = text.to_string();
    for (old, new) in replacements {
        if out.contains(old.as_str()) {
            out = out.replace(old.as_str(), new.as_str());
        }
    }
    out
}
