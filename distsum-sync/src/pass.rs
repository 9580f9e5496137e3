//! The reconciliation pass.
//!
//! Fixed order: enumerate artifacts → digest + sidecar per file → manifest
//! reconciliation → script propagation. A failure on an individual artifact
//! is logged and skipped so one corrupt archive cannot block the rest;
//! manifest and script failures abort the pass, since those touch shared
//! release state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::digest;
use crate::error::{io_err, SyncError};
use crate::propagate::{propagate_scripts, ScriptResult};
use crate::reconcile::{reconcile_manifest_at, ManifestOutcome};
use crate::sidecar::{write_sidecar, SidecarResult};

/// Glob patterns identifying release artifacts for `product`.
pub fn artifact_patterns(product: &str) -> Vec<String> {
    vec![format!("{product}-*.tar.xz"), format!("{product}-*.zip")]
}

/// Configuration for one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassConfig {
    /// Directory holding the build's distribution artifacts.
    pub dist_dir: PathBuf,
    /// Product name; artifacts match `<product>-*.tar.xz` / `<product>-*.zip`.
    pub product: String,
    /// Manifest path; `None` (or an absent file) skips manifest
    /// reconciliation and script propagation.
    pub manifest_path: Option<PathBuf>,
    /// Installer scripts to receive digest propagation.
    pub scripts: Vec<PathBuf>,
}

impl PassConfig {
    /// Config with the conventional installer-script locations,
    /// `<dist_dir>/<product>-installer.sh` and `.ps1`.
    pub fn for_product(dist_dir: impl Into<PathBuf>, product: impl Into<String>) -> Self {
        let dist_dir = dist_dir.into();
        let product = product.into();
        let scripts = vec![
            dist_dir.join(format!("{product}-installer.sh")),
            dist_dir.join(format!("{product}-installer.ps1")),
        ];
        Self {
            dist_dir,
            product,
            manifest_path: None,
            scripts,
        }
    }
}

/// Outcome of one artifact's digest + sidecar step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// Digest computed and sidecar handled.
    Processed {
        path: PathBuf,
        digest: String,
        sidecar: SidecarResult,
    },
    /// Digest or sidecar failed; the pass continued without this artifact.
    Skipped { path: PathBuf, reason: String },
}

/// Summary of a full reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassResult {
    pub artifacts: Vec<ArtifactOutcome>,
    /// `None` when no manifest path was configured.
    pub manifest: Option<ManifestOutcome>,
    pub scripts: Vec<ScriptResult>,
}

impl PassResult {
    /// Number of artifacts skipped due to per-artifact failures.
    pub fn skipped(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|a| matches!(a, ArtifactOutcome::Skipped { .. }))
            .count()
    }
}

/// Run the full reconciliation pass.
///
/// This is the canonical entrypoint for `distsum update`.
pub fn run_pass(config: &PassConfig, dry_run: bool) -> Result<PassResult, SyncError> {
    let mut artifacts = Vec::new();
    let mut new_digests: BTreeMap<String, String> = BTreeMap::new();

    for path in enumerate_artifacts(&config.dist_dir, &config.product)? {
        tracing::info!("updating checksum for {}", path.display());
        match process_artifact(&path, dry_run) {
            Ok((digest, sidecar)) => {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    new_digests.insert(name.to_string(), digest.clone());
                }
                artifacts.push(ArtifactOutcome::Processed {
                    path,
                    digest,
                    sidecar,
                });
            }
            Err(err) => {
                tracing::warn!("skipping {}: {err}", path.display());
                artifacts.push(ArtifactOutcome::Skipped {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }

    let manifest = match &config.manifest_path {
        Some(path) => Some(reconcile_manifest_at(path, &new_digests, dry_run)?),
        None => None,
    };

    let scripts = match manifest.as_ref() {
        Some(outcome) if !outcome.replacements.is_empty() => {
            propagate_scripts(&outcome.replacements, &config.scripts, dry_run)?
        }
        _ => Vec::new(),
    };

    Ok(PassResult {
        artifacts,
        manifest,
        scripts,
    })
}

fn process_artifact(path: &Path, dry_run: bool) -> Result<(String, SidecarResult), SyncError> {
    let digest = digest::hash_file(path)?;
    let sidecar = write_sidecar(path, &digest, dry_run)?;
    Ok((digest, sidecar))
}

/// Artifact files under `dist_dir` matching the product's naming patterns,
/// sorted for deterministic processing order.
pub fn enumerate_artifacts(dist_dir: &Path, product: &str) -> Result<Vec<PathBuf>, SyncError> {
    let mut found = Vec::new();
    for pattern in artifact_patterns(product) {
        let full = dist_dir.join(&pattern).display().to_string();
        let paths = glob::glob(&full).map_err(|e| SyncError::Pattern {
            pattern: full.clone(),
            source: e,
        })?;
        for entry in paths {
            match entry {
                Ok(path) => found.push(path),
                Err(err) => {
                    let path = err.path().to_path_buf();
                    return Err(io_err(path, err.into_error()));
                }
            }
        }
    }
    found.sort();
    Ok(found)
}
