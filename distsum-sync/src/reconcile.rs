//! Manifest checksum reconciliation.
//!
//! One pass over the manifest: snapshot the previously recorded sha256 for
//! every artifact name referenced by a release, overwrite table entries with
//! freshly computed digests, and persist. The old→new snapshot taken *before*
//! mutation is what drives installer-script propagation afterwards.
//!
//! A missing manifest file is a valid no-op (sidecar-only invocations);
//! a malformed or unwritable manifest aborts the pass.

use std::collections::BTreeMap;
use std::path::Path;

use distsum_core::types::{ArtifactName, Manifest};
use distsum_core::manifest;

use crate::error::SyncError;

/// Outcome of reconciling one manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManifestOutcome {
    /// Artifact names whose recorded sha256 changed this pass.
    pub updated: Vec<ArtifactName>,
    /// Old digest → new digest, for script propagation.
    ///
    /// Only artifacts with a previously recorded digest *and* a different new
    /// digest appear, so propagation never performs a spurious replacement.
    pub replacements: BTreeMap<String, String>,
    /// Whether the manifest file was rewritten.
    pub written: bool,
}

/// Reconcile the manifest at `path` against freshly computed digests, keyed
/// by artifact file base name.
///
/// Collects old digests before any mutation, applies `new_digests` to every
/// matching artifacts-table entry, and persists only when something changed.
/// `dry_run` reports the same outcome without writing.
pub fn reconcile_manifest_at(
    path: &Path,
    new_digests: &BTreeMap<String, String>,
    dry_run: bool,
) -> Result<ManifestOutcome, SyncError> {
    let Some(mut doc) = manifest::load_at(path)? else {
        tracing::debug!("no manifest at {}; skipping reconciliation", path.display());
        return Ok(ManifestOutcome::default());
    };

    let old = collect_old_checksums(&doc);
    let updated = apply_new_checksums(&mut doc, new_digests);

    let mut replacements = BTreeMap::new();
    for (name, old_digest) in &old {
        let Some(new_digest) = new_digests.get(name.as_str()) else {
            continue;
        };
        if old_digest != new_digest {
            replacements.insert(old_digest.clone(), new_digest.clone());
        }
    }

    let written = if updated.is_empty() {
        tracing::debug!("manifest digests already current: {}", path.display());
        false
    } else if dry_run {
        tracing::info!(
            "[dry-run] would update {} manifest digest(s): {}",
            updated.len(),
            path.display()
        );
        false
    } else {
        manifest::save_at(path, &doc)?;
        tracing::info!("updated {} manifest digest(s): {}", updated.len(), path.display());
        true
    };

    Ok(ManifestOutcome {
        updated,
        replacements,
        written,
    })
}

/// Snapshot the recorded sha256 for every release-referenced artifact name,
/// before any mutation.
///
/// First-seen wins when a name repeats across releases; names that do not
/// resolve in the artifacts table, and entries without a recorded sha256, are
/// skipped.
fn collect_old_checksums(doc: &Manifest) -> BTreeMap<ArtifactName, String> {
    let mut old = BTreeMap::new();
    for name in doc.referenced_names() {
        let Some(entry) = doc.artifacts.get(name) else {
            continue;
        };
        let Some(digest) = entry.checksums.sha256.as_ref() else {
            continue;
        };
        old.entry(name.clone()).or_insert_with(|| digest.clone());
    }
    old
}

/// Overwrite `checksums.sha256` for every artifacts-table entry whose name has
/// a freshly computed digest. Entries already recording the new digest are
/// left untouched; names with no computed digest are left alone (a pass may
/// rebuild only one platform's archive).
fn apply_new_checksums(
    doc: &mut Manifest,
    new_digests: &BTreeMap<String, String>,
) -> Vec<ArtifactName> {
    let mut updated = Vec::new();
    for (name, entry) in doc.artifacts.iter_mut() {
        let Some(digest) = new_digests.get(name.as_str()) else {
            continue;
        };
        if entry.checksums.sha256.as_deref() == Some(digest.as_str()) {
            continue;
        }
        entry.checksums.sha256 = Some(digest.clone());
        updated.push(name.clone());
    }
    updated
}
