//! Staleness signals for `distsum status`.
//!
//! Read-only audit of the three places that must agree: artifact bytes,
//! sidecar digest file, and manifest entry. Signal precedence per artifact:
//! 1. `MissingSidecar`
//! 2. `SidecarStale` (wrong digest or malformed line)
//! 3. `ManifestStale`
//! 4. `Unlisted` (manifest present, name absent from its artifacts table)
//! 5. `Current`

use std::path::{Path, PathBuf};

use distsum_core::manifest;
use distsum_core::types::{ArtifactName, Manifest};

use crate::digest::hash_file;
use crate::error::{io_err, SyncError};
use crate::pass::{enumerate_artifacts, PassConfig};
use crate::sidecar::sidecar_path;

/// Staleness classification for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StalenessSignal {
    Current,
    MissingSidecar,
    SidecarStale { recorded: String },
    /// `recorded` is `None` when the entry is listed without a sha256 digest.
    ManifestStale { recorded: Option<String> },
    Unlisted,
}

/// One artifact's audit result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStatus {
    pub path: PathBuf,
    pub digest: String,
    pub signal: StalenessSignal,
}

impl ArtifactStatus {
    /// True for signals that should fail a CI gate.
    pub fn is_stale(&self) -> bool {
        matches!(
            self.signal,
            StalenessSignal::MissingSidecar
                | StalenessSignal::SidecarStale { .. }
                | StalenessSignal::ManifestStale { .. }
        )
    }
}

/// Audit every artifact in the configured distribution directory.
///
/// An absent manifest limits the audit to sidecar-derived signals; a present
/// but malformed manifest is an error.
pub fn check_all(config: &PassConfig) -> Result<Vec<ArtifactStatus>, SyncError> {
    let doc = match &config.manifest_path {
        Some(path) => manifest::load_at(path)?,
        None => None,
    };

    let mut statuses = Vec::new();
    for path in enumerate_artifacts(&config.dist_dir, &config.product)? {
        let digest = hash_file(&path)?;
        let signal = classify(&path, &digest, doc.as_ref())?;
        statuses.push(ArtifactStatus {
            path,
            digest,
            signal,
        });
    }
    Ok(statuses)
}

fn classify(
    path: &Path,
    digest: &str,
    doc: Option<&Manifest>,
) -> Result<StalenessSignal, SyncError> {
    match read_sidecar_digest(path)? {
        None => return Ok(StalenessSignal::MissingSidecar),
        Some(recorded) if recorded != digest => {
            return Ok(StalenessSignal::SidecarStale { recorded });
        }
        Some(_) => {}
    }

    let Some(doc) = doc else {
        return Ok(StalenessSignal::Current);
    };
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(StalenessSignal::Current);
    };
    let Some(entry) = doc.artifacts.get(&ArtifactName::from(name)) else {
        return Ok(StalenessSignal::Unlisted);
    };
    if entry.checksums.sha256.as_deref() == Some(digest) {
        Ok(StalenessSignal::Current)
    } else {
        Ok(StalenessSignal::ManifestStale {
            recorded: entry.checksums.sha256.clone(),
        })
    }
}

/// First whitespace-delimited token of the sidecar, i.e. the recorded digest.
///
/// `Ok(None)` when the sidecar does not exist; a present but empty or
/// unparsable sidecar reports an empty recorded digest, which classifies as
/// stale upstream.
fn read_sidecar_digest(artifact: &Path) -> Result<Option<String>, SyncError> {
    let path = sidecar_path(artifact);
    let body = match std::fs::read_to_string(&path) {
        Ok(body) => body,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_err(&path, err)),
    };
    Ok(Some(
        body.split_whitespace().next().unwrap_or_default().to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sidecar::write_sidecar;
    use tempfile::TempDir;

    const STALE: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    fn config_at(dir: &Path, manifest: Option<PathBuf>) -> PassConfig {
        PassConfig {
            dist_dir: dir.to_path_buf(),
            product: "myapp".to_string(),
            manifest_path: manifest,
            scripts: vec![],
        }
    }

    fn artifact_with_sidecar(dir: &Path, name: &str, content: &str) -> (PathBuf, String) {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        let digest = hash_file(&path).unwrap();
        write_sidecar(&path, &digest, false).unwrap();
        (path, digest)
    }

    fn manifest_with(dir: &Path, name: &str, digest: &str) -> PathBuf {
        let path = dir.join("dist-manifest.json");
        std::fs::write(
            &path,
            format!(
                r#"{{
                    "releases": [ {{ "artifacts": ["{name}"] }} ],
                    "artifacts": {{
                        "{name}": {{ "path": "{name}", "checksums": {{ "sha256": "{digest}" }} }}
                    }}
                }}"#
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn fresh_artifact_with_agreeing_records_is_current() {
        let tmp = TempDir::new().unwrap();
        let (_, digest) = artifact_with_sidecar(tmp.path(), "myapp-1.0.0.tar.xz", "AAAA");
        let manifest = manifest_with(tmp.path(), "myapp-1.0.0.tar.xz", &digest);

        let statuses = check_all(&config_at(tmp.path(), Some(manifest))).unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].signal, StalenessSignal::Current);
        assert!(!statuses[0].is_stale());
    }

    #[test]
    fn missing_sidecar_outranks_manifest_staleness() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("myapp-1.0.0.tar.xz"), "AAAA").unwrap();
        let manifest = manifest_with(tmp.path(), "myapp-1.0.0.tar.xz", STALE);

        let statuses = check_all(&config_at(tmp.path(), Some(manifest))).unwrap();
        assert_eq!(statuses[0].signal, StalenessSignal::MissingSidecar);
    }

    #[test]
    fn edited_artifact_reports_sidecar_stale() {
        let tmp = TempDir::new().unwrap();
        let (path, _) = artifact_with_sidecar(tmp.path(), "myapp-1.0.0.tar.xz", "AAAA");
        std::fs::write(&path, "BBBB").unwrap();

        let statuses = check_all(&config_at(tmp.path(), None)).unwrap();
        assert!(matches!(
            statuses[0].signal,
            StalenessSignal::SidecarStale { .. }
        ));
    }

    #[test]
    fn stale_manifest_digest_reports_manifest_stale_with_recorded_value() {
        let tmp = TempDir::new().unwrap();
        artifact_with_sidecar(tmp.path(), "myapp-1.0.0.tar.xz", "AAAA");
        let manifest = manifest_with(tmp.path(), "myapp-1.0.0.tar.xz", STALE);

        let statuses = check_all(&config_at(tmp.path(), Some(manifest))).unwrap();
        assert_eq!(
            statuses[0].signal,
            StalenessSignal::ManifestStale {
                recorded: Some(STALE.to_string())
            }
        );
        assert!(statuses[0].is_stale());
    }

    #[test]
    fn artifact_absent_from_manifest_is_unlisted_not_stale() {
        let tmp = TempDir::new().unwrap();
        artifact_with_sidecar(tmp.path(), "myapp-1.0.0.tar.xz", "AAAA");
        let manifest = manifest_with(tmp.path(), "myapp-other.zip", STALE);

        let statuses = check_all(&config_at(tmp.path(), Some(manifest))).unwrap();
        assert_eq!(statuses[0].signal, StalenessSignal::Unlisted);
        assert!(!statuses[0].is_stale());
    }

    #[test]
    fn absent_manifest_limits_audit_to_sidecars() {
        let tmp = TempDir::new().unwrap();
        artifact_with_sidecar(tmp.path(), "myapp-1.0.0.tar.xz", "AAAA");

        let config = config_at(tmp.path(), Some(tmp.path().join("absent.json")));
        let statuses = check_all(&config).unwrap();
        assert_eq!(statuses[0].signal, StalenessSignal::Current);
    }

    #[test]
    fn malformed_sidecar_classifies_as_stale() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("myapp-1.0.0.tar.xz");
        std::fs::write(&path, "AAAA").unwrap();
        std::fs::write(sidecar_path(&path), "\n").unwrap();

        let statuses = check_all(&config_at(tmp.path(), None)).unwrap();
        assert!(matches!(
            statuses[0].signal,
            StalenessSignal::SidecarStale { .. }
        ));
    }
}
