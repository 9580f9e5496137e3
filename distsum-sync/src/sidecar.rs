//! Sidecar digest files.
//!
//! `<artifact>.sha256` holds a single line `"<digest>  <name>\n"` (two
//! spaces, file base name) — conventional checksum-utility output, so
//! `sha256sum -c` run in the distribution directory verifies it directly.
//!
//! Writes are full overwrites, never read-modify-merge, via the same
//! `.tmp` + rename pattern as the manifest.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// Outcome of an individual sidecar write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidecarResult {
    /// Sidecar was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// Sidecar was skipped — it already records this digest.
    Unchanged { path: PathBuf },
    /// Dry-run mode: the sidecar *would* have been written.
    WouldWrite { path: PathBuf },
}

/// `<artifact>.sha256`, alongside the artifact.
pub fn sidecar_path(artifact: &Path) -> PathBuf {
    PathBuf::from(format!("{}.sha256", artifact.display()))
}

/// The single-line sidecar body for `artifact`.
///
/// Records the artifact's base name so verification works from the directory
/// holding both files, regardless of where the pass ran.
fn sidecar_line(artifact: &Path, digest: &str) -> String {
    let name = artifact
        .file_name()
        .map_or_else(|| artifact.display().to_string(), |n| n.to_string_lossy().into_owned());
    format!("{digest}  {name}\n")
}

/// Write (or fully overwrite) the sidecar digest file for `artifact`.
///
/// Skips the write when the existing sidecar already holds the identical
/// line, so a no-change pass leaves sidecar mtimes alone.
pub fn write_sidecar(
    artifact: &Path,
    digest: &str,
    dry_run: bool,
) -> Result<SidecarResult, SyncError> {
    let path = sidecar_path(artifact);
    let line = sidecar_line(artifact, digest);

    match std::fs::read_to_string(&path) {
        Ok(existing) if existing == line => {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(SidecarResult::Unchanged { path });
        }
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(io_err(&path, err)),
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(SidecarResult::WouldWrite { path });
    }

    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, &line).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(SidecarResult::Written { path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DIGEST: &str = "63c1dd951ffedf6f7fd968ad4efa39b8ed584f162f46e715114ee184f8de9201";

    #[test]
    fn first_write_creates_sidecar_with_exact_format() {
        let tmp = TempDir::new().unwrap();
        let artifact = tmp.path().join("myapp-1.2.0-x86_64.tar.xz");
        std::fs::write(&artifact, "AAAA").unwrap();

        let result = write_sidecar(&artifact, DIGEST, false).unwrap();
        assert!(matches!(result, SidecarResult::Written { .. }));

        let body = std::fs::read_to_string(sidecar_path(&artifact)).unwrap();
        assert_eq!(body, format!("{DIGEST}  myapp-1.2.0-x86_64.tar.xz\n"));
    }

    #[test]
    fn second_write_same_digest_is_unchanged() {
        let tmp = TempDir::new().unwrap();
        let artifact = tmp.path().join("a.zip");
        write_sidecar(&artifact, DIGEST, false).unwrap();
        let result = write_sidecar(&artifact, DIGEST, false).unwrap();
        assert!(matches!(result, SidecarResult::Unchanged { .. }));
    }

    #[test]
    fn stale_sidecar_is_fully_overwritten() {
        let tmp = TempDir::new().unwrap();
        let artifact = tmp.path().join("a.zip");
        let sidecar = sidecar_path(&artifact);
        std::fs::write(&sidecar, format!("{}  a.zip\n", "0".repeat(64))).unwrap();

        let result = write_sidecar(&artifact, DIGEST, false).unwrap();
        assert!(matches!(result, SidecarResult::Written { .. }));
        assert_eq!(
            std::fs::read_to_string(&sidecar).unwrap(),
            format!("{DIGEST}  a.zip\n")
        );
    }

    #[test]
    fn dry_run_does_not_create_sidecar() {
        let tmp = TempDir::new().unwrap();
        let artifact = tmp.path().join("a.zip");
        let result = write_sidecar(&artifact, DIGEST, true).unwrap();
        assert!(matches!(result, SidecarResult::WouldWrite { .. }));
        assert!(!sidecar_path(&artifact).exists(), "dry-run must not create files");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let artifact = tmp.path().join("a.zip");
        write_sidecar(&artifact, DIGEST, false).unwrap();
        let tmp_path = PathBuf::from(format!("{}.tmp", sidecar_path(&artifact).display()));
        assert!(!tmp_path.exists(), ".tmp must be cleaned up");
    }
}
