//! Installer script patching.
//!
//! Generated installer scripts unpack the release archive and stop. Releases
//! that bundle a runtime shim need an extra block, inserted immediately after
//! the installer's completion line, that copies `runtime-shim/<arch>` into
//! the install root. The script is opaque text: the patch anchors on a known
//! literal line and never parses shell or PowerShell syntax.

use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// The flavor of a generated installer script, determined by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallerKind {
    Sh,
    Ps1,
}

const SH_ANCHOR: &str = "say \"everything's installed!\"";
const SH_BLOCK: &str = concat!(
    "    # Link contents of runtime-shim/{target} to install dir root\n",
    "    if [ -d \"$_src_dir/runtime-shim/$_arch\" ]; then\n",
    "        cp \"$_src_dir/runtime-shim/$_arch\"/* \"$_install_dir/\"\n",
    "        rm -rf \"$_src_dir/runtime-shim\"\n",
    "    fi\n",
);

const PS1_ANCHOR: &str = "Write-Information \"everything's installed!\"";
const PS1_BLOCK: &str = concat!(
    "    # Copy contents of runtime-shim/{target} to install dir bin\n",
    "    $tmp_dir = Split-Path $bin_path\n",
    "    $shim_dir = \"$tmp_dir\\runtime-shim\\$arch\"\n",
    "    if (Test-Path $shim_dir) {\n",
    "        Copy-Item \"$shim_dir\\*\" -Destination \"$dest_dir\" -Recurse\n",
    "        Remove-Item \"$tmp_dir\\runtime-shim\" -Recurse -Force\n",
    "    }\n",
);

impl InstallerKind {
    /// Kind from the script's file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, SyncError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            Some("sh") => Ok(InstallerKind::Sh),
            Some("ps1") => Ok(InstallerKind::Ps1),
            _ => Err(SyncError::UnsupportedScript {
                path: path.to_path_buf(),
            }),
        }
    }

    /// The completion line the shim block is inserted after.
    pub fn anchor(self) -> &'static str {
        match self {
            InstallerKind::Sh => SH_ANCHOR,
            InstallerKind::Ps1 => PS1_ANCHOR,
        }
    }

    fn block(self) -> &'static str {
        match self {
            InstallerKind::Sh => SH_BLOCK,
            InstallerKind::Ps1 => PS1_BLOCK,
        }
    }
}

/// Outcome of patching one installer script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The shim block was inserted after the anchor line.
    Patched { path: PathBuf },
    /// The script already contains the shim block; nothing was written.
    AlreadyPatched { path: PathBuf },
}

/// Insert the runtime-shim copy block into the installer at `path`.
///
/// Idempotent: a script that already carries the block is reported as
/// [`PatchOutcome::AlreadyPatched`] and left untouched. The anchor line must
/// be present; its absence means the file is not a generated installer of a
/// supported shape.
pub fn patch_installer(path: &Path) -> Result<PatchOutcome, SyncError> {
    if !path.is_file() {
        return Err(SyncError::ScriptNotFound {
            path: path.to_path_buf(),
        });
    }
    let kind = InstallerKind::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;

    if content.contains(kind.block()) {
        tracing::debug!("already patched: {}", path.display());
        return Ok(PatchOutcome::AlreadyPatched {
            path: path.to_path_buf(),
        });
    }

    let anchor = kind.anchor();
    if !content.contains(anchor) {
        return Err(SyncError::AnchorNotFound {
            path: path.to_path_buf(),
            anchor,
        });
    }

    let patched = content.replace(anchor, &format!("{anchor}\n{}", kind.block()));
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, &patched).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("patched installer: {}", path.display());
    Ok(PatchOutcome::Patched {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh_script(dir: &Path) -> PathBuf {
        let path = dir.join("myapp-installer.sh");
        std::fs::write(
            &path,
            "#!/bin/sh\ninstall() {\n    do_install\n    say \"everything's installed!\"\n}\n",
        )
        .unwrap();
        path
    }

    fn ps1_script(dir: &Path) -> PathBuf {
        let path = dir.join("myapp-installer.ps1");
        std::fs::write(
            &path,
            "function Install {\n    Write-Information \"everything's installed!\"\n}\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn patches_shell_installer_after_anchor() {
        let tmp = TempDir::new().unwrap();
        let script = sh_script(tmp.path());

        let outcome = patch_installer(&script).unwrap();
        assert!(matches!(outcome, PatchOutcome::Patched { .. }));

        let body = std::fs::read_to_string(&script).unwrap();
        let anchor_at = body.find(SH_ANCHOR).unwrap();
        let block_at = body.find("runtime-shim/$_arch").unwrap();
        assert!(block_at > anchor_at, "block must follow the anchor line");
    }

    #[test]
    fn patches_powershell_installer_with_powershell_block() {
        let tmp = TempDir::new().unwrap();
        let script = ps1_script(tmp.path());

        patch_installer(&script).unwrap();
        let body = std::fs::read_to_string(&script).unwrap();
        assert!(body.contains("Copy-Item"), "expected PowerShell block: {body}");
        assert!(!body.contains("rm -rf"), "shell block must not leak into ps1");
    }

    #[test]
    fn second_patch_is_already_patched_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let script = sh_script(tmp.path());

        patch_installer(&script).unwrap();
        let after_first = std::fs::read_to_string(&script).unwrap();

        let outcome = patch_installer(&script).unwrap();
        assert!(matches!(outcome, PatchOutcome::AlreadyPatched { .. }));
        assert_eq!(std::fs::read_to_string(&script).unwrap(), after_first);
    }

    #[test]
    fn missing_script_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = patch_installer(&tmp.path().join("nope.sh")).unwrap_err();
        assert!(matches!(err, SyncError::ScriptNotFound { .. }), "got: {err}");
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("installer.bat");
        std::fs::write(&path, "echo hi\n").unwrap();
        let err = patch_installer(&path).unwrap_err();
        assert!(matches!(err, SyncError::UnsupportedScript { .. }), "got: {err}");
    }

    #[test]
    fn missing_anchor_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.sh");
        std::fs::write(&path, "#!/bin/sh\necho done\n").unwrap();
        let err = patch_installer(&path).unwrap_err();
        assert!(matches!(err, SyncError::AnchorNotFound { .. }), "got: {err}");
    }
}
