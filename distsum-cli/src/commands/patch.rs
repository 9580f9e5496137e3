//! `distsum patch-installer` — insert the runtime-shim copy block.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use distsum_sync::installer::{patch_installer, PatchOutcome};

/// Arguments for `distsum patch-installer`.
#[derive(Args, Debug)]
pub struct PatchArgs {
    /// Path to the generated installer script (.sh or .ps1).
    pub script: PathBuf,
}

impl PatchArgs {
    pub fn run(self) -> Result<()> {
        let outcome = patch_installer(&self.script)
            .with_context(|| format!("failed to patch '{}'", self.script.display()))?;

        match outcome {
            PatchOutcome::Patched { path } => {
                println!("✎  patched {}", path.display());
            }
            PatchOutcome::AlreadyPatched { path } => {
                println!("·  already patched {}", path.display());
            }
        }
        Ok(())
    }
}
