//! `distsum update` — run the reconciliation pass.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use distsum_sync::pass::{run_pass, PassConfig};
use distsum_sync::{ArtifactOutcome, PassResult, ScriptResult, SidecarResult};

/// Arguments for `distsum update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Path to the release manifest (omit to skip manifest reconciliation).
    pub manifest: Option<PathBuf>,

    /// Directory holding the build's distribution artifacts.
    #[arg(long, default_value = "target/distrib")]
    pub dist_dir: PathBuf,

    /// Product name; artifacts match `<product>-*.tar.xz` and `<product>-*.zip`.
    #[arg(long)]
    pub product: String,

    /// Installer script to receive digest propagation (repeatable; defaults
    /// to `<dist-dir>/<product>-installer.sh` and `.ps1`).
    #[arg(long = "installer-script")]
    pub installer_scripts: Vec<PathBuf>,

    /// Show what would change without writing any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl UpdateArgs {
    pub fn run(self) -> Result<()> {
        let mut config = PassConfig::for_product(self.dist_dir, self.product);
        config.manifest_path = self.manifest;
        if !self.installer_scripts.is_empty() {
            config.scripts = self.installer_scripts;
        }

        let result = run_pass(&config, self.dry_run)
            .with_context(|| format!("update pass failed for '{}'", config.product))?;
        print_result(&config.product, &result, self.dry_run);
        Ok(())
    }
}

fn print_result(product: &str, result: &PassResult, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    if result.artifacts.is_empty() {
        println!("{prefix}✓ '{product}' — no artifacts found");
        return;
    }

    let written = result
        .artifacts
        .iter()
        .filter(|a| {
            matches!(
                a,
                ArtifactOutcome::Processed {
                    sidecar: SidecarResult::Written { .. } | SidecarResult::WouldWrite { .. },
                    ..
                }
            )
        })
        .count();
    let unchanged = result
        .artifacts
        .iter()
        .filter(|a| {
            matches!(
                a,
                ArtifactOutcome::Processed {
                    sidecar: SidecarResult::Unchanged { .. },
                    ..
                }
            )
        })
        .count();
    let skipped = result.skipped();

    println!(
        "{prefix}✓ '{product}' reconciled ({written} written, {unchanged} unchanged, {skipped} skipped)"
    );

    for outcome in &result.artifacts {
        match outcome {
            ArtifactOutcome::Processed { sidecar, .. } => match sidecar {
                SidecarResult::Written { path } => println!("  ✎  {}", path.display()),
                SidecarResult::WouldWrite { path } => println!("  ~  {}", path.display()),
                SidecarResult::Unchanged { path } => println!("  ·  {}", path.display()),
            },
            ArtifactOutcome::Skipped { path, reason } => {
                println!("  !  {} ({reason})", path.display());
            }
        }
    }

    if let Some(outcome) = &result.manifest {
        if outcome.written {
            println!("  ✎  manifest ({} digest(s) updated)", outcome.updated.len());
        } else if outcome.updated.is_empty() {
            println!("  ·  manifest (digests current)");
        } else {
            println!("  ~  manifest ({} digest(s) would update)", outcome.updated.len());
        }
    }

    for script in &result.scripts {
        match script {
            ScriptResult::Rewritten { path } => println!("  ✎  {}", path.display()),
            ScriptResult::WouldRewrite { path } => println!("  ~  {}", path.display()),
            ScriptResult::Unchanged { path } => println!("  ·  {}", path.display()),
            ScriptResult::Missing { path } => println!("  ·  {} (not present)", path.display()),
        }
    }
}
