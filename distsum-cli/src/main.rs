//! Distsum — release checksum reconciliation CLI.
//!
//! # Usage
//!
//! ```text
//! distsum update [MANIFEST] --dist-dir <dir> --product <name> [--dry-run]
//! distsum status [MANIFEST] --dist-dir <dir> --product <name> [--json]
//! distsum patch-installer <script>
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{patch::PatchArgs, status::StatusArgs, update::UpdateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "distsum",
    version,
    about = "Reconcile release artifact checksums across sidecars, manifest, and installer scripts",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recompute artifact digests; update sidecars, manifest, and installer scripts.
    Update(UpdateArgs),

    /// Report which sidecar and manifest digests are stale.
    Status(StatusArgs),

    /// Insert the runtime-shim copy block into a generated installer script.
    PatchInstaller(PatchArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Update(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::PatchInstaller(args) => args.run(),
    }
}
