//! `distsum status` — checksum agreement visibility.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use distsum_sync::pass::PassConfig;
use distsum_sync::staleness::{check_all, ArtifactStatus, StalenessSignal};

/// Arguments for `distsum status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Path to the release manifest (omit to audit sidecars only).
    pub manifest: Option<PathBuf>,

    /// Directory holding the build's distribution artifacts.
    #[arg(long, default_value = "target/distrib")]
    pub dist_dir: PathBuf,

    /// Product name; artifacts match `<product>-*.tar.xz` and `<product>-*.zip`.
    #[arg(long)]
    pub product: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let mut config = PassConfig::for_product(self.dist_dir, self.product);
        config.manifest_path = self.manifest;

        let statuses = check_all(&config)
            .with_context(|| format!("status check failed for '{}'", config.product))?;
        let stale = statuses.iter().filter(|s| s.is_stale()).count();

        if self.json {
            print_json(&config.product, &statuses, stale)?;
        } else {
            print_table(&config.product, &statuses, stale);
        }

        // Nonzero exit so CI can gate a release on checksum agreement.
        if stale > 0 {
            std::process::exit(1);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusReportJson {
    summary: StatusSummaryJson,
    artifacts: Vec<ArtifactStatusJson>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    product: String,
    artifacts: usize,
    stale: usize,
}

#[derive(Serialize)]
struct ArtifactStatusJson {
    artifact: String,
    status: String,
    detail: String,
    digest: String,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "artifact")]
    artifact: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn print_json(product: &str, statuses: &[ArtifactStatus], stale: usize) -> Result<()> {
    let payload = StatusReportJson {
        summary: StatusSummaryJson {
            product: product.to_string(),
            artifacts: statuses.len(),
            stale,
        },
        artifacts: statuses
            .iter()
            .map(|s| ArtifactStatusJson {
                artifact: artifact_label(s),
                status: signal_key(&s.signal).to_string(),
                detail: signal_detail(&s.signal),
                digest: s.digest.clone(),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(product: &str, statuses: &[ArtifactStatus], stale: usize) {
    println!(
        "distsum v{} | '{product}' | {} artifacts | {stale} stale",
        env!("CARGO_PKG_VERSION"),
        statuses.len(),
    );

    if statuses.is_empty() {
        println!("No artifacts found.");
        return;
    }

    println!(
        "Indicators: {} CURRENT  {} SIDECAR  {} MANIFEST  {} UNLISTED",
        "■".green().bold(),
        "■".red().bold(),
        "■".yellow().bold(),
        "■".bright_black().bold(),
    );

    let rows: Vec<StatusTableRow> = statuses
        .iter()
        .map(|s| StatusTableRow {
            artifact: artifact_label(s),
            status: signal_label(&s.signal).to_string(),
            detail: signal_detail(&s.signal),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if stale > 0 {
        println!("Run 'distsum update' to reconcile stale checksums.");
    }
}

fn artifact_label(status: &ArtifactStatus) -> String {
    status
        .path
        .file_name()
        .map_or_else(|| status.path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn signal_key(signal: &StalenessSignal) -> &'static str {
    match signal {
        StalenessSignal::Current => "current",
        StalenessSignal::MissingSidecar => "missing_sidecar",
        StalenessSignal::SidecarStale { .. } => "sidecar_stale",
        StalenessSignal::ManifestStale { .. } => "manifest_stale",
        StalenessSignal::Unlisted => "unlisted",
    }
}

fn signal_label(signal: &StalenessSignal) -> &'static str {
    match signal {
        StalenessSignal::Current => "CURRENT",
        StalenessSignal::MissingSidecar => "NO SIDECAR",
        StalenessSignal::SidecarStale { .. } => "SIDECAR STALE",
        StalenessSignal::ManifestStale { .. } => "MANIFEST STALE",
        StalenessSignal::Unlisted => "UNLISTED",
    }
}

fn signal_detail(signal: &StalenessSignal) -> String {
    match signal {
        StalenessSignal::Current => "up to date".to_string(),
        StalenessSignal::MissingSidecar => "no .sha256 sidecar file".to_string(),
        StalenessSignal::SidecarStale { recorded } => {
            format!("sidecar records {}", digest_preview(recorded))
        }
        StalenessSignal::ManifestStale { recorded: Some(recorded) } => {
            format!("manifest records {}", digest_preview(recorded))
        }
        StalenessSignal::ManifestStale { recorded: None } => {
            "manifest entry has no sha256".to_string()
        }
        StalenessSignal::Unlisted => "not in manifest artifacts table".to_string(),
    }
}

fn digest_preview(digest: &str) -> String {
    if digest.is_empty() {
        return "nothing".to_string();
    }
    let head: String = digest.chars().take(12).collect();
    format!("{head}…")
}
