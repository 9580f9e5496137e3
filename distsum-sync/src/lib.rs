//! # distsum-sync
//!
//! Checksum reconciliation engine: digest computation, sidecar digest files,
//! manifest reconciliation, and installer-script propagation.
//!
//! Call [`run_pass`] to run the full reconciliation pass for a configured
//! product, or the per-component functions for finer control.

pub mod digest;
pub mod error;
pub mod installer;
pub mod pass;
pub mod propagate;
pub mod reconcile;
pub mod sidecar;
pub mod staleness;

pub use error::SyncError;
pub use pass::{run_pass, ArtifactOutcome, PassConfig, PassResult};
pub use propagate::ScriptResult;
pub use reconcile::ManifestOutcome;
pub use sidecar::SidecarResult;
pub use staleness::{ArtifactStatus, StalenessSignal};
