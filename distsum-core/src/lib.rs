//! Distsum core library — manifest document model, persistence, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and the typed manifest document
//! - [`error`] — [`ManifestError`]
//! - [`manifest`] — load / save
//!
//! The manifest is owned by the release pipeline; distsum only ever rewrites
//! `checksums.sha256` fields. Everything else passes through a load → mutate →
//! save round trip untouched.

pub mod error;
pub mod manifest;
pub mod types;

pub use error::ManifestError;
pub use types::{ArtifactEntry, ArtifactName, ArtifactRef, Checksums, Manifest, Release};
