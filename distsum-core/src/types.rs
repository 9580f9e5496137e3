//! Domain types for the distsum manifest document.
//!
//! The manifest is a JSON document produced by the release pipeline:
//!
//! ```text
//! {
//!   "releases":  [ { "artifacts": [ <name> | <inline-object> ], ... } ],
//!   "artifacts": { <name>: { "path": ..., "checksums": { "sha256": ... } } }
//! }
//! ```
//!
//! Every struct carries a `#[serde(flatten)]` passthrough map so fields this
//! tool does not model survive a load → mutate → save round trip. `serde_json`
//! is built with `preserve_order`, keeping object key order stable; the
//! artifacts table itself is a `BTreeMap`, so its keys serialize in sorted
//! order.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed artifact name — the key into the manifest's artifacts
/// table, conventionally the artifact's file base name
/// (e.g. `myapp-1.2.0-x86_64-unknown-linux-gnu.tar.xz`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactName(pub String);

impl ArtifactName {
    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ArtifactName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ArtifactName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Document structs
// ---------------------------------------------------------------------------

/// Digest record for one artifact.
///
/// Only `sha256` is ever written by distsum; digests for other algorithms
/// pass through in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Checksums {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Checksums {
    /// True when no digest of any algorithm is recorded.
    pub fn is_empty(&self) -> bool {
        self.sha256.is_none() && self.extra.is_empty()
    }
}

/// One entry in the manifest's top-level artifacts table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ArtifactEntry {
    /// Path to the artifact file, as recorded by the release pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Checksums::is_empty")]
    pub checksums: Checksums,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A release's reference to an artifact: either a bare name indexing the
/// top-level artifacts table, or an inline object carrying its own fields.
///
/// Inline objects are opaque to distsum — carried through untouched, never
/// reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtifactRef {
    Name(ArtifactName),
    Inline(Value),
}

impl ArtifactRef {
    /// The referenced artifact name, when this reference is a bare name.
    pub fn name(&self) -> Option<&ArtifactName> {
        match self {
            ArtifactRef::Name(name) => Some(name),
            ArtifactRef::Inline(_) => None,
        }
    }
}

/// A single release recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Release {
    #[serde(default)]
    pub artifacts: Vec<ArtifactRef>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Root of the release manifest document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub releases: Vec<Release>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub artifacts: BTreeMap<ArtifactName, ArtifactEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Every artifact name referenced by a release, in document order, with
    /// duplicates preserved.
    ///
    /// Inline artifact objects and names that do not resolve in the artifacts
    /// table are skipped; unresolved references are tolerated, not errors.
    pub fn referenced_names(&self) -> Vec<&ArtifactName> {
        self.releases
            .iter()
            .flat_map(|release| release.artifacts.iter())
            .filter_map(ArtifactRef::name)
            .filter(|name| self.artifacts.contains_key(*name))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
