//! Subcommand implementations for the `distsum` binary.

pub mod patch;
pub mod status;
pub mod update;
