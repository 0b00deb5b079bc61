//! Engine Errors
//!
//! Fatal configuration errors and persistence failures. Degenerate arithmetic
//! (zero denominators, empty pools, missing neighbors) is recovered locally in
//! the systems that encounter it and never surfaces here.

use thiserror::Error;

/// Errors surfaced by the simulation engine.
#[derive(Debug, Error)]
pub enum SimError {
    /// The engine cannot produce a tick without agents.
    #[error("population is empty; the simulation cannot run")]
    EmptyPopulation,

    /// A policy name not in the known set was requested.
    #[error("unknown tax policy '{0}'")]
    UnknownPolicy(String),

    /// A parameter name not in the tunable set was requested.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// A snapshot was written by an incompatible format version.
    #[error("unsupported snapshot version {found} (this build reads version {expected})")]
    SnapshotVersion { found: u32, expected: u32 },

    /// Reading or writing a snapshot or parameters file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be parsed.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),

    /// A parameters file could not be parsed.
    #[error("malformed parameters file: {0}")]
    MalformedParams(#[from] toml::de::Error),
}
