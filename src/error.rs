//! Error types for diff sessions.

use thiserror::Error;

use crate::models::Side;

/// Failure reported by the host editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The editor behind the host has been torn down
    #[error("editor has been torn down")]
    Detached,

    #[error("editor query failed: {0}")]
    Query(String),
}

/// A diff sequence that does not describe the texts it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error("diff does not reconstruct the {0} text")]
    Inconsistent(Side),
}

/// Errors returned from session entry points.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("host failure: {0}")]
    Host(#[from] HostError),

    #[error("recompute failed: {0}")]
    Diff(#[from] DiffError),

    /// A host failure happened earlier; the session no longer schedules work.
    #[error("session is no longer valid")]
    Invalid,
}

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
