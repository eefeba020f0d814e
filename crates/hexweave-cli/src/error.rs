//! Error types for the hexweave CLI.

use thiserror::Error;

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad command line; the usage text is printed after the message.
    #[error("{0}")]
    Usage(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("topology error: {0}")]
    Topology(#[from] hexweave_topology::Error),

    #[error("tiling error: {0}")]
    Tessellate(#[from] hexweave_tessellate::Error),
}
