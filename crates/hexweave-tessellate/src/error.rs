//! Error types for hexweave-tessellate.

use thiserror::Error;

/// Result type for tiling searches.
pub type Result<T> = std::result::Result<T, Error>;

/// Shapes the search refuses to tile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("cannot tile an empty shape")]
    EmptyShape,

    /// Every copy of the tile must be one connected piece.
    #[error("shape has {components} components, expected one")]
    Disconnected { components: usize },

    /// A tile with holes leaves cells no translate can reach.
    #[error("shape encloses {holes} hole(s)")]
    HasHoles { holes: usize },

    #[error("topology error: {0}")]
    Topology(#[from] hexweave_topology::Error),
}
