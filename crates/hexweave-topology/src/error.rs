//! Error types for hexweave-topology.

use thiserror::Error;

use crate::HexPoint;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Precondition violations reported by components and lattice maps.
///
/// After a component operation fails the component should be discarded:
/// operations do not roll back partial work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The point is not a border node of the component, so it cannot be added.
    #[error("{point} is not adjacent to the component")]
    NotAdjacent { point: HexPoint },

    /// The point is not part of the component.
    #[error("{point} is not a member of the component")]
    NotMember { point: HexPoint },

    /// Components never become empty through deletion.
    #[error("cannot delete {point}: it is the last point of its component")]
    LastPoint { point: HexPoint },

    /// Two structures that must be disjoint share a point.
    #[error("overlap at {point}")]
    Overlap { point: HexPoint },

    /// Merge seeds must be lattice neighbours.
    #[error("merge seeds {first} and {second} are not adjacent")]
    SeedsNotAdjacent { first: HexPoint, second: HexPoint },

    /// Perimeter and hole queries need exactly one component.
    #[error("expected one connected component, found {components}")]
    Disconnected { components: usize },
}
