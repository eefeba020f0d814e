//! Hexweave Lattice Topology
//!
//! Incremental tracking of connected components, perimeters and holes for
//! sets of cells on a hexagonal lattice.
//!
//! # Model
//!
//! Cells are [`HexPoint`]s in axial coordinates with six neighbours each.
//! A [`Component`] is a maximal connected set of occupied cells. Every empty
//! cell touching a component is one of its border nodes and carries an
//! [`Edges`] mask of the directions in which it touches the component.
//! Border nodes form closed loops: the perimeter around the outside and one
//! loop per enclosed hole.
//!
//! [`LatticeMap`] and [`LatticeSet`] keep a partition of their points into
//! components up to date as points are inserted and removed, so perimeter
//! and hole queries never rescan the whole set.
//!
//! # Example
//!
//! ```
//! use hexweave_topology::{HexPoint, LatticeSet};
//!
//! let mut set: LatticeSet = HexPoint::ORIGIN.neighbors().into_iter().collect();
//! assert_eq!(set.component_count(), 1);
//! assert_eq!(set.holes().unwrap().len(), 1);
//!
//! set.insert(HexPoint::ORIGIN);
//! assert!(set.holes().unwrap().is_empty());
//! ```

mod collections;
mod component;
mod edges;
mod error;
mod hex;
mod map;
mod neighbors;
mod node;
mod set;
mod spiral;
mod trace;

pub use collections::{PointMap, PointSet};
pub use component::Component;
pub use edges::Edges;
pub use error::{Error, Result};
pub use hex::HexPoint;
pub use map::{ComponentKey, LatticeMap};
pub use neighbors::{are_neighbors, count_present_neighbors, direction_between, Direction};
pub use node::BorderNode;
pub use set::LatticeSet;
pub use spiral::{
    point_to_spiral, slots_in_ring, spiral_to_point, total_slots_through, Spiral, SpiralIndex,
};
pub use trace::{canonical_start, BorderEdge, BorderTrace};

/// Neighbours per lattice cell.
pub const DIRECTIONS: usize = 6;

const _: () = assert!(Direction::ALL.len() == DIRECTIONS);
const _: () = assert!(Edges::FULL.len() as usize == DIRECTIONS);
