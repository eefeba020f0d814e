//! Hexweave Tessellation
//!
//! Finds the ways a hexagonal polyform tiles the plane by translation.
//! The search is built entirely on the topology queries of
//! `hexweave-topology`: translated copies, overlap and adjacency tests and
//! hole detection.
//!
//! ```
//! use hexweave_tessellate::{find_tilings, SearchConfig};
//! use hexweave_topology::{HexPoint, LatticeSet, Spiral};
//!
//! let flower: LatticeSet = Spiral::disk(HexPoint::ORIGIN, 1).collect();
//! let tilings = find_tilings(&flower, &SearchConfig::default()).unwrap();
//! assert!(tilings.iter().all(|t| t.area() == 7));
//! ```

mod error;
mod search;
mod tiling;

pub use error::{Error, Result};
pub use search::{find_tilings, neighbor_offsets, SearchConfig};
pub use tiling::Tiling;
