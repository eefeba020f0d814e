//! Fx hash containers keyed by lattice point.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::HexPoint;

/// Map keyed by lattice point.
pub type PointMap<V> = FxHashMap<HexPoint, V>;

/// Set of lattice points.
pub type PointSet = FxHashSet<HexPoint>;
