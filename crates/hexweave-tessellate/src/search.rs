//! Lattice tiling search.
//!
//! A tile with `n` cells tiles the plane by translation along a lattice
//! `<u, v>` when `|u x v| = n` and its translates neither overlap nor leave
//! gaps. Gaps and overlaps can only show up next to the central copy, so it
//! is enough to place the six surrounding copies and check that they are
//! disjoint and cover every empty cell touching the center.

use std::collections::HashSet;

use hexweave_topology::{Error as TopologyError, HexPoint, LatticeSet, Spiral};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::tiling::Tiling;

/// Search limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Largest ring searched for neighbour offsets.
    pub max_radius: u64,
    /// Stop after this many distinct lattices.
    pub max_tilings: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_radius: 8,
            max_tilings: 16,
        }
    }
}

/// Find distinct lattice tilings of `shape`, nearest offsets first.
pub fn find_tilings(shape: &LatticeSet, config: &SearchConfig) -> Result<Vec<Tiling>> {
    if shape.is_empty() {
        return Err(Error::EmptyShape);
    }
    if !shape.is_connected() {
        return Err(Error::Disconnected {
            components: shape.component_count(),
        });
    }
    let holes = shape.holes()?;
    if !holes.is_empty() {
        return Err(Error::HasHoles { holes: holes.len() });
    }

    let area = shape.len() as i64;
    let candidates = neighbor_offsets(shape, config.max_radius);
    trace!(candidates = candidates.len(), "neighbour offsets");

    let mut seen = HashSet::new();
    let mut tilings = Vec::new();
    'search: for (i, &u) in candidates.iter().enumerate() {
        for &v in &candidates[i + 1..] {
            if u.cross(v).abs() != area {
                continue;
            }
            let tiling = Tiling::new(u, v);
            let form = tiling.hermite_form();
            if seen.contains(&form) {
                continue;
            }
            // Only marked seen once accepted: `surrounds` can reject one basis
            // of a lattice that another basis of it passes.
            if !surrounds(shape, &tiling)? {
                continue;
            }
            trace!(%tiling, "tiling found");
            seen.insert(form);
            tilings.push(tiling);
            if tilings.len() >= config.max_tilings {
                break 'search;
            }
        }
    }
    debug!(cells = shape.len(), found = tilings.len(), "tiling search finished");
    Ok(tilings)
}

/// Offsets within `max_radius` at which a copy of `shape` touches it
/// without overlapping.
pub fn neighbor_offsets(shape: &LatticeSet, max_radius: u64) -> Vec<HexPoint> {
    if max_radius == 0 {
        return Vec::new();
    }
    Spiral::rings(1, max_radius)
        .filter(|&offset| {
            let copy = shape.translate(offset);
            !copy.overlaps(shape) && copy.adjacent_to(shape)
        })
        .collect()
}

/// Whether the six copies around `shape` are pairwise disjoint and close
/// every gap next to it.
fn surrounds(shape: &LatticeSet, tiling: &Tiling) -> Result<bool> {
    let mut patch = shape.clone();
    for offset in tiling.neighbor_offsets() {
        match patch.merge(shape.translate(offset)) {
            Ok(()) => {}
            Err(TopologyError::Overlap { .. }) => return Ok(false),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(shape.adjacent().all(|cell| patch.contains(cell)))
}
