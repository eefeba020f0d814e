//! Spiral enumeration of the lattice.
//!
//! Points are numbered ring by ring outward from a center. Ring `n` starts
//! at its north-west corner, `center + n * NW`, and walks `n` steps along
//! each of E, SE, SW, W, NW and NE, returning to the corner.
//!
//! - Ring 0: just the center (1 slot)
//! - Ring n > 0: the `6n` points at distance `n`
//!
//! Tiling searches use the spiral to visit candidate offsets nearest first.

use crate::{Direction, HexPoint};

/// Walk order of the six ring sides.
const SIDES: [Direction; 6] = [
    Direction::East,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
    Direction::NorthEast,
];

/// Position of a point in the spiral around the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpiralIndex(pub u64);

impl SpiralIndex {
    pub const ORIGIN: Self = Self(0);

    #[inline]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Ring this index falls in.
    ///
    /// Ring 0: index 0
    /// Ring 1: indices 1-6
    /// Ring 2: indices 7-18
    pub fn ring(&self) -> u64 {
        if self.0 == 0 {
            return 0;
        }

        // Smallest n with total_slots_through(n) > index.
        let mut low = 1u64;
        let mut high = 1u64;
        while total_slots_through(high) <= self.0 {
            high *= 2;
        }
        while low < high {
            let mid = (low + high) / 2;
            if total_slots_through(mid) <= self.0 {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }

    /// Offset within the ring (0 to 6n-1 for ring n > 0).
    pub fn offset_in_ring(&self) -> u64 {
        let ring = self.ring();
        if ring == 0 {
            return 0;
        }
        self.0 - total_slots_through(ring - 1)
    }
}

impl From<u64> for SpiralIndex {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SpiralIndex> for u64 {
    fn from(value: SpiralIndex) -> Self {
        value.0
    }
}

/// Number of points in ring n.
#[inline]
pub const fn slots_in_ring(ring: u64) -> u64 {
    if ring == 0 {
        1
    } else {
        6 * ring
    }
}

/// Points in rings 0 through n: `1 + 3n(n+1)`.
#[inline]
pub const fn total_slots_through(ring: u64) -> u64 {
    1 + 3 * ring * (ring + 1)
}

/// Iterator over the points of a range of rings around a center.
#[derive(Debug, Clone)]
pub struct Spiral {
    center: HexPoint,
    current: u64,
    limit: Option<u64>,
}

impl Spiral {
    /// Endless spiral around the origin.
    pub fn new() -> Self {
        Self::around(HexPoint::ORIGIN)
    }

    /// Endless spiral around `center`.
    pub fn around(center: HexPoint) -> Self {
        Self {
            center,
            current: 0,
            limit: None,
        }
    }

    /// The first `count` points around the origin.
    pub fn take_slots(count: u64) -> Self {
        Self {
            center: HexPoint::ORIGIN,
            current: 0,
            limit: Some(count),
        }
    }

    /// Rings `start_ring..=end_ring` around the origin.
    pub fn rings(start_ring: u64, end_ring: u64) -> Self {
        Self::rings_around(HexPoint::ORIGIN, start_ring, end_ring)
    }

    /// Rings `start_ring..=end_ring` around `center`.
    pub fn rings_around(center: HexPoint, start_ring: u64, end_ring: u64) -> Self {
        let start_slot = if start_ring == 0 {
            0
        } else {
            total_slots_through(start_ring - 1)
        };
        Self {
            center,
            current: start_slot,
            limit: Some(total_slots_through(end_ring)),
        }
    }

    /// Every point within `radius` of `center`.
    pub fn disk(center: HexPoint, radius: u64) -> Self {
        Self::rings_around(center, 0, radius)
    }
}

impl Default for Spiral {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Spiral {
    type Item = HexPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(limit) = self.limit {
            if self.current >= limit {
                return None;
            }
        }

        let point = self.center + spiral_to_point(SpiralIndex(self.current));
        self.current += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.limit {
            Some(limit) => {
                let remaining = limit.saturating_sub(self.current) as usize;
                (remaining, Some(remaining))
            }
            None => (usize::MAX, None),
        }
    }
}

fn corner(ring: i64, side: usize) -> HexPoint {
    let mut corner = Direction::NorthWest.offset() * ring;
    for &dir in &SIDES[..side] {
        corner += dir.offset() * ring;
    }
    corner
}

/// Point at a spiral index around the origin.
pub fn spiral_to_point(index: SpiralIndex) -> HexPoint {
    if index.0 == 0 {
        return HexPoint::ORIGIN;
    }

    let ring = index.ring();
    let offset = index.offset_in_ring();
    let side = (offset / ring) as usize;
    let along = (offset % ring) as i64;

    corner(ring as i64, side) + SIDES[side].offset() * along
}

/// Spiral index of a point relative to the origin. Inverse of
/// [`spiral_to_point`].
pub fn point_to_spiral(point: HexPoint) -> SpiralIndex {
    if point == HexPoint::ORIGIN {
        return SpiralIndex::ORIGIN;
    }

    let ring = point.ring();
    let n = ring as i64;
    let base = total_slots_through(ring - 1);
    for (side, dir) in SIDES.iter().enumerate() {
        let delta = point - corner(n, side);
        let along = delta.q.abs().max(delta.r.abs());
        if along < n && dir.offset() * along == delta {
            return SpiralIndex(base + side as u64 * ring + along as u64);
        }
    }
    unreachable!("{point} at distance {ring} is on no side of its ring")
}
