//! The six neighbour directions of a hex cell.
//!
//! Directions are numbered clockwise starting from the right:
//! East, SouthEast, SouthWest, West, NorthWest, NorthEast. Consecutive
//! directions are 60 degrees apart and `d[i] + d[i + 2] == d[i + 1]`, which
//! is what lets the border trace hop between neighbouring border nodes.

use crate::{HexPoint, DIRECTIONS};

/// A neighbour direction on the hex lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    /// (+1, 0)
    East = 0,
    /// (0, +1)
    SouthEast = 1,
    /// (-1, +1)
    SouthWest = 2,
    /// (-1, 0)
    West = 3,
    /// (0, -1)
    NorthWest = 4,
    /// (+1, -1)
    NorthEast = 5,
}

impl Direction {
    /// All directions in clockwise order, starting from the right.
    pub const ALL: [Self; DIRECTIONS] = [
        Self::East,
        Self::SouthEast,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
        Self::NorthEast,
    ];

    const OFFSETS: [HexPoint; DIRECTIONS] = [
        HexPoint::new(1, 0),
        HexPoint::new(0, 1),
        HexPoint::new(-1, 1),
        HexPoint::new(-1, 0),
        HexPoint::new(0, -1),
        HexPoint::new(1, -1),
    ];

    /// Position of this direction in [`Direction::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for an index, taken modulo 6.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % DIRECTIONS]
    }

    /// The axial step vector.
    #[inline]
    pub const fn offset(self) -> HexPoint {
        Self::OFFSETS[self as usize]
    }

    /// The direction pointing back.
    #[inline]
    pub const fn opposite(self) -> Self {
        Self::from_index(self as usize + 3)
    }

    /// Next direction clockwise.
    #[inline]
    pub const fn clockwise(self) -> Self {
        Self::from_index(self as usize + 1)
    }

    /// Next direction counter-clockwise.
    #[inline]
    pub const fn counter_clockwise(self) -> Self {
        Self::from_index(self as usize + DIRECTIONS - 1)
    }

    /// Short compass label, used by `Display` impls.
    pub const fn label(self) -> &'static str {
        match self {
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
            Self::NorthEast => "NE",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The direction leading from `from` to its neighbour `to`, if they are adjacent.
pub fn direction_between(from: HexPoint, to: HexPoint) -> Option<Direction> {
    let diff = to - from;
    Direction::ALL.into_iter().find(|dir| dir.offset() == diff)
}

/// Check if two points are lattice neighbours.
pub fn are_neighbors(a: HexPoint, b: HexPoint) -> bool {
    direction_between(a, b).is_some()
}

/// Count how many of a point's six neighbours are present.
pub fn count_present_neighbors<F>(point: HexPoint, is_present: F) -> usize
where
    F: Fn(HexPoint) -> bool,
{
    point
        .neighbors()
        .iter()
        .filter(|&&n| is_present(n))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_satisfy_hex_identity() {
        // d[i] + d[i + 2] == d[i + 1]
        for dir in Direction::ALL {
            let sum = dir.offset() + dir.clockwise().clockwise().offset();
            assert_eq!(sum, dir.clockwise().offset(), "identity fails at {dir}");
        }
    }

    #[test]
    fn opposite_offsets_cancel() {
        for dir in Direction::ALL {
            assert_eq!(dir.offset() + dir.opposite().offset(), HexPoint::ORIGIN);
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn rotation_round_trips() {
        for dir in Direction::ALL {
            assert_eq!(dir.clockwise().counter_clockwise(), dir);
            assert_eq!(Direction::from_index(dir.index() + 6), dir);
        }
    }

    #[test]
    fn direction_between_neighbors() {
        let origin = HexPoint::ORIGIN;
        for dir in Direction::ALL {
            assert_eq!(direction_between(origin, origin.step(dir)), Some(dir));
        }
        assert_eq!(direction_between(origin, HexPoint::new(2, 0)), None);
        assert_eq!(direction_between(origin, origin), None);
    }

    #[test]
    fn neighbor_relation_is_symmetric() {
        let a = HexPoint::new(3, -1);
        for n in a.neighbors() {
            assert!(are_neighbors(a, n));
            assert!(are_neighbors(n, a));
        }
        assert!(!are_neighbors(a, HexPoint::new(5, -1)));
    }

    #[test]
    fn count_present() {
        let present = |p: HexPoint| p.q > 0;
        // East (1,0) and NorthEast (1,-1) have q > 0
        assert_eq!(count_present_neighbors(HexPoint::ORIGIN, present), 2);
        assert_eq!(count_present_neighbors(HexPoint::ORIGIN, |_| true), 6);
        assert_eq!(count_present_neighbors(HexPoint::ORIGIN, |_| false), 0);
    }
}
