//! Hexagonal lattice points in axial coordinates.
//!
//! Axial coordinates use two axes (q, r) at 60 degrees, with an implicit
//! third axis s = -q - r. Screen orientation is pointy-top with `r` growing
//! downwards, so the six neighbour directions run clockwise from the right.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::neighbors::Direction;

/// A cell of the hexagonal lattice.
///
/// Points are plain values: equality, hashing and ordering are by `(q, r)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HexPoint {
    /// First axial coordinate
    pub q: i64,
    /// Second axial coordinate
    pub r: i64,
}

impl HexPoint {
    /// Origin of the lattice.
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    /// Create a new point.
    pub const fn new(q: i64, r: i64) -> Self {
        Self { q, r }
    }

    /// Compute the implicit third axis: s = -q - r.
    pub const fn s(&self) -> i64 {
        -self.q - self.r
    }

    /// The neighbouring cell across `direction`.
    #[inline]
    pub const fn step(self, direction: Direction) -> Self {
        let offset = direction.offset();
        Self {
            q: self.q + offset.q,
            r: self.r + offset.r,
        }
    }

    /// All six neighbours, indexed by [`Direction::index`].
    pub fn neighbors(self) -> [Self; 6] {
        Direction::ALL.map(|dir| self.step(dir))
    }

    /// Hexagonal distance: max(|dq|, |dr|, |ds|) where ds = -dq - dr.
    pub fn distance(&self, other: &Self) -> u64 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = ((self.q - other.q) + (self.r - other.r)).unsigned_abs();
        dq.max(dr).max(ds)
    }

    /// Ring number around the origin (0 = origin, 1 = first ring, etc.)
    pub fn ring(&self) -> u64 {
        self.distance(&Self::ORIGIN)
    }

    /// Signed area of the parallelogram spanned by two lattice vectors,
    /// in units of cells.
    pub const fn cross(self, other: Self) -> i64 {
        self.q * other.r - self.r * other.q
    }
}

impl Add for HexPoint {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            q: self.q + other.q,
            r: self.r + other.r,
        }
    }
}

impl AddAssign for HexPoint {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.q += other.q;
        self.r += other.r;
    }
}

impl Sub for HexPoint {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            q: self.q - other.q,
            r: self.r - other.r,
        }
    }
}

impl Neg for HexPoint {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            q: -self.q,
            r: -self.r,
        }
    }
}

impl Mul<i64> for HexPoint {
    type Output = Self;

    #[inline]
    fn mul(self, factor: i64) -> Self {
        Self {
            q: self.q * factor,
            r: self.r * factor,
        }
    }
}

impl From<(i64, i64)> for HexPoint {
    fn from((q, r): (i64, i64)) -> Self {
        Self { q, r }
    }
}

impl std::fmt::Display for HexPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}
