//! Six-bit neighbour masks.

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use crate::Direction;

/// A set of directions, one bit per [`Direction`].
///
/// On a border node, bit `i` set means the cell across direction `i` belongs
/// to the component.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Edges(u8);

impl Edges {
    /// No directions.
    pub const EMPTY: Self = Self(0);

    /// All six directions.
    pub const FULL: Self = Self(0b11_1111);

    /// Build from raw bits; bits above the sixth are dropped.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::FULL.0)
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// A mask with just `dir` set.
    #[inline]
    pub const fn single(dir: Direction) -> Self {
        Self(1 << dir.index())
    }

    /// Whether `dir` is set.
    #[inline]
    pub const fn contains(self, dir: Direction) -> bool {
        self.0 & (1 << dir.index()) != 0
    }

    /// Copy with `dir` set.
    #[inline]
    pub const fn with(self, dir: Direction) -> Self {
        Self(self.0 | (1 << dir.index()))
    }

    /// Copy with `dir` cleared.
    #[inline]
    pub const fn without(self, dir: Direction) -> Self {
        Self(self.0 & !(1 << dir.index()))
    }

    /// Set `dir`.
    #[inline]
    pub fn insert(&mut self, dir: Direction) {
        *self = self.with(dir);
    }

    /// Clear `dir`.
    #[inline]
    pub fn remove(&mut self, dir: Direction) {
        *self = self.without(dir);
    }

    /// Directions in `self` but not in `other`.
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_full(self) -> bool {
        self.0 == Self::FULL.0
    }

    /// Number of directions set.
    #[inline]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Lowest set direction.
    pub fn first(self) -> Option<Direction> {
        self.iter().next()
    }

    /// Mask rotated one step clockwise: bit `i` of the result is bit `i - 1`
    /// of `self`.
    #[inline]
    pub const fn rotate_clockwise(self) -> Self {
        Self(((self.0 << 1) | (self.0 >> 5)) & Self::FULL.0)
    }

    /// Iterate the set directions in clockwise order from East.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |dir| self.contains(*dir))
    }
}

impl BitOr for Edges {
    type Output = Self;

    #[inline]
    fn bitor(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOrAssign for Edges {
    #[inline]
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitAnd for Edges {
    type Output = Self;

    #[inline]
    fn bitand(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }
}

impl Not for Edges {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self(!self.0 & Self::FULL.0)
    }
}

impl FromIterator<Direction> for Edges {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl std::fmt::Debug for Edges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Edges({:06b})", self.0)
    }
}

impl std::fmt::Display for Edges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for dir in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(dir.label())?;
            first = false;
        }
        if first {
            f.write_str("-")?;
        }
        Ok(())
    }
}
