//! Border node classification.
//!
//! A border node is a cell outside a component that touches it. Its
//! [`Edges`] mask splits into maximal runs of set bits (stretches of
//! component cells around it) separated by runs of unset bits (gaps).
//!
//! The concavity of a node is the net turning, in 60 degree units, that a
//! boundary walk makes while passing it: a run of `n` set bits contributes
//! `n - 2`, a full mask contributes `6`. Summed over a closed loop this is
//! `-6` for an outer perimeter and `+6` for a hole.

use crate::Edges;

/// Classification of a border node's edge mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderNode {
    /// The mask that was classified.
    pub edges: Edges,
    /// Net boundary turning at this node.
    pub concavity: i8,
    /// Directions that begin a maximal run of set bits.
    pub edge_starts: Edges,
    /// Directions that begin a maximal run of unset bits.
    pub gap_starts: Edges,
}

const TABLE: [BorderNode; 64] = build_table();

const fn build_table() -> [BorderNode; 64] {
    let mut table = [BorderNode::classify(Edges::EMPTY); 64];
    let mut bits = 0;
    while bits < 64 {
        table[bits] = BorderNode::classify(Edges::from_bits(bits as u8));
        bits += 1;
    }
    table
}

impl BorderNode {
    /// Classify a mask from scratch.
    pub const fn classify(edges: Edges) -> Self {
        let bits = edges.bits();
        let previous = edges.rotate_clockwise().bits();
        let edge_starts = Edges::from_bits(bits & !previous);
        let gap_starts = Edges::from_bits(!bits & previous);

        let concavity = if edges.is_full() {
            6
        } else {
            edges.len() as i8 - 2 * edge_starts.len() as i8
        };

        Self {
            edges,
            concavity,
            edge_starts,
            gap_starts,
        }
    }

    /// Table lookup of [`BorderNode::classify`].
    #[inline]
    pub const fn of(edges: Edges) -> Self {
        TABLE[edges.bits() as usize]
    }

    /// Number of maximal runs of set bits. A full mask is one run.
    pub const fn runs(&self) -> u32 {
        if self.edges.is_full() {
            1
        } else {
            self.edge_starts.len()
        }
    }

    /// More than one run of set bits: an occupied cell with this neighbour
    /// mask may disconnect its component when removed.
    pub const fn is_bridge(&self) -> bool {
        self.edge_starts.len() > 1
    }

    /// More than one gap: filling this cell may split its border loop.
    pub const fn is_pinch(&self) -> bool {
        self.gap_starts.len() > 1
    }
}
