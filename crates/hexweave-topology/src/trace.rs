//! Border tracing.
//!
//! A border loop is walked one `(node, edge)` pair at a time. From the
//! current pair the edge index advances clockwise; while the node still
//! touches the component in that direction the walk stays on the node,
//! otherwise it hops to the neighbour in that direction and resumes from the
//! edge pointing back. Because `d[i] + d[i + 2] == d[i + 1]`, the hop always
//! lands on a node that touches the same component cell, so consecutive
//! pairs share a cell or touch adjacent cells and every loop stays on one
//! connected piece.
//!
//! The edge index turns clockwise around each node, so on screen (`r`
//! growing downwards) perimeters wind counter-clockwise around the shape
//! and holes wind clockwise.

use crate::{BorderNode, Direction, Edges, HexPoint};

/// One step of a border loop: `point` touches the component across
/// `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderEdge {
    /// The border node.
    pub point: HexPoint,
    /// Direction from the node to the component cell it touches.
    pub direction: Direction,
}

impl BorderEdge {
    pub const fn new(point: HexPoint, direction: Direction) -> Self {
        Self { point, direction }
    }

    /// The component cell on the other side of this edge.
    pub const fn inner(&self) -> HexPoint {
        self.point.step(self.direction)
    }
}

impl std::fmt::Display for BorderEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.point, self.direction)
    }
}

/// Iterator over one closed border loop.
///
/// `lookup` returns the edge mask of a border node. Hitting a point that is
/// not a border node means the border index is corrupt, and the trace panics.
pub struct BorderTrace<F> {
    lookup: F,
    start: BorderEdge,
    next: Option<BorderEdge>,
}

impl<F> BorderTrace<F>
where
    F: Fn(HexPoint) -> Option<Edges>,
{
    /// Start a trace at `start`, whose edge bit must be set.
    pub fn new(start: BorderEdge, lookup: F) -> Self {
        debug_assert!(
            lookup(start.point).is_some_and(|edges| edges.contains(start.direction)),
            "trace start {start} is not a border edge"
        );
        Self {
            lookup,
            start,
            next: Some(start),
        }
    }

    fn advance(&self, from: BorderEdge) -> BorderEdge {
        let BorderEdge {
            mut point,
            mut direction,
        } = from;
        // A valid node needs at most one hop; two full turns means a broken mask.
        for _ in 0..2 * crate::DIRECTIONS {
            direction = direction.clockwise();
            let edges = match (self.lookup)(point) {
                Some(edges) if !edges.is_empty() => edges,
                _ => panic!("border trace from {} left the border at {point}", self.start),
            };
            if edges.contains(direction) {
                return BorderEdge::new(point, direction);
            }
            point = point.step(direction);
            direction = direction.opposite();
        }
        panic!("border trace from {} is stuck at {point}", self.start)
    }
}

impl<F> Iterator for BorderTrace<F>
where
    F: Fn(HexPoint) -> Option<Edges>,
{
    type Item = BorderEdge;

    fn next(&mut self) -> Option<BorderEdge> {
        let current = self.next?;
        let following = self.advance(current);
        self.next = (following != self.start).then_some(following);
        Some(current)
    }
}

/// Deterministic start for a loop: the smallest node, at the first run of
/// its mask (East for a full mask).
pub fn canonical_start<I>(nodes: I) -> Option<BorderEdge>
where
    I: IntoIterator<Item = (HexPoint, Edges)>,
{
    let (point, edges) = nodes.into_iter().min_by_key(|(point, _)| *point)?;
    let direction = BorderNode::of(edges)
        .edge_starts
        .first()
        .or_else(|| edges.first())?;
    Some(BorderEdge::new(point, direction))
}
