//! Connected regions and their border loops.
//!
//! A [`Component`] is a connected set of occupied cells together with every
//! empty cell touching it (its border nodes). Border nodes are grouped into
//! closed loops, one per empty region the component touches: the loop around
//! the outside is the perimeter, every other loop is a hole.
//!
//! Each node carries the [`Edges`] mask of the component cells around it,
//! and each loop carries the sum of its nodes' concavity. That sum is `-6`
//! for the perimeter and `+6` for a hole, so whenever an edit re-splits loops
//! the perimeter is recovered from the sign alone.
//!
//! Edits touch only the cells around the edited point, plus one border trace
//! when the edit may have cut or joined loops.

use std::collections::VecDeque;

use slotmap::{new_key_type, SecondaryMap, SlotMap};
use tracing::trace;

use crate::collections::{PointMap, PointSet};
use crate::error::{Error, Result};
use crate::neighbors::are_neighbors;
use crate::trace::{canonical_start, BorderEdge, BorderTrace};
use crate::{BorderNode, Direction, Edges, HexPoint, DIRECTIONS};

new_key_type! {
    /// Handle of a border loop within one component.
    struct BorderKey;
}

#[derive(Debug, Clone, Copy)]
struct Node {
    edges: Edges,
    border: BorderKey,
}

#[derive(Debug, Clone, Default)]
struct Border {
    nodes: PointSet,
    concavity: i64,
}

#[inline]
fn concavity(edges: Edges) -> i64 {
    i64::from(BorderNode::of(edges).concavity)
}

fn push_unique(keys: &mut Vec<BorderKey>, key: BorderKey) {
    if !keys.contains(&key) {
        keys.push(key);
    }
}

/// A connected set of lattice points with its perimeter and holes.
#[derive(Debug, Clone)]
pub struct Component {
    points: PointSet,
    nodes: PointMap<Node>,
    borders: SlotMap<BorderKey, Border>,
    perimeter: BorderKey,
}

impl Component {
    /// A one-point component; its perimeter is the six neighbours of `seed`.
    pub fn new(seed: HexPoint) -> Self {
        let mut component = Self::empty();
        let perimeter = component.borders.insert(Border::default());
        component.perimeter = perimeter;
        component.points.insert(seed);
        for dir in Direction::ALL {
            component.insert_node(seed.step(dir), Edges::single(dir.opposite()), perimeter);
        }
        component
    }

    /// Allocation half of the two-phase constructor used by splits and
    /// translations; callers fill in points, nodes and borders.
    fn empty() -> Self {
        Self {
            points: PointSet::default(),
            nodes: PointMap::default(),
            borders: SlotMap::with_key(),
            perimeter: BorderKey::default(),
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Components are never empty once built.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, point: HexPoint) -> bool {
        self.points.contains(&point)
    }

    /// The member points, in no particular order.
    pub fn points(&self) -> impl Iterator<Item = HexPoint> + '_ {
        self.points.iter().copied()
    }

    /// Edge mask of a border node, `None` for points not on any border.
    pub fn edges_at(&self, point: HexPoint) -> Option<Edges> {
        self.nodes.get(&point).map(|node| node.edges)
    }

    /// Every border node with its mask, in no particular order.
    pub fn border_nodes(&self) -> impl Iterator<Item = (HexPoint, Edges)> + '_ {
        self.nodes.iter().map(|(&p, node)| (p, node.edges))
    }

    pub fn is_border(&self, point: HexPoint) -> bool {
        self.nodes.contains_key(&point)
    }

    /// Number of border loops, perimeter included.
    pub fn border_count(&self) -> usize {
        self.borders.len()
    }

    pub fn hole_count(&self) -> usize {
        self.borders.len().saturating_sub(1)
    }

    /// Number of `(node, edge)` pairs on the perimeter.
    pub fn perimeter_len(&self) -> usize {
        self.edge_count(self.perimeter)
    }

    /// Fill `point`, which must currently be a border node.
    ///
    /// Filling a node whose mask has more than one gap may cut its loop in
    /// several pieces, so that loop is re-traced and split.
    pub fn add(&mut self, point: HexPoint) -> Result<()> {
        let node = self.remove_node(point).ok_or(Error::NotAdjacent { point })?;
        self.points.insert(point);

        for dir in Direction::ALL {
            if node.edges.contains(dir) {
                continue;
            }
            let neighbor = point.step(dir);
            let facing = Edges::single(dir.opposite());
            match self.nodes.get(&neighbor) {
                Some(existing) => {
                    debug_assert!(existing.border == node.border);
                    let edges = existing.edges | facing;
                    self.set_edges(neighbor, edges);
                }
                None => self.insert_node(neighbor, facing, node.border),
            }
        }

        if BorderNode::of(node.edges).is_pinch() {
            let loops = self.split_border(node.border);
            trace!(%point, loops = loops.len(), "filled pinch point");
            if node.border == self.perimeter {
                self.settle_perimeter(loops);
            }
        } else if self.borders[node.border].nodes.is_empty() {
            // A one-cell hole was filled.
            self.borders.remove(node.border);
        }
        Ok(())
    }

    /// Vacate `point`, returning any pieces that are no longer connected to
    /// the rest.
    ///
    /// The vacated point joins every loop it touches into one. If its
    /// remaining member neighbours form several runs lying on different
    /// loops, the component fell apart: the pieces are flooded in lockstep
    /// and all but the last one still growing are moved into new components.
    pub fn delete(&mut self, point: HexPoint) -> Result<Vec<Component>> {
        if !self.points.contains(&point) {
            return Err(Error::NotMember { point });
        }
        if self.points.len() == 1 {
            return Err(Error::LastPoint { point });
        }
        self.points.remove(&point);

        let mut edges = Edges::EMPTY;
        let mut touched = Vec::with_capacity(DIRECTIONS);
        for dir in Direction::ALL {
            let neighbor = point.step(dir);
            if self.points.contains(&neighbor) {
                edges.insert(dir);
                continue;
            }
            let node = self.node(neighbor);
            push_unique(&mut touched, node.border);
            self.set_edges(neighbor, node.edges.without(dir.opposite()));
        }

        let target = touched
            .iter()
            .copied()
            .find(|&key| key == self.perimeter)
            .or_else(|| {
                touched
                    .iter()
                    .copied()
                    .max_by_key(|&key| self.borders[key].nodes.len())
            });
        let border = match target {
            Some(target) => {
                for &key in &touched {
                    self.absorb_border(target, key);
                }
                target
            }
            // Fully enclosed: the point opens a one-cell hole.
            None => self.borders.insert(Border::default()),
        };
        self.insert_node(point, edges, border);

        let classified = BorderNode::of(edges);
        if !classified.is_bridge() {
            return Ok(Vec::new());
        }
        let groups = self.loop_groups(point, classified.edge_starts);
        if groups.len() < 2 {
            return Ok(Vec::new());
        }

        let seeds: Vec<HexPoint> = groups.iter().map(|&dir| point.step(dir)).collect();
        let pieces = self.flood_pieces(&seeds);
        let split: Vec<Component> = pieces
            .into_iter()
            .map(|piece| self.split_off(piece))
            .collect();
        self.settle_perimeter([border]);
        trace!(%point, pieces = split.len(), "bridge removed");
        Ok(split)
    }

    /// Absorb `src`, which must be disjoint from `self` and touch it at the
    /// neighbouring seeds `start1` (in `self`) and `start2` (in `src`).
    ///
    /// Every loop of either side that the join touches is pooled and
    /// re-traced; the rest of `src`'s loops are relabelled unchanged.
    pub fn merge(&mut self, src: Component, start1: HexPoint, start2: HexPoint) -> Result<()> {
        if !self.contains(start1) {
            return Err(Error::NotMember { point: start1 });
        }
        if !src.contains(start2) {
            return Err(Error::NotMember { point: start2 });
        }
        if !are_neighbors(start1, start2) {
            return Err(Error::SeedsNotAdjacent {
                first: start1,
                second: start2,
            });
        }
        let (smaller, larger) = if self.len() <= src.len() {
            (&self.points, &src.points)
        } else {
            (&src.points, &self.points)
        };
        if let Some(&point) = smaller.iter().find(|p| larger.contains(*p)) {
            return Err(Error::Overlap { point });
        }

        let Component {
            points,
            nodes,
            borders,
            perimeter,
        } = src;

        // Our nodes now covered by src cells, and src nodes covered by ours
        // or shared with ours, mark the loops that meet.
        let mut touched = Vec::new();
        for point in &points {
            if let Some(node) = self.remove_node(*point) {
                push_unique(&mut touched, node.border);
            }
        }
        let mut touched_src: SecondaryMap<BorderKey, ()> = SecondaryMap::new();
        for (point, node) in &nodes {
            if self.points.contains(point) {
                touched_src.insert(node.border, ());
            } else if let Some(mine) = self.nodes.get(point) {
                touched_src.insert(node.border, ());
                push_unique(&mut touched, mine.border);
            }
        }

        let working = self.borders.insert(Border::default());
        for key in touched {
            self.absorb_border(working, key);
        }
        let mut relabel: SecondaryMap<BorderKey, BorderKey> = SecondaryMap::new();
        for key in borders.keys() {
            let target = if touched_src.contains_key(key) {
                working
            } else {
                self.borders.insert(Border::default())
            };
            relabel.insert(key, target);
        }

        for (point, node) in nodes {
            if self.points.contains(&point) {
                continue;
            }
            match self.nodes.get(&point) {
                Some(mine) => {
                    let edges = mine.edges | node.edges;
                    self.set_edges(point, edges);
                }
                None => self.insert_node(point, node.edges, relabel[node.border]),
            }
        }
        self.points.extend(points);

        let loops = self.split_border(working);
        trace!(loops = loops.len(), "merged border loops");
        let src_perimeter = relabel.get(perimeter).copied();
        self.settle_perimeter(loops.into_iter().chain(src_perimeter));
        Ok(())
    }

    /// A copy shifted by `offset`. Topology is translation invariant, so
    /// loops and their designations carry over unchanged.
    pub fn translate(&self, offset: HexPoint) -> Component {
        let mut moved = Component::empty();
        moved.points = self.points.iter().map(|&p| p + offset).collect();
        moved.nodes = self.nodes.iter().map(|(&p, &node)| (p + offset, node)).collect();
        moved.borders = self.borders.clone();
        for border in moved.borders.values_mut() {
            border.nodes = border.nodes.iter().map(|&p| p + offset).collect();
        }
        moved.perimeter = self.perimeter;
        moved
    }

    /// Perimeter nodes with their masks, unordered.
    pub fn perimeter(&self) -> Vec<(HexPoint, Edges)> {
        self.export(self.perimeter)
    }

    /// Hole nodes with their masks, one unordered list per hole.
    pub fn holes(&self) -> Vec<Vec<(HexPoint, Edges)>> {
        self.hole_keys().map(|key| self.export(key)).collect()
    }

    /// Every loop, perimeter first.
    pub fn borders(&self) -> Vec<Vec<(HexPoint, Edges)>> {
        std::iter::once(self.perimeter)
            .chain(self.hole_keys())
            .map(|key| self.export(key))
            .collect()
    }

    /// The perimeter as an ordered loop, counter-clockwise on screen.
    pub fn perimeter_loop(&self) -> Vec<BorderEdge> {
        self.trace_border(self.perimeter)
    }

    /// Each hole as an ordered loop, clockwise on screen, sorted by first step.
    pub fn hole_loops(&self) -> Vec<Vec<BorderEdge>> {
        let mut loops: Vec<_> = self.hole_keys().map(|key| self.trace_border(key)).collect();
        loops.sort();
        loops
    }

    fn hole_keys(&self) -> impl Iterator<Item = BorderKey> + '_ {
        self.borders.keys().filter(move |&key| key != self.perimeter)
    }

    fn export(&self, key: BorderKey) -> Vec<(HexPoint, Edges)> {
        self.borders[key]
            .nodes
            .iter()
            .map(|&p| (p, self.node(p).edges))
            .collect()
    }

    fn edge_count(&self, key: BorderKey) -> usize {
        self.borders[key]
            .nodes
            .iter()
            .map(|&p| self.node(p).edges.len() as usize)
            .sum()
    }

    fn trace_border(&self, key: BorderKey) -> Vec<BorderEdge> {
        let nodes = self.borders[key]
            .nodes
            .iter()
            .map(|&p| (p, self.node(p).edges));
        match canonical_start(nodes) {
            Some(start) => self.trace(start).collect(),
            None => Vec::new(),
        }
    }

    fn trace(&self, start: BorderEdge) -> BorderTrace<impl Fn(HexPoint) -> Option<Edges> + '_> {
        BorderTrace::new(start, move |p| self.nodes.get(&p).map(|node| node.edges))
    }

    fn node(&self, point: HexPoint) -> Node {
        match self.nodes.get(&point) {
            Some(node) => *node,
            None => panic!("border index has no node at {point}"),
        }
    }

    fn insert_node(&mut self, point: HexPoint, edges: Edges, border: BorderKey) {
        debug_assert!(!edges.is_empty());
        debug_assert!(!self.nodes.contains_key(&point));
        let entry = &mut self.borders[border];
        entry.nodes.insert(point);
        entry.concavity += concavity(edges);
        self.nodes.insert(point, Node { edges, border });
    }

    fn remove_node(&mut self, point: HexPoint) -> Option<Node> {
        let node = self.nodes.remove(&point)?;
        if let Some(border) = self.borders.get_mut(node.border) {
            border.nodes.remove(&point);
            border.concavity -= concavity(node.edges);
        }
        Some(node)
    }

    /// Replace the mask of an existing node; an empty mask drops the node.
    fn set_edges(&mut self, point: HexPoint, edges: Edges) {
        if edges.is_empty() {
            self.remove_node(point);
            return;
        }
        let Some(node) = self.nodes.get_mut(&point) else {
            panic!("border index has no node at {point}");
        };
        let delta = concavity(edges) - concavity(node.edges);
        node.edges = edges;
        self.borders[node.border].concavity += delta;
    }

    /// Move every node of `from` into `into` and drop `from`.
    fn absorb_border(&mut self, into: BorderKey, from: BorderKey) {
        if into == from {
            return;
        }
        let Some(absorbed) = self.borders.remove(from) else {
            return;
        };
        for point in &absorbed.nodes {
            if let Some(node) = self.nodes.get_mut(point) {
                node.border = into;
            }
        }
        let target = &mut self.borders[into];
        target.concavity += absorbed.concavity;
        target.nodes.extend(absorbed.nodes);
    }

    /// Re-trace the nodes of `key` and give every closed loop found its own
    /// border. The last loop keeps `key`; an empty border is dropped.
    fn split_border(&mut self, key: BorderKey) -> Vec<BorderKey> {
        let mut loops = Vec::new();
        loop {
            let next = self.borders[key].nodes.iter().next().copied();
            let Some(start) = next else {
                self.borders.remove(key);
                break;
            };
            let Some(direction) = self.node(start).edges.first() else {
                panic!("border node at {start} has an empty mask");
            };
            let (members, sum) = self.collect_loop(BorderEdge::new(start, direction));

            let border = &mut self.borders[key];
            if members.len() == border.nodes.len() {
                border.concavity = sum;
                loops.push(key);
                break;
            }
            border.concavity -= sum;
            for point in &members {
                border.nodes.remove(point);
            }
            let carved = self.borders.insert(Border {
                nodes: PointSet::default(),
                concavity: sum,
            });
            for point in &members {
                if let Some(node) = self.nodes.get_mut(point) {
                    node.border = carved;
                }
            }
            self.borders[carved].nodes = members;
            loops.push(carved);
        }
        loops
    }

    /// Nodes of the loop through `start` and their concavity sum.
    fn collect_loop(&self, start: BorderEdge) -> (PointSet, i64) {
        let mut members = PointSet::default();
        let mut sum = 0;
        for step in self.trace(start) {
            if members.insert(step.point) {
                sum += concavity(self.node(step.point).edges);
            }
        }
        (members, sum)
    }

    /// Group the runs starting at `starts` around `point` by the loop each
    /// lies on; returns one representative run start per loop.
    fn loop_groups(&self, point: HexPoint, starts: Edges) -> Vec<Direction> {
        let mut seen = Edges::EMPTY;
        let mut groups = Vec::new();
        for start in starts.iter() {
            if seen.contains(start) {
                continue;
            }
            groups.push(start);
            for step in self.trace(BorderEdge::new(point, start)) {
                if step.point == point {
                    seen.insert(step.direction);
                }
            }
        }
        groups
    }

    /// Flood every seed's piece one cell at a time, round robin. Returns
    /// the pieces that ran out of cells before the last one did.
    fn flood_pieces(&self, seeds: &[HexPoint]) -> Vec<PointSet> {
        let mut floods: Vec<Flood> = seeds.iter().map(|&seed| Flood::new(seed)).collect();
        let mut open: Vec<usize> = (0..floods.len()).collect();
        let mut finished = Vec::new();
        let mut cursor = 0;
        while open.len() > 1 {
            let index = open[cursor];
            if floods[index].grow(&self.points) {
                cursor += 1;
            } else {
                finished.push(index);
                open.remove(cursor);
            }
            if cursor >= open.len() {
                cursor = 0;
            }
        }
        finished
            .into_iter()
            .map(|index| std::mem::take(&mut floods[index].seen))
            .collect()
    }

    /// Move `piece` and its share of every border node into a new component.
    fn split_off(&mut self, piece: PointSet) -> Component {
        let mut split = Component::empty();

        let mut facing: PointMap<Edges> = PointMap::default();
        for &point in &piece {
            self.points.remove(&point);
            for dir in Direction::ALL {
                let neighbor = point.step(dir);
                if !piece.contains(&neighbor) {
                    *facing.entry(neighbor).or_default() |= Edges::single(dir.opposite());
                }
            }
        }

        let mut keys: SecondaryMap<BorderKey, BorderKey> = SecondaryMap::new();
        for (point, edges) in facing {
            let node = self.node(point);
            let key = match keys.get(node.border) {
                Some(&key) => key,
                None => {
                    let key = split.borders.insert(Border::default());
                    keys.insert(node.border, key);
                    key
                }
            };
            split.insert_node(point, edges, key);
            self.set_edges(point, node.edges.difference(edges));
        }
        for old in keys.keys() {
            if self.borders[old].nodes.is_empty() {
                self.borders.remove(old);
            }
        }

        split.points = piece;
        split.perimeter = split.outer_border();
        split
    }

    fn outer_border(&self) -> BorderKey {
        match self.borders.iter().find(|(_, border)| border.concavity < 0) {
            Some((key, _)) => key,
            None => panic!("component has no outer border loop"),
        }
    }

    /// Keep the current perimeter if it still winds outward, otherwise
    /// move the designation to the candidate that does.
    fn settle_perimeter(&mut self, candidates: impl IntoIterator<Item = BorderKey>) {
        let winds_outward =
            |key: BorderKey| self.borders.get(key).is_some_and(|border| border.concavity < 0);
        if winds_outward(self.perimeter) {
            return;
        }
        match candidates.into_iter().find(|&key| winds_outward(key)) {
            Some(key) => self.perimeter = key,
            None => panic!("no outward loop among re-split borders"),
        }
    }

    /// Check every structural invariant, panicking on the first violation.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert!(!self.points.is_empty(), "empty component");

        let mut expected: PointMap<Edges> = PointMap::default();
        for &p in &self.points {
            for dir in Direction::ALL {
                let n = p.step(dir);
                if !self.points.contains(&n) {
                    *expected.entry(n).or_default() |= Edges::single(dir.opposite());
                }
            }
        }
        assert_eq!(expected.len(), self.nodes.len(), "node count");
        for (p, edges) in &expected {
            assert_eq!(self.edges_at(*p), Some(*edges), "mask at {p}");
        }

        assert!(self.borders.contains_key(self.perimeter), "perimeter key is stale");
        let mut covered = 0;
        for (key, border) in &self.borders {
            assert!(!border.nodes.is_empty(), "empty border");
            covered += border.nodes.len();
            let mut sum = 0;
            for p in &border.nodes {
                let node = self.nodes[p];
                assert!(node.border == key, "node {p} filed under another border");
                sum += concavity(node.edges);
            }
            assert_eq!(sum, border.concavity, "stale concavity");
            let expected_sum = if key == self.perimeter { -6 } else { 6 };
            assert_eq!(sum, expected_sum, "loop winding");

            let steps = self.trace_border(key);
            assert_eq!(steps.len(), self.edge_count(key), "loop does not cover its edges");
            let visited: PointSet = steps.iter().map(|s| s.point).collect();
            assert_eq!(visited, border.nodes, "loop does not cover its nodes");
        }
        assert_eq!(covered, self.nodes.len(), "borders do not partition nodes");

        let Some(&seed) = self.points.iter().next() else {
            return;
        };
        let mut flood = Flood::new(seed);
        while flood.grow(&self.points) {}
        assert_eq!(flood.seen.len(), self.points.len(), "component is not connected");
    }
}

impl PartialEq for Component {
    /// Same points, same masks, same loops and the same loop as perimeter.
    fn eq(&self, other: &Self) -> bool {
        if self.points != other.points
            || self.nodes.len() != other.nodes.len()
            || self.borders.len() != other.borders.len()
        {
            return false;
        }
        let masks_match = self.nodes.iter().all(|(p, node)| {
            other
                .nodes
                .get(p)
                .is_some_and(|theirs| theirs.edges == node.edges)
        });
        masks_match
            && self.borders.iter().all(|(key, border)| {
                let Some(first) = border.nodes.iter().next() else {
                    return false;
                };
                let Some(theirs) = other.nodes.get(first).map(|node| node.border) else {
                    return false;
                };
                other.borders[theirs].nodes == border.nodes
                    && (key == self.perimeter) == (theirs == other.perimeter)
            })
    }
}

impl Eq for Component {}

/// Breadth-first flood over member points.
struct Flood {
    seen: PointSet,
    frontier: VecDeque<HexPoint>,
}

impl Flood {
    fn new(seed: HexPoint) -> Self {
        let mut seen = PointSet::default();
        seen.insert(seed);
        Self {
            seen,
            frontier: VecDeque::from([seed]),
        }
    }

    /// Expand one cell; `false` once the piece is exhausted.
    fn grow(&mut self, points: &PointSet) -> bool {
        let Some(point) = self.frontier.pop_front() else {
            return false;
        };
        for neighbor in point.neighbors() {
            if points.contains(&neighbor) && self.seen.insert(neighbor) {
                self.frontier.push_back(neighbor);
            }
        }
        true
    }
}
