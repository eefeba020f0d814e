//! Lattice maps: values per point with live component tracking.

use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::collections::PointMap;
use crate::component::Component;
use crate::error::{Error, Result};
use crate::trace::BorderEdge;
use crate::{Direction, Edges, HexPoint};

new_key_type! {
    /// Handle of a component inside one [`LatticeMap`]. Handles are stable
    /// until the component is merged away or removed.
    pub struct ComponentKey;
}

/// Component calls made by the map always satisfy their preconditions; an
/// error here means the index is corrupt.
fn consistent<T>(result: Result<T>, operation: &str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("component {operation} failed on a consistent index: {err}"),
    }
}

/// Values stored at lattice points, partitioned into connected components.
///
/// Besides the values the map keeps:
/// - every maximal connected component with its perimeter and holes
/// - which component owns each point
/// - the edge mask of every empty cell touching the map
///
/// All three are updated in place by [`insert`](Self::insert) and
/// [`remove`](Self::remove).
#[derive(Debug, Clone)]
pub struct LatticeMap<V> {
    values: PointMap<V>,
    edges: PointMap<Edges>,
    components: SlotMap<ComponentKey, Component>,
    owners: PointMap<ComponentKey>,
}

impl<V> LatticeMap<V> {
    pub fn new() -> Self {
        Self {
            values: PointMap::default(),
            edges: PointMap::default(),
            components: SlotMap::with_key(),
            owners: PointMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, point: HexPoint) -> bool {
        self.values.contains_key(&point)
    }

    pub fn get(&self, point: HexPoint) -> Option<&V> {
        self.values.get(&point)
    }

    /// Values can be changed freely; only occupancy drives the topology.
    pub fn get_mut(&mut self, point: HexPoint) -> Option<&mut V> {
        self.values.get_mut(&point)
    }

    pub fn iter(&self) -> impl Iterator<Item = (HexPoint, &V)> + '_ {
        self.values.iter().map(|(&p, v)| (p, v))
    }

    pub fn points(&self) -> impl Iterator<Item = HexPoint> + '_ {
        self.values.keys().copied()
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> + '_ {
        self.components.values()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// The component containing `point`.
    pub fn component_at(&self, point: HexPoint) -> Option<&Component> {
        self.owners.get(&point).map(|&key| &self.components[key])
    }

    pub fn component_key(&self, point: HexPoint) -> Option<ComponentKey> {
        self.owners.get(&point).copied()
    }

    pub fn component(&self, key: ComponentKey) -> Option<&Component> {
        self.components.get(key)
    }

    /// Exactly one component.
    pub fn is_connected(&self) -> bool {
        self.components.len() == 1
    }

    /// Empty cells touching the map.
    pub fn adjacent(&self) -> impl Iterator<Item = HexPoint> + '_ {
        self.edges.keys().copied()
    }

    /// Directions in which the empty cell `point` touches the map.
    pub fn edges_at(&self, point: HexPoint) -> Option<Edges> {
        self.edges.get(&point).copied()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.edges.clear();
        self.components.clear();
        self.owners.clear();
    }

    /// Store `value` at `point`, returning the previous value.
    ///
    /// Replacing a value leaves the topology untouched. A new point starts a
    /// component, grows the one it touches, or joins every component it
    /// touches into the largest of them.
    pub fn insert(&mut self, point: HexPoint, value: V) -> Option<V> {
        if let Some(slot) = self.values.get_mut(&point) {
            return Some(std::mem::replace(slot, value));
        }

        let mut touching: Vec<(ComponentKey, HexPoint)> = Vec::new();
        for neighbor in point.neighbors() {
            if let Some(&key) = self.owners.get(&neighbor) {
                if !touching.iter().any(|&(seen, _)| seen == key) {
                    touching.push((key, neighbor));
                }
            }
        }

        let key = match touching.len() {
            0 => self.components.insert(Component::new(point)),
            1 => {
                let key = touching[0].0;
                consistent(self.components[key].add(point), "add");
                key
            }
            _ => self.join(point, touching),
        };
        self.owners.insert(point, key);
        self.values.insert(point, value);
        self.mark_occupied(point);
        None
    }

    /// Remove `point`, returning its value.
    ///
    /// Removing a bridge cell splits its component. The piece that took
    /// longest to flood keeps the old key; the others get new keys.
    pub fn remove(&mut self, point: HexPoint) -> Option<V> {
        let value = self.values.remove(&point)?;
        let Some(key) = self.owners.remove(&point) else {
            panic!("occupied point {point} has no component");
        };

        if self.components[key].len() == 1 {
            self.components.remove(key);
        } else {
            let pieces = consistent(self.components[key].delete(point), "delete");
            if !pieces.is_empty() {
                debug!(%point, pieces = pieces.len(), "component split");
            }
            for piece in pieces {
                let split = self.components.insert(piece);
                for p in self.components[split].points() {
                    self.owners.insert(p, split);
                }
            }
        }
        self.mark_vacated(point);
        Some(value)
    }

    /// Ordered perimeter loop of the only component.
    pub fn perimeter(&self) -> Result<Vec<BorderEdge>> {
        Ok(self.single()?.perimeter_loop())
    }

    /// Ordered hole loops of the only component.
    pub fn holes(&self) -> Result<Vec<Vec<BorderEdge>>> {
        Ok(self.single()?.hole_loops())
    }

    fn single(&self) -> Result<&Component> {
        let mut components = self.components.values();
        match (components.next(), components.next()) {
            (Some(component), None) => Ok(component),
            _ => Err(Error::Disconnected {
                components: self.components.len(),
            }),
        }
    }

    /// Whether any point is occupied in both maps.
    pub fn overlaps<W>(&self, other: &LatticeMap<W>) -> bool {
        self.first_overlap(other).is_some()
    }

    fn first_overlap<W>(&self, other: &LatticeMap<W>) -> Option<HexPoint> {
        if self.len() <= other.len() {
            self.points().find(|&p| other.contains(p))
        } else {
            other.points().find(|&p| self.contains(p))
        }
    }

    /// Whether a point of one map lies next to a point of the other that
    /// it does not share. Only meaningful for disjoint maps.
    pub fn adjacent_to<W>(&self, other: &LatticeMap<W>) -> bool {
        if self.len() <= other.len() {
            self.adjacent().any(|p| other.contains(p))
        } else {
            other.adjacent().any(|p| self.contains(p))
        }
    }

    /// Absorb a disjoint map. Overlap is checked before anything changes.
    pub fn merge(&mut self, other: LatticeMap<V>) -> Result<()> {
        if let Some(point) = self.first_overlap(&other) {
            return Err(Error::Overlap { point });
        }
        for (point, value) in other.values {
            self.insert(point, value);
        }
        Ok(())
    }

    fn join(&mut self, point: HexPoint, touching: Vec<(ComponentKey, HexPoint)>) -> ComponentKey {
        let mut largest = touching[0].0;
        for &(key, _) in &touching[1..] {
            if self.components[key].len() > self.components[largest].len() {
                largest = key;
            }
        }
        consistent(self.components[largest].add(point), "add");

        let joined = touching.len();
        for (key, neighbor) in touching {
            if key == largest {
                continue;
            }
            let Some(other) = self.components.remove(key) else {
                continue;
            };
            for p in other.points() {
                self.owners.insert(p, largest);
            }
            consistent(self.components[largest].merge(other, point, neighbor), "merge");
        }
        debug!(%point, joined, "components joined");
        largest
    }

    fn mark_occupied(&mut self, point: HexPoint) {
        self.edges.remove(&point);
        for dir in Direction::ALL {
            let neighbor = point.step(dir);
            if !self.values.contains_key(&neighbor) {
                self.edges.entry(neighbor).or_default().insert(dir.opposite());
            }
        }
    }

    fn mark_vacated(&mut self, point: HexPoint) {
        let mut own = Edges::EMPTY;
        for dir in Direction::ALL {
            let neighbor = point.step(dir);
            if self.values.contains_key(&neighbor) {
                own.insert(dir);
                continue;
            }
            if let Some(edges) = self.edges.get_mut(&neighbor) {
                edges.remove(dir.opposite());
                if edges.is_empty() {
                    self.edges.remove(&neighbor);
                }
            }
        }
        if !own.is_empty() {
            self.edges.insert(point, own);
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut counted = 0;
        for (key, component) in &self.components {
            component.assert_consistent();
            counted += component.len();
            for p in component.points() {
                assert_eq!(self.owners.get(&p), Some(&key), "owner of {p}");
                assert!(self.values.contains_key(&p), "{p} has no value");
                for n in p.neighbors() {
                    if let Some(&owner) = self.owners.get(&n) {
                        assert!(owner == key, "{p} and {n} are in different components");
                    }
                }
            }
        }
        assert_eq!(counted, self.values.len(), "components do not cover the map");
        assert_eq!(self.owners.len(), self.values.len(), "stale owners");

        let mut expected: PointMap<Edges> = PointMap::default();
        for &p in self.values.keys() {
            for dir in Direction::ALL {
                let n = p.step(dir);
                if !self.values.contains_key(&n) {
                    expected.entry(n).or_default().insert(dir.opposite());
                }
            }
        }
        assert_eq!(expected, self.edges, "stale edge index");
    }
}

impl<V: Clone> LatticeMap<V> {
    /// The component containing `start`, with its values, as its own map.
    pub fn get_component(&self, start: HexPoint) -> Option<Self> {
        let component = self.component_at(start)?.clone();
        let mut map = Self::new();
        for p in component.points() {
            map.values.insert(p, self.values[&p].clone());
        }
        map.edges = component.border_nodes().collect();
        let key = map.components.insert(component);
        map.owners = map.values.keys().map(|&p| (p, key)).collect();
        Some(map)
    }

    /// A copy with every point shifted by `offset`.
    pub fn translate(&self, offset: HexPoint) -> Self {
        let mut moved = Self::new();
        moved.values = self
            .values
            .iter()
            .map(|(&p, v)| (p + offset, v.clone()))
            .collect();
        moved.edges = self.edges.iter().map(|(&p, &e)| (p + offset, e)).collect();
        for component in self.components.values() {
            let key = moved.components.insert(component.translate(offset));
            for p in moved.components[key].points() {
                moved.owners.insert(p, key);
            }
        }
        moved
    }
}

impl<V> Default for LatticeMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps are equal when they hold equal values at the same points; the
/// topology follows from occupancy.
impl<V: PartialEq> PartialEq for LatticeMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<V: Eq> Eq for LatticeMap<V> {}

impl<V> Extend<(HexPoint, V)> for LatticeMap<V> {
    fn extend<I: IntoIterator<Item = (HexPoint, V)>>(&mut self, iter: I) {
        for (point, value) in iter {
            self.insert(point, value);
        }
    }
}

impl<V> FromIterator<(HexPoint, V)> for LatticeMap<V> {
    fn from_iter<I: IntoIterator<Item = (HexPoint, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

#[cfg(feature = "serde")]
mod persist {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::LatticeMap;
    use crate::HexPoint;

    #[derive(Serialize)]
    struct EntryRef<'a, V> {
        point: HexPoint,
        value: &'a V,
    }

    #[derive(Deserialize)]
    struct Entry<V> {
        point: HexPoint,
        value: V,
    }

    /// A sorted list of `{point, value}` entries; topology is rebuilt on load.
    impl<V: Serialize> Serialize for LatticeMap<V> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut entries: Vec<EntryRef<'_, V>> = self
                .iter()
                .map(|(point, value)| EntryRef { point, value })
                .collect();
            entries.sort_by_key(|entry| entry.point);
            serializer.collect_seq(entries)
        }
    }

    impl<'de, V: Deserialize<'de>> Deserialize<'de> for LatticeMap<V> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let entries = Vec::<Entry<V>>::deserialize(deserializer)?;
            Ok(entries
                .into_iter()
                .map(|entry| (entry.point, entry.value))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(q: i64, r: i64) -> HexPoint {
        HexPoint::new(q, r)
    }

    fn occupied(cells: &[HexPoint]) -> LatticeMap<()> {
        let map: LatticeMap<()> = cells.iter().map(|&c| (c, ())).collect();
        map.assert_consistent();
        map
    }

    fn hexagon() -> Vec<HexPoint> {
        let mut cells = vec![HexPoint::ORIGIN];
        cells.extend(HexPoint::ORIGIN.neighbors());
        cells
    }

    #[test]
    fn filled_hexagon() {
        let map = occupied(&hexagon());
        assert_eq!(map.component_count(), 1);
        assert!(map.holes().unwrap().is_empty());
        assert_eq!(map.perimeter().unwrap().len(), 18);
    }

    #[test]
    fn ring_has_one_hole_at_origin() {
        let map = occupied(&HexPoint::ORIGIN.neighbors());
        let holes = map.holes().unwrap();
        assert_eq!(holes.len(), 1);
        assert_eq!(holes[0].len(), 6);
        assert!(holes[0].iter().all(|step| step.point == HexPoint::ORIGIN));
        assert_eq!(map.edges_at(HexPoint::ORIGIN), Some(Edges::FULL));
    }

    #[test]
    fn filling_the_ring() {
        let mut map = occupied(&HexPoint::ORIGIN.neighbors());
        map.insert(HexPoint::ORIGIN, ());
        map.assert_consistent();
        assert!(map.holes().unwrap().is_empty());
        assert_eq!(map.perimeter().unwrap().len(), 18);
        assert_eq!(map.edges_at(HexPoint::ORIGIN), None);
    }

    #[test]
    fn dumbbell_bridge_removal() {
        let cells = [p(0, 0), p(1, 0), p(0, 1), p(2, 0), p(3, 0), p(4, 0), p(3, 1)];
        let mut map = occupied(&cells);
        assert_eq!(map.component_count(), 1);
        let before = map.component_key(p(0, 0));

        assert_eq!(map.remove(p(2, 0)), Some(()));
        map.assert_consistent();
        assert_eq!(map.component_count(), 2);
        let sizes: usize = map.components().map(Component::len).sum();
        assert_eq!(sizes, cells.len() - 1);
        assert_ne!(map.component_key(p(0, 0)), map.component_key(p(4, 0)));
        assert!(before == map.component_key(p(0, 0)) || before == map.component_key(p(4, 0)));
        assert_eq!(
            map.perimeter(),
            Err(Error::Disconnected { components: 2 })
        );
    }

    #[test]
    fn bridging_two_components() {
        let mut map = occupied(&[p(0, 0), p(2, 0)]);
        assert_eq!(map.component_count(), 2);
        assert!(!map.is_connected());

        map.insert(p(1, 0), ());
        map.assert_consistent();
        assert!(map.is_connected());
        assert_eq!(map.component_at(p(2, 0)).map(Component::len), Some(3));
    }

    #[test]
    fn joining_components_around_a_hole() {
        // Two pairs on opposite sides of the origin, then the gaps are filled.
        let mut map = occupied(&[p(1, -1), p(1, 0), p(-1, 1), p(-1, 0)]);
        assert_eq!(map.component_count(), 2);

        map.insert(p(0, 1), ());
        map.assert_consistent();
        assert_eq!(map.component_count(), 1);

        map.insert(p(0, -1), ());
        map.assert_consistent();
        assert_eq!(map.holes().unwrap().len(), 1);
    }

    #[test]
    fn replacing_a_value_keeps_topology() {
        let mut map = LatticeMap::new();
        assert_eq!(map.insert(p(0, 0), "a"), None);
        assert_eq!(map.insert(p(0, 0), "b"), Some("a"));
        assert_eq!(map.get(p(0, 0)), Some(&"b"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.component_count(), 1);

        *map.get_mut(p(0, 0)).unwrap() = "c";
        assert_eq!(map.remove(p(0, 0)), Some("c"));
        assert_eq!(map.remove(p(0, 0)), None);
        assert!(map.is_empty());
        assert_eq!(map.component_count(), 0);
        assert_eq!(map.adjacent().count(), 0);
    }

    #[test]
    fn empty_map_queries() {
        let map: LatticeMap<()> = LatticeMap::default();
        assert_eq!(map.perimeter(), Err(Error::Disconnected { components: 0 }));
        assert_eq!(map.holes(), Err(Error::Disconnected { components: 0 }));
        assert!(!map.is_connected());
    }

    #[test]
    fn get_component_extracts_one_piece() {
        let mut map: LatticeMap<u32> = LatticeMap::new();
        map.extend([(p(0, 0), 1), (p(1, 0), 2), (p(5, 5), 3)]);
        let piece = map.get_component(p(1, 0)).unwrap();
        piece.assert_consistent();
        assert_eq!(piece.len(), 2);
        assert_eq!(piece.get(p(0, 0)), Some(&1));
        assert!(!piece.contains(p(5, 5)));
        assert!(map.get_component(p(9, 9)).is_none());
    }

    #[test]
    fn translate_and_back() {
        let map = occupied(&HexPoint::ORIGIN.neighbors());
        let moved = map.translate(p(3, -7));
        moved.assert_consistent();
        assert!(moved.contains(p(4, -7)));
        assert!(!moved.overlaps(&map));
        assert_eq!(moved.holes().unwrap()[0][0].point, p(3, -7));
        assert_eq!(moved.translate(p(-3, 7)), map);
    }

    #[test]
    fn overlap_and_adjacency() {
        let a = occupied(&[p(0, 0)]);
        let b = occupied(&[p(1, 0), p(2, 0)]);
        let c = occupied(&[p(3, 0)]);
        assert!(!a.overlaps(&b));
        assert!(a.adjacent_to(&b));
        assert!(b.adjacent_to(&a));
        assert!(!a.adjacent_to(&c));
        assert!(b.overlaps(&occupied(&[p(2, 0), p(9, 9), p(8, 8)])));
    }

    #[test]
    fn merge_maps() {
        let mut a = occupied(&[p(0, 0), p(1, 0)]);
        let b = occupied(&[p(2, 0), p(7, 7)]);
        a.merge(b).unwrap();
        a.assert_consistent();
        assert_eq!(a.len(), 4);
        assert_eq!(a.component_count(), 2);

        let overlapping = occupied(&[p(7, 7), p(8, 8)]);
        assert_eq!(a.merge(overlapping), Err(Error::Overlap { point: p(7, 7) }));
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn clear_resets_everything() {
        let mut map = occupied(&hexagon());
        map.clear();
        map.assert_consistent();
        assert!(map.is_empty());
        assert_eq!(map.component_count(), 0);
    }

    #[test]
    fn queries_are_idempotent() {
        let map = occupied(&[p(0, 0), p(1, 0), p(1, 1), p(-1, 2), p(0, 2), p(-1, 1)]);
        assert_eq!(map.perimeter(), map.perimeter());
        assert_eq!(map.holes(), map.holes());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_replays_insertions() {
        let mut map = LatticeMap::new();
        map.extend([(p(1, 0), "b".to_string()), (p(0, 0), "a".to_string())]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"[{"point":{"q":0,"r":0},"value":"a"},{"point":{"q":1,"r":0},"value":"b"}]"#
        );
        let back: LatticeMap<String> = serde_json::from_str(&json).unwrap();
        back.assert_consistent();
        assert_eq!(back, map);
    }

    fn cells() -> impl Strategy<Value = Vec<HexPoint>> {
        prop::collection::vec((-4i64..=4, -4i64..=4), 0..60)
            .prop_map(|pairs| pairs.into_iter().map(HexPoint::from).collect())
    }

    fn toggled(cells: &[HexPoint]) -> LatticeMap<()> {
        let mut map = LatticeMap::new();
        for &c in cells {
            if map.contains(c) {
                map.remove(c);
            } else {
                map.insert(c, ());
            }
        }
        map
    }

    /// Twice the signed shoelace area through the edge midpoints, in screen
    /// coordinates with `y` pointing down. Negative means counter-clockwise
    /// on screen.
    fn screen_winding(edges: &[BorderEdge]) -> i64 {
        let corners: Vec<(i64, i64)> = edges
            .iter()
            .map(|edge| {
                let mid = edge.point * 2 + edge.direction.offset();
                (2 * mid.q + mid.r, mid.r)
            })
            .collect();
        (0..corners.len())
            .map(|i| {
                let (x0, y0) = corners[i];
                let (x1, y1) = corners[(i + 1) % corners.len()];
                x0 * y1 - x1 * y0
            })
            .sum()
    }

    #[test]
    fn perimeter_and_holes_wind_in_opposite_directions() {
        let annulus = occupied(&crate::Spiral::rings(2, 3).collect::<Vec<_>>());
        let perimeter = annulus.perimeter().unwrap();
        let holes = annulus.holes().unwrap();
        assert_eq!(holes.len(), 1);
        assert!(screen_winding(&perimeter) < 0);
        assert!(screen_winding(&holes[0]) > 0);

        let ring = occupied(&HexPoint::ORIGIN.neighbors());
        assert!(screen_winding(&ring.perimeter().unwrap()) < 0);
        assert!(screen_winding(&ring.holes().unwrap()[0]) > 0);

        let single = occupied(&[HexPoint::ORIGIN]);
        assert!(screen_winding(&single.perimeter().unwrap()) < 0);
    }

    proptest! {
        #[test]
        fn random_toggles_keep_every_invariant(ops in cells()) {
            let mut map = LatticeMap::new();
            for c in ops {
                if map.contains(c) {
                    map.remove(c);
                } else {
                    map.insert(c, ());
                }
                map.assert_consistent();
            }
        }

        #[test]
        fn every_border_edge_is_on_exactly_one_loop(ops in cells()) {
            let map = toggled(&ops);
            for component in map.components() {
                let mut loops = vec![component.perimeter_loop()];
                loops.extend(component.hole_loops());
                let mut steps: Vec<BorderEdge> = loops.into_iter().flatten().collect();
                let total = steps.len();
                steps.sort();
                steps.dedup();
                prop_assert_eq!(steps.len(), total);
                let edges: usize = component
                    .border_nodes()
                    .map(|(_, e)| e.len() as usize)
                    .sum();
                prop_assert_eq!(total, edges);
            }
        }

        #[test]
        fn translation_round_trips(ops in cells(), dq in -20i64..20, dr in -20i64..20) {
            let map = toggled(&ops);
            let offset = HexPoint::new(dq, dr);
            let back = map.translate(offset).translate(-offset);
            back.assert_consistent();
            prop_assert_eq!(&back, &map);
            for component in map.components() {
                let Some(seed) = component.points().next() else { continue };
                prop_assert_eq!(back.component_at(seed), Some(component));
            }
        }

        #[test]
        fn insert_then_remove_restores_components(ops in cells(), q in -5i64..=5, r in -5i64..=5) {
            let before = toggled(&ops);
            let extra = HexPoint::new(q, r);
            prop_assume!(!before.contains(extra));

            let mut map = before.clone();
            map.insert(extra, ());
            map.remove(extra);
            map.assert_consistent();
            prop_assert_eq!(map.component_count(), before.component_count());
            for component in before.components() {
                let Some(seed) = component.points().next() else { continue };
                prop_assert_eq!(map.component_at(seed), Some(component));
            }
        }
    }
}
