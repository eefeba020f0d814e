//! Lattice sets: occupancy only.

use crate::component::Component;
use crate::error::Result;
use crate::map::{ComponentKey, LatticeMap};
use crate::trace::BorderEdge;
use crate::{Edges, HexPoint};

/// A set of lattice points with the same component tracking as
/// [`LatticeMap`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatticeSet {
    map: LatticeMap<()>,
}

impl LatticeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `point`; `false` if it was already present.
    pub fn insert(&mut self, point: HexPoint) -> bool {
        self.map.insert(point, ()).is_none()
    }

    /// Remove `point`; `false` if it was absent.
    pub fn remove(&mut self, point: HexPoint) -> bool {
        self.map.remove(point).is_some()
    }

    pub fn contains(&self, point: HexPoint) -> bool {
        self.map.contains(point)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = HexPoint> + '_ {
        self.map.points()
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> + '_ {
        self.map.components()
    }

    pub fn component_count(&self) -> usize {
        self.map.component_count()
    }

    pub fn component_at(&self, point: HexPoint) -> Option<&Component> {
        self.map.component_at(point)
    }

    pub fn component_key(&self, point: HexPoint) -> Option<ComponentKey> {
        self.map.component_key(point)
    }

    pub fn is_connected(&self) -> bool {
        self.map.is_connected()
    }

    pub fn adjacent(&self) -> impl Iterator<Item = HexPoint> + '_ {
        self.map.adjacent()
    }

    pub fn edges_at(&self, point: HexPoint) -> Option<Edges> {
        self.map.edges_at(point)
    }

    pub fn perimeter(&self) -> Result<Vec<BorderEdge>> {
        self.map.perimeter()
    }

    pub fn holes(&self) -> Result<Vec<Vec<BorderEdge>>> {
        self.map.holes()
    }

    pub fn overlaps(&self, other: &LatticeSet) -> bool {
        self.map.overlaps(&other.map)
    }

    pub fn adjacent_to(&self, other: &LatticeSet) -> bool {
        self.map.adjacent_to(&other.map)
    }

    pub fn get_component(&self, start: HexPoint) -> Option<Self> {
        self.map.get_component(start).map(|map| Self { map })
    }

    pub fn translate(&self, offset: HexPoint) -> Self {
        Self {
            map: self.map.translate(offset),
        }
    }

    pub fn merge(&mut self, other: LatticeSet) -> Result<()> {
        self.map.merge(other.map)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl Extend<HexPoint> for LatticeSet {
    fn extend<I: IntoIterator<Item = HexPoint>>(&mut self, iter: I) {
        self.map.extend(iter.into_iter().map(|point| (point, ())));
    }
}

impl FromIterator<HexPoint> for LatticeSet {
    fn from_iter<I: IntoIterator<Item = HexPoint>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl From<LatticeMap<()>> for LatticeSet {
    fn from(map: LatticeMap<()>) -> Self {
        Self { map }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for LatticeSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut points: Vec<HexPoint> = self.iter().collect();
        points.sort();
        serializer.collect_seq(points)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for LatticeSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let points = Vec::<HexPoint>::deserialize(deserializer)?;
        Ok(points.into_iter().collect())
    }
}
