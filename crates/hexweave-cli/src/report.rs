//! JSON reports printed by the CLI commands.

use hexweave_tessellate::{find_tilings, SearchConfig, Tiling};
use hexweave_topology::{BorderEdge, Component, HexPoint, LatticeMap, LatticeSet};
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Serialize)]
pub struct Summary {
    pub cells: usize,
    pub connected: bool,
    pub components: Vec<ComponentSummary>,
}

#[derive(Debug, Serialize)]
pub struct ComponentSummary {
    /// Smallest point of the component.
    pub anchor: HexPoint,
    pub cells: usize,
    /// Number of `(node, edge)` pairs on the perimeter.
    pub perimeter: usize,
    pub holes: usize,
}

#[derive(Debug, Serialize)]
pub struct ComponentLoops {
    pub anchor: HexPoint,
    pub perimeter: Vec<BorderEdge>,
    pub holes: Vec<Vec<BorderEdge>>,
}

#[derive(Debug, Serialize)]
pub struct TileReport {
    pub cells: usize,
    pub tilings: Vec<TilingEntry>,
}

#[derive(Debug, Serialize)]
pub struct TilingEntry {
    #[serde(flatten)]
    pub tiling: Tiling,
    pub area: i64,
}

/// Components paired with their anchors, sorted by anchor.
fn anchored<V>(map: &LatticeMap<V>) -> Vec<(HexPoint, &Component)> {
    let mut components: Vec<_> = map
        .components()
        .filter_map(|component| component.points().min().map(|anchor| (anchor, component)))
        .collect();
    components.sort_by_key(|(anchor, _)| *anchor);
    components
}

pub fn summary<V>(map: &LatticeMap<V>) -> Summary {
    Summary {
        cells: map.len(),
        connected: map.is_connected(),
        components: anchored(map)
            .into_iter()
            .map(|(anchor, component)| ComponentSummary {
                anchor,
                cells: component.len(),
                perimeter: component.perimeter_len(),
                holes: component.hole_count(),
            })
            .collect(),
    }
}

pub fn loops<V>(map: &LatticeMap<V>) -> Vec<ComponentLoops> {
    anchored(map)
        .into_iter()
        .map(|(anchor, component)| ComponentLoops {
            anchor,
            perimeter: component.perimeter_loop(),
            holes: component.hole_loops(),
        })
        .collect()
}

/// Tile the occupied cells; values are ignored.
pub fn tiles<V>(map: &LatticeMap<V>, config: &SearchConfig) -> Result<TileReport> {
    let shape: LatticeSet = map.points().collect();
    let tilings = find_tilings(&shape, config)?;
    Ok(TileReport {
        cells: shape.len(),
        tilings: tilings
            .into_iter()
            .map(|tiling| TilingEntry {
                area: tiling.area(),
                tiling,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::{json, Value};

    fn load(cells: Value) -> LatticeMap<Value> {
        serde_json::from_value(cells).unwrap()
    }

    fn ring() -> LatticeMap<Value> {
        let entries: Vec<Value> = HexPoint::ORIGIN
            .neighbors()
            .iter()
            .map(|p| json!({ "point": { "q": p.q, "r": p.r }, "value": null }))
            .collect();
        load(Value::Array(entries))
    }

    #[test]
    fn summary_of_two_pieces() {
        let map = load(json!([
            { "point": { "q": 5, "r": 5 }, "value": "b" },
            { "point": { "q": 0, "r": 0 }, "value": "a" },
            { "point": { "q": 1, "r": 0 }, "value": 1 },
        ]));
        let summary = serde_json::to_value(summary(&map)).unwrap();
        assert_eq!(
            summary,
            json!({
                "cells": 3,
                "connected": false,
                "components": [
                    { "anchor": { "q": 0, "r": 0 }, "cells": 2, "perimeter": 10, "holes": 0 },
                    { "anchor": { "q": 5, "r": 5 }, "cells": 1, "perimeter": 6, "holes": 0 },
                ]
            })
        );
    }

    #[test]
    fn loops_of_a_ring() {
        let report = loops(&ring());
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].perimeter.len(), 18);
        assert_eq!(report[0].holes.len(), 1);
        let hole = serde_json::to_value(&report[0].holes[0][0]).unwrap();
        assert_eq!(hole, json!({ "point": { "q": 0, "r": 0 }, "direction": "East" }));
    }

    #[test]
    fn tiling_a_ring_fails() {
        let err = tiles(&ring(), &SearchConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Tessellate(hexweave_tessellate::Error::HasHoles { holes: 1 })
        ));
    }

    #[test]
    fn tiling_a_single_cell() {
        let map = load(json!([{ "point": { "q": 0, "r": 0 }, "value": {} }]));
        let report = serde_json::to_value(tiles(&map, &SearchConfig::default()).unwrap()).unwrap();
        assert_eq!(report["cells"], 1);
        assert_eq!(report["tilings"].as_array().map(Vec::len), Some(1));
        assert_eq!(report["tilings"][0]["area"], 1);
    }
}
