//! OSM PBF graph source — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use rr_spatial::osm::load_from_pbf;
//!
//! let store = load_from_pbf(Path::new("west-java.osm.pbf"))?;
//! ```
//!
//! # What is loaded
//!
//! Only drivable `highway=*` ways are included (see [`is_drivable`]).
//! Node ids are the OSM node ids.  One-way roads add a single directed edge;
//! two-way roads add both directions.  Edge length is the haversine distance
//! between consecutive way nodes.  When two ways share a consecutive node
//! pair, each contributes its own parallel edge.
//!
//! # Memory note
//!
//! The loader buffers all OSM node positions in a `HashMap<i64, GeoPoint>`
//! for the first pass, because ways reference nodes by id.  The map is
//! freed before the store is built.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use osmpbf::{Element, ElementReader};
use tracing::info;

use rr_core::{GeoPoint, NodeId};

use crate::store::{GraphStore, GraphStoreBuilder};
use crate::SpatialError;

// ── Public entry point ────────────────────────────────────────────────────────

/// Load a road graph from an OSM PBF file.
///
/// # Errors
///
/// [`SpatialError::Osm`] if the file cannot be opened or parsed, and any
/// validation error from [`GraphStoreBuilder::build`].
pub fn load_from_pbf(path: &Path) -> Result<GraphStore, SpatialError> {
    // ── Phase 1: collect all OSM nodes + road ways in one sequential pass ──
    let reader = ElementReader::from_path(path).map_err(|e| SpatialError::Osm(e.to_string()))?;

    let mut all_nodes: HashMap<i64, GeoPoint> = HashMap::new();
    let mut road_ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lon(), n.lat()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lon(), n.lat()));
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let highway = tags
                    .iter()
                    .find(|(k, _)| *k == "highway")
                    .map(|(_, v)| *v);

                if let Some(highway) = highway.filter(|h| is_drivable(h)) {
                    let oneway = is_oneway(highway, &tags);
                    let refs: Vec<i64> = w.refs().collect();
                    road_ways.push(OsmWay { refs, oneway });
                }
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    // ── Phase 2: identify road-referenced node ids ────────────────────────
    let road_node_ids: HashSet<i64> = road_ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .collect();

    // ── Phase 3: build store ──────────────────────────────────────────────
    let mut builder = GraphStoreBuilder::with_capacity(
        road_node_ids.len(),
        road_node_ids.len() * 2,
    );

    let mut positions: HashMap<i64, GeoPoint> = HashMap::with_capacity(road_node_ids.len());
    for osm_id in &road_node_ids {
        if let (Some(&pos), Ok(id)) = (all_nodes.get(osm_id), u64::try_from(*osm_id)) {
            builder.add_node(NodeId(id), pos);
            positions.insert(*osm_id, pos);
        }
    }

    // Free the full node map — no longer needed.
    drop(all_nodes);
    drop(road_node_ids);

    for way in &road_ways {
        for window in way.refs.windows(2) {
            let (osm_a, osm_b) = (window[0], window[1]);
            if let (Some(&pa), Some(&pb)) = (positions.get(&osm_a), positions.get(&osm_b)) {
                let (a, b) = (NodeId(osm_a as u64), NodeId(osm_b as u64));
                let len_m = pa.distance_m(pb);
                builder.add_directed_edge(a, b, len_m);
                if !way.oneway {
                    builder.add_directed_edge(b, a, len_m);
                }
            }
        }
    }

    let store = builder.build()?;
    info!(
        path = %path.display(),
        ways = road_ways.len(),
        nodes = store.node_count(),
        edges = store.edge_count(),
        "loaded graph from OSM PBF"
    );
    Ok(store)
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    refs:   Vec<i64>,
    oneway: bool,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// `true` if a `highway` value is open to motor traffic.
fn is_drivable(highway: &str) -> bool {
    !matches!(
        highway,
        "footway" | "path" | "cycleway" | "pedestrian" | "steps" | "track"
            | "bridleway" | "corridor" | "proposed" | "construction" | "platform"
    )
}

/// Determine whether a way should be treated as one-way for car traffic.
///
/// Motorways and motorway links are implicitly one-way in OSM convention.
fn is_oneway(highway: &str, tags: &[(&str, &str)]) -> bool {
    let explicit = tags.iter().any(|(k, v)| {
        *k == "oneway" && matches!(*v, "yes" | "1" | "true")
    });
    let implicit = matches!(highway, "motorway" | "motorway_link");
    explicit || implicit
}
