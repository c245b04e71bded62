//! CSV graph source.
//!
//! # CSV format
//!
//! Two files.  `nodes.csv`, one row per node:
//!
//! ```csv
//! id,lat,lon
//! 1,-6.934878,107.539303
//! 2,-6.930100,107.545000
//! ```
//!
//! `edges.csv`, one row per **directed** edge:
//!
//! ```csv
//! from,to,length_m,key,geometry
//! 1,2,812.4,,
//! 1,2,790.0,1,107.539303 -6.934878;107.542 -6.932;107.545 -6.9301
//! ```
//!
//! | Column     | Meaning                                                      |
//! |------------|--------------------------------------------------------------|
//! | `length_m` | edge length in metres                                        |
//! | `key`      | parallel-edge discriminator; empty → next free key for pair |
//! | `geometry` | empty, or `lon lat` pairs separated by `;`                   |
//!
//! Two-way roads appear as two rows.  Every load error is fatal; nothing is
//! skipped silently.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use rr_core::{GeoPoint, NodeId};

use crate::store::{EdgeSpec, GraphStore, GraphStoreBuilder};
use crate::{SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  u64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:     u64,
    to:       u64,
    length_m: f64,
    #[serde(default)]
    key:      Option<u32>,
    #[serde(default)]
    geometry: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`GraphStore`] from a `nodes.csv` / `edges.csv` pair.
///
/// # Errors
///
/// [`SpatialError::Io`] if a file cannot be opened, [`SpatialError::Csv`] on
/// malformed rows, [`SpatialError::Load`] on malformed geometry, and any
/// validation error from [`GraphStoreBuilder::build`].
pub fn load_graph_csv(nodes_path: &Path, edges_path: &Path) -> SpatialResult<GraphStore> {
    let nodes = std::fs::File::open(nodes_path)?;
    let edges = std::fs::File::open(edges_path)?;
    let store = load_graph_reader(nodes, edges)?;
    info!(
        nodes_path = %nodes_path.display(),
        edges_path = %edges_path.display(),
        nodes = store.node_count(),
        edges = store.edge_count(),
        "loaded graph from CSV"
    );
    Ok(store)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_graph_reader<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<GraphStore> {
    let mut builder = GraphStoreBuilder::new();

    let mut node_reader = csv::Reader::from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result?;
        builder.add_node(NodeId(row.id), GeoPoint::new(row.lon, row.lat));
    }

    let mut edge_reader = csv::Reader::from_reader(edges);
    for result in edge_reader.deserialize::<EdgeRecord>() {
        let row = result?;
        let mut spec = EdgeSpec::new(NodeId(row.from), NodeId(row.to), row.length_m);
        if let Some(key) = row.key {
            spec = spec.key(key);
        }
        if let Some(g) = row.geometry.as_deref().filter(|g| !g.trim().is_empty()) {
            spec = spec.geometry(parse_geometry(g)?);
        }
        builder.add_edge(spec);
    }

    builder.build()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Parse `"lon lat;lon lat;..."` into points.
fn parse_geometry(s: &str) -> SpatialResult<Vec<GeoPoint>> {
    s.split(';')
        .map(|pair| {
            let mut it = pair.split_whitespace().map(str::parse::<f64>);
            match (it.next(), it.next(), it.next()) {
                (Some(Ok(lon)), Some(Ok(lat)), None) => Ok(GeoPoint::new(lon, lat)),
                _ => Err(SpatialError::Load(format!(
                    "invalid geometry point {pair:?}: expected \"lon lat\""
                ))),
            }
        })
        .collect()
}
