//! GeoJSON output backend.
//!
//! Writes a single `FeatureCollection` to the configured path when
//! [`finish`](RouteRenderer::finish) is called.  Features:
//!
//! | `role`      | Geometry     | Extra properties                              |
//! |-------------|--------------|-----------------------------------------------|
//! | `"route"`   | `LineString` | `from`, `to`, `total_distance_m`, `total_distance_km` |
//! | `"network"` | `LineString` | `from`, `to`, `key`, `length_m`               |
//!
//! Coordinates are `[lon, lat]` as GeoJSON requires.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tracing::info;

use rr_core::GeoPoint;
use rr_spatial::{GraphStore, RouteSummary};

use crate::OutputResult;
use crate::row::network_rows;
use crate::writer::RouteRenderer;

/// Buffers features in memory and writes one GeoJSON file on `finish`.
pub struct GeoJsonWriter {
    path:     PathBuf,
    features: Vec<Value>,
    finished: bool,
}

impl GeoJsonWriter {
    /// Target `path`; the file is created on [`finish`](RouteRenderer::finish).
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf(), features: Vec::new(), finished: false }
    }

    /// The collection as it would be written now.
    pub fn to_value(&self) -> Value {
        json!({ "type": "FeatureCollection", "features": self.features })
    }
}

impl RouteRenderer for GeoJsonWriter {
    fn write_route(&mut self, route: &RouteSummary, store: &GraphStore) -> OutputResult<()> {
        let line = route.polyline(store)?;
        self.features.push(json!({
            "type": "Feature",
            "geometry": line_string(&line),
            "properties": {
                "role": "route",
                "from": route.start().0,
                "to": route.end().0,
                "nodes": route.nodes().iter().map(|id| id.0).collect::<Vec<_>>(),
                "total_distance_m": route.total_distance_m(),
                "total_distance_km": route.total_distance_km(),
            },
        }));
        Ok(())
    }

    fn write_network(&mut self, store: &GraphStore) -> OutputResult<()> {
        self.features.extend(network_rows(store).map(|row| {
            json!({
                "type": "Feature",
                "geometry": line_string(&row.points),
                "properties": {
                    "role": "network",
                    "from": row.from,
                    "to": row.to,
                    "key": row.key,
                    "length_m": row.length_m,
                },
            })
        }));
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        let mut file = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(&mut file, &self.to_value())?;
        file.flush()?;
        info!(path = %self.path.display(), features = self.features.len(), "wrote GeoJSON");
        Ok(())
    }
}

fn line_string(points: &[GeoPoint]) -> Value {
    json!({
        "type": "LineString",
        "coordinates": points.iter().map(|p| [p.lon, p.lat]).collect::<Vec<_>>(),
    })
}
