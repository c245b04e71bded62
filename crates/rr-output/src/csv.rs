//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `route_nodes.csv` — `seq,node_id,lat,lon,cumulative_m`
//! - `network_edges.csv` — `from,to,key,length_m,wkt`
//!
//! The `wkt` column holds a `LINESTRING` so the network can be dropped
//! straight into a GIS tool.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use tracing::info;

use rr_core::GeoPoint;
use rr_spatial::{GraphStore, RouteSummary};

use crate::OutputResult;
use crate::row::{network_rows, route_rows};
use crate::writer::RouteRenderer;

/// Writes a route and its network to two CSV files.
pub struct CsvWriter {
    route:    Writer<File>,
    network:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut route = Writer::from_path(dir.join("route_nodes.csv"))?;
        route.write_record(["seq", "node_id", "lat", "lon", "cumulative_m"])?;

        let mut network = Writer::from_path(dir.join("network_edges.csv"))?;
        network.write_record(["from", "to", "key", "length_m", "wkt"])?;

        Ok(Self {
            route,
            network,
            finished: false,
        })
    }
}

impl RouteRenderer for CsvWriter {
    fn write_route(&mut self, route: &RouteSummary, store: &GraphStore) -> OutputResult<()> {
        let rows = route_rows(route, store)?;
        for row in &rows {
            self.route.write_record(&[
                row.seq.to_string(),
                row.node_id.to_string(),
                row.lat.to_string(),
                row.lon.to_string(),
                format!("{:.3}", row.cumulative_m),
            ])?;
        }
        info!(rows = rows.len(), "wrote route_nodes.csv");
        Ok(())
    }

    fn write_network(&mut self, store: &GraphStore) -> OutputResult<()> {
        let mut count = 0usize;
        for row in network_rows(store) {
            self.network.write_record(&[
                row.from.to_string(),
                row.to.to_string(),
                row.key.to_string(),
                format!("{:.3}", row.length_m),
                wkt_linestring(&row.points),
            ])?;
            count += 1;
        }
        info!(rows = count, "wrote network_edges.csv");
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.route.flush()?;
        self.network.flush()?;
        Ok(())
    }
}

fn wkt_linestring(points: &[GeoPoint]) -> String {
    let coords: Vec<String> = points.iter().map(|p| format!("{} {}", p.lon, p.lat)).collect();
    format!("LINESTRING ({})", coords.join(", "))
}
