//! `rr-output` — route and network writers for the rust_route workspace.
//!
//! Two backends are provided:
//!
//! | Backend   | Files created                                  |
//! |-----------|------------------------------------------------|
//! | CSV       | `route_nodes.csv`, `network_edges.csv`         |
//! | GeoJSON   | one `FeatureCollection` file                   |
//!
//! Both implement [`RouteRenderer`].  Drawing, styling, and serving a map
//! are left to whatever consumes these files.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rr_output::{CsvWriter, RouteRenderer};
//!
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! writer.write_network(planner.region())?;
//! writer.write_route(&planned.summary, planner.region())?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod geojson;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use geojson::GeoJsonWriter;
pub use row::{NetworkEdgeRow, RouteNodeRow, network_rows, route_rows};
pub use writer::RouteRenderer;
