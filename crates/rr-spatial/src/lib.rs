//! `rr-spatial` — road multigraph, truncation, snapping, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`store`]   | `GraphStore` (CSR multigraph), `GraphStoreBuilder`, `EdgeSpec` |
//! | [`region`]  | `truncate` — bounding-box filter                             |
//! | [`nearest`] | `NearestNodeIndex` (R-tree), `Snap`                          |
//! | [`router`]  | `Router` trait, `DijkstraRouter`, `EdgeWeight`, `shortest_path` |
//! | [`summary`] | `RouteSummary`, `summarize`                                  |
//! | [`planner`] | `RoutePlanner` — the full pipeline                           |
//! | [`loader`]  | `load_graph_csv`, `load_graph_reader`                        |
//! | [`osm`]     | `load_from_pbf` (feature = `"osm"` only)                     |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `osm`      | Enables OSM PBF loading via the `osmpbf` crate.           |
//! | `parallel` | `RoutePlanner::route_many` runs on the Rayon pool.        |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `rr-core` types.     |

pub mod error;
pub mod loader;
pub mod nearest;
pub mod planner;
pub mod region;
pub mod router;
pub mod store;
pub mod summary;

#[cfg(feature = "osm")]
pub mod osm;


pub use error::{SpatialError, SpatialResult};
pub use loader::{load_graph_csv, load_graph_reader};
pub use nearest::{NearestNodeIndex, Snap};
pub use planner::{PlannedRoute, RoutePlanner};
pub use region::truncate;
pub use router::{ByLength, DijkstraRouter, EdgeWeight, Router, shortest_path};
pub use store::{EdgeRef, EdgeSpec, GraphStore, GraphStoreBuilder};
pub use summary::{RouteSummary, summarize};
