//! Plain data row types written by output backends.

use rr_core::GeoPoint;
use rr_spatial::{GraphStore, RouteSummary, SpatialResult};

/// One node of a route, with the distance travelled to reach it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteNodeRow {
    pub seq:          u32,
    pub node_id:      u64,
    pub lat:          f64,
    pub lon:          f64,
    pub cumulative_m: f64,
}

/// One directed edge of the background network.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEdgeRow {
    pub from:     u64,
    pub to:       u64,
    pub key:      u32,
    pub length_m: f64,
    /// Drawable polyline (geometry, or the straight segment).
    pub points:   Vec<GeoPoint>,
}

/// Rows for every node of `route`, in travel order.
pub fn route_rows(route: &RouteSummary, store: &GraphStore) -> SpatialResult<Vec<RouteNodeRow>> {
    let coords = route.coordinates(store)?;
    let mut cumulative_m = 0.0;
    let rows = route
        .nodes()
        .iter()
        .zip(coords)
        .enumerate()
        .map(|(i, (&id, pos))| {
            if i > 0 {
                cumulative_m += route.edge_lengths_m()[i - 1];
            }
            RouteNodeRow { seq: i as u32, node_id: id.0, lat: pos.lat, lon: pos.lon, cumulative_m }
        })
        .collect();
    Ok(rows)
}

/// Rows for every edge of `store`, in CSR order.
pub fn network_rows(store: &GraphStore) -> impl Iterator<Item = NetworkEdgeRow> + '_ {
    store.edges().map(|e| NetworkEdgeRow {
        from:     e.from.0,
        to:       e.to.0,
        key:      e.key,
        length_m: e.length_m,
        points:   store.edge_polyline(e.id),
    })
}
