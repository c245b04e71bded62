//! End-to-end route pipeline: truncate → index → snap → search → summarize.
//!
//! [`RoutePlanner`] owns the full graph, its truncated copy, and the
//! nearest-node index over the truncated copy.  All three are immutable
//! after construction, so one planner can answer many requests, including
//! concurrently (see [`RoutePlanner::route_many`]).

use tracing::{debug, info};

use rr_core::{BoundingBox, GeoPoint};

use crate::nearest::{NearestNodeIndex, Snap};
use crate::region::truncate;
use crate::router::{DijkstraRouter, Router};
use crate::summary::RouteSummary;
use crate::{GraphStore, SpatialError, SpatialResult};

/// A computed route together with how its endpoints were snapped.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    pub start:   Snap,
    pub end:     Snap,
    pub summary: RouteSummary,
}

/// Routes between arbitrary coordinates inside a bounding box.
pub struct RoutePlanner<R: Router = DijkstraRouter> {
    full:   GraphStore,
    region: GraphStore,
    bbox:   BoundingBox,
    index:  NearestNodeIndex,
    router: R,
}

impl RoutePlanner<DijkstraRouter> {
    /// Planner using the default length-weighted Dijkstra.
    pub fn new(store: GraphStore, bbox: BoundingBox) -> SpatialResult<Self> {
        Self::with_router(store, bbox, DijkstraRouter::new())
    }
}

impl<R: Router> RoutePlanner<R> {
    /// Truncate `store` to `bbox` and index the remainder.
    ///
    /// # Errors
    ///
    /// [`SpatialError::EmptyGraph`] if no node lies inside `bbox`.
    pub fn with_router(store: GraphStore, bbox: BoundingBox, router: R) -> SpatialResult<Self> {
        let region = truncate(&store, &bbox);
        let index  = NearestNodeIndex::build(&region)?;
        Ok(Self { full: store, region, bbox, index, router })
    }

    /// The untruncated graph.
    pub fn full_store(&self) -> &GraphStore {
        &self.full
    }

    /// The graph restricted to [`bbox`](Self::bbox); routes are computed here.
    pub fn region(&self) -> &GraphStore {
        &self.region
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn index(&self) -> &NearestNodeIndex {
        &self.index
    }

    /// Snap `start` and `end` to the truncated graph and route between them.
    ///
    /// # Errors
    ///
    /// Anything [`Router::route`] returns, except that a `NoPathFound`
    /// between the snapped endpoints becomes
    /// [`SpatialError::DisconnectedByTruncation`] when the same endpoints
    /// are connected in the full graph.
    pub fn plan(&self, start: GeoPoint, end: GeoPoint) -> SpatialResult<PlannedRoute> {
        let s = self.index.snap(start)?;
        let e = self.index.snap(end)?;
        debug!(
            start = %s.node, start_offset_m = s.offset_m,
            end = %e.node, end_offset_m = e.offset_m,
            "snapped endpoints"
        );

        match self.router.route(&self.region, s.node, e.node) {
            Ok(summary) => {
                info!(
                    from = %s.node,
                    to = %e.node,
                    hops = summary.edges().len(),
                    total_m = summary.total_distance_m(),
                    "route found"
                );
                Ok(PlannedRoute { start: s, end: e, summary })
            }
            Err(SpatialError::NoPathFound { from, to }) if from == s.node && to == e.node => {
                if self.router.route(&self.full, from, to).is_ok() {
                    Err(SpatialError::DisconnectedByTruncation { from, to })
                } else {
                    Err(SpatialError::NoPathFound { from, to })
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Answer a batch of `(start, end)` requests, one result per pair in
    /// input order.  Runs on the Rayon pool with the `parallel` feature.
    #[cfg(feature = "parallel")]
    pub fn route_many(&self, pairs: &[(GeoPoint, GeoPoint)]) -> Vec<SpatialResult<PlannedRoute>> {
        use rayon::prelude::*;
        pairs.par_iter().map(|&(a, b)| self.plan(a, b)).collect()
    }

    /// Answer a batch of `(start, end)` requests, one result per pair in
    /// input order.  Runs on the Rayon pool with the `parallel` feature.
    #[cfg(not(feature = "parallel"))]
    pub fn route_many(&self, pairs: &[(GeoPoint, GeoPoint)]) -> Vec<SpatialResult<PlannedRoute>> {
        pairs.iter().map(|&(a, b)| self.plan(a, b)).collect()
    }
}
