//! Nearest-node snapping.
//!
//! # Metric
//!
//! Distances are planar (equirectangular) in degrees: a point is projected
//! to `[lon · cos φ₀, lat]`, where φ₀ is the mid-latitude of the store's
//! extent fixed at build time, and points are compared by squared Euclidean
//! distance.  Within a city-sized extent this ranks candidates the same way
//! great-circle distance does to well under a metre, and unlike haversine it
//! is consistent with the R-tree's envelope pruning.  The projection is part
//! of the index, so construction and every query use the same metric.
//!
//! # Ties
//!
//! Candidates at exactly equal distance resolve to the lowest [`NodeId`].
//! The R-tree path and [`NearestNodeIndex::nearest_linear`] compute the same
//! `f64` for every candidate and so always agree.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use tracing::info;

use rr_core::{GeoPoint, NodeId};

use crate::{GraphStore, SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: the projected point plus the original
/// coordinate and stable id.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2], // [lon · cos φ₀, lat]
    pos:   GeoPoint,
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Snap ──────────────────────────────────────────────────────────────────────

/// Result of snapping a coordinate onto the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub node: NodeId,
    /// Position of the snapped node.
    pub pos: GeoPoint,
    /// Great-circle distance from the query point to the node, in metres.
    /// Reporting only; ranking uses the planar metric.
    pub offset_m: f64,
}

// ── NearestNodeIndex ──────────────────────────────────────────────────────────

/// Spatial index mapping `(lon, lat)` to the closest node of one store.
///
/// The index owns copies of the node ids and positions, so it does not
/// borrow the store; it is only meaningful for the snapshot it was built
/// from.  Immutable and `Send + Sync` once built.
pub struct NearestNodeIndex {
    cos_lat0: f64,
    tree:     RTree<NodeEntry>,
}

impl NearestNodeIndex {
    /// Bulk-load an index over every node in `store`.
    ///
    /// # Errors
    ///
    /// [`SpatialError::EmptyGraph`] if the store has no nodes.
    pub fn build(store: &GraphStore) -> SpatialResult<Self> {
        if store.is_empty() {
            return Err(SpatialError::EmptyGraph);
        }

        let (min_lat, max_lat) = store
            .nodes()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, p)| {
                (lo.min(p.lat), hi.max(p.lat))
            });
        let cos_lat0 = ((min_lat + max_lat) * 0.5).to_radians().cos();

        let entries: Vec<NodeEntry> = store
            .nodes()
            .map(|(id, pos)| NodeEntry { point: project(pos, cos_lat0), pos, id })
            .collect();
        let tree = RTree::bulk_load(entries);

        info!(nodes = tree.size(), "built nearest-node index");
        Ok(Self { cos_lat0, tree })
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Return the id of the node nearest to `(lon, lat)`.
    pub fn query(&self, lon: f64, lat: f64) -> SpatialResult<NodeId> {
        self.nearest_entry(GeoPoint::new(lon, lat)).map(|e| e.id)
    }

    /// Snap `pos` to its nearest node, reporting the offset in metres.
    pub fn snap(&self, pos: GeoPoint) -> SpatialResult<Snap> {
        self.nearest_entry(pos).map(|e| Snap {
            node:     e.id,
            pos:      e.pos,
            offset_m: pos.distance_m(e.pos),
        })
    }

    /// Reference implementation: scan every node with the index's metric.
    ///
    /// Always returns the same node as [`query`](Self::query).
    pub fn nearest_linear(&self, lon: f64, lat: f64) -> SpatialResult<NodeId> {
        let q = project(GeoPoint::new(lon, lat), self.cos_lat0);
        self.tree
            .iter()
            .map(|e| (e.distance_2(&q), e.id))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id)
            .ok_or(SpatialError::EmptyGraph)
    }

    /// Up to `k` nearest nodes in ascending distance, ties by lowest id.
    pub fn k_nearest(&self, lon: f64, lat: f64, k: usize) -> Vec<NodeId> {
        if k == 0 {
            return Vec::new();
        }
        let q = project(GeoPoint::new(lon, lat), self.cos_lat0);

        // Over-collect every candidate tied with the k-th distance so the
        // id tie-break is not at the mercy of R-tree traversal order.
        let mut found: Vec<(f64, NodeId)> = Vec::with_capacity(k);
        for (e, d) in self.tree.nearest_neighbor_iter_with_distance_2(&q) {
            if found.len() >= k && d > found[k - 1].0 {
                break;
            }
            found.push((d, e.id));
        }
        found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        found.truncate(k);
        found.into_iter().map(|(_, id)| id).collect()
    }

    fn nearest_entry(&self, pos: GeoPoint) -> SpatialResult<&NodeEntry> {
        let q = project(pos, self.cos_lat0);
        let mut iter = self.tree.nearest_neighbor_iter_with_distance_2(&q);
        let (mut best, best_d) = iter.next().ok_or(SpatialError::EmptyGraph)?;
        for (e, d) in iter {
            if d > best_d {
                break;
            }
            if e.id < best.id {
                best = e;
            }
        }
        Ok(best)
    }
}

#[inline]
fn project(p: GeoPoint, cos_lat0: f64) -> [f64; 2] {
    [p.lon * cos_lat0, p.lat]
}
