//! Route summary assembly.
//!
//! [`summarize`] is deliberately independent of the search: given only a
//! node path and the store, it picks the minimum-length parallel edge for
//! every consecutive pair and records its length.  A summary produced by the
//! router can therefore always be re-derived from the raw graph.

use rr_core::{EdgeId, GeoPoint, NodeId, NodeIdx};

use crate::{GraphStore, SpatialError, SpatialResult};

/// Ordered node path plus the edge chosen for each hop.
///
/// The total distance is not stored; [`total_distance_m`](Self::total_distance_m)
/// sums the per-edge lengths on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    nodes:          Vec<NodeId>,
    edges:          Vec<EdgeId>,
    edge_lengths_m: Vec<f64>,
}

impl RouteSummary {
    /// Node ids from start to end inclusive.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Chosen (minimum-length) edge per hop, in the store the summary was
    /// computed against.  `len() == nodes().len() - 1`.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn edge_lengths_m(&self) -> &[f64] {
        &self.edge_lengths_m
    }

    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn end(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// `true` if the start and end are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn total_distance_m(&self) -> f64 {
        self.edge_lengths_m.iter().sum()
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_m() / 1_000.0
    }

    /// Node coordinates along the path, for drawing the route.
    ///
    /// # Errors
    ///
    /// [`SpatialError::UnknownNode`] if `store` is not the store (or a
    /// superset of the store) the route was computed on.
    pub fn coordinates(&self, store: &GraphStore) -> SpatialResult<Vec<GeoPoint>> {
        self.nodes
            .iter()
            .map(|&id| store.position(id).ok_or(SpatialError::UnknownNode(id)))
            .collect()
    }

    /// Full drawable polyline: each chosen edge's geometry (or straight
    /// segment), joined without repeating shared endpoints.
    ///
    /// # Errors
    ///
    /// [`SpatialError::UnknownNode`] or [`SpatialError::UnknownEdge`] if
    /// `store` is not the store the route was computed on; edge ids are
    /// only valid there.
    pub fn polyline(&self, store: &GraphStore) -> SpatialResult<Vec<GeoPoint>> {
        if self.is_trivial() {
            return self.coordinates(store);
        }
        let mut line: Vec<GeoPoint> = Vec::new();
        for (hop, &edge) in self.nodes.windows(2).zip(&self.edges) {
            let matches = edge.index() < store.edge_count() && {
                let e = store.edge(edge);
                (e.from, e.to) == (hop[0], hop[1])
            };
            if !matches {
                return Err(SpatialError::UnknownEdge(edge));
            }
            let seg  = store.edge_polyline(edge);
            let skip = usize::from(!line.is_empty());
            line.extend(seg.into_iter().skip(skip));
        }
        Ok(line)
    }
}

/// Build a [`RouteSummary`] for `path` by choosing, for each consecutive
/// pair, the shortest of its parallel edges.
///
/// # Errors
///
/// - [`SpatialError::EmptyPath`] if `path` is empty.
/// - [`SpatialError::UnknownNode`] if a path node is not in `store`.
/// - [`SpatialError::NoPathFound`] naming the first pair with no edge.
/// - [`SpatialError::InvalidWeight`] if a chosen length is negative or
///   non-finite.
pub fn summarize(store: &GraphStore, path: &[NodeId]) -> SpatialResult<RouteSummary> {
    let indices = path
        .iter()
        .map(|&id| store.require(id))
        .collect::<SpatialResult<Vec<NodeIdx>>>()?;
    summarize_indices(store, &indices)
}

pub(crate) fn summarize_indices(store: &GraphStore, path: &[NodeIdx]) -> SpatialResult<RouteSummary> {
    if path.is_empty() {
        return Err(SpatialError::EmptyPath);
    }

    let mut edges          = Vec::with_capacity(path.len() - 1);
    let mut edge_lengths_m = Vec::with_capacity(path.len() - 1);

    for pair in path.windows(2) {
        let (u, v) = (pair[0], pair[1]);
        let shortest = store
            .edges_between(u, v)
            .min_by(|&a, &b| store.edge_length_m(a).total_cmp(&store.edge_length_m(b)))
            .ok_or(SpatialError::NoPathFound { from: store.node_id(u), to: store.node_id(v) })?;

        let len = store.edge_length_m(shortest);
        if !(len.is_finite() && len >= 0.0) {
            return Err(SpatialError::InvalidWeight {
                from:   store.node_id(u),
                to:     store.node_id(v),
                weight: len,
            });
        }
        edges.push(shortest);
        edge_lengths_m.push(len);
    }

    Ok(RouteSummary {
        nodes: path.iter().map(|&idx| store.node_id(idx)).collect(),
        edges,
        edge_lengths_m,
    })
}
