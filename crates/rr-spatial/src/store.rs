//! Road multigraph representation and builder.
//!
//! # Data layout
//!
//! Nodes are stored sorted by their stable [`NodeId`], so the dense
//! [`NodeIdx`] order is the same as id order.  Outgoing edges use
//! **Compressed Sparse Row (CSR)** format.  Given a `NodeIdx n`, its outgoing
//! edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`, `edge_key`,
//! `edge_geometry`) are sorted by `(source, target, key)` and indexed by
//! `EdgeId`.  Parallel edges between one ordered pair are therefore
//! adjacent, and a node's neighbours are scanned in ascending id order.
//!
//! A `GraphStore` is immutable once built.  It is `Send + Sync` and may be
//! shared by reference across concurrent route requests.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use rr_core::{EdgeId, GeoPoint, NodeId, NodeIdx};

use crate::{SpatialError, SpatialResult};

/// Endpoint tolerance (degrees) when checking edge geometry against node
/// positions.  About 0.1 m at the equator.
pub const GEOMETRY_TOLERANCE_DEG: f64 = 1e-6;

// ── GraphStore ────────────────────────────────────────────────────────────────

/// Directed road multigraph in CSR format.
///
/// Do not construct directly; use [`GraphStoreBuilder`] or a loader.
#[derive(Debug, Clone)]
pub struct GraphStore {
    // ── Node data (indexed by NodeIdx) ────────────────────────────────────
    pub(crate) node_ids: Vec<NodeId>,
    pub(crate) node_pos: Vec<GeoPoint>,
    /// Stable id → dense index.
    pub(crate) id_to_idx: FxHashMap<NodeId, NodeIdx>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = `node_count + 1`.
    pub(crate) node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    /// Source node of each edge.  Redundant with CSR but needed to trace
    /// predecessor edges back to their source.
    pub(crate) edge_from: Vec<NodeIdx>,
    pub(crate) edge_to: Vec<NodeIdx>,
    /// Length of each edge in metres.
    pub(crate) edge_length_m: Vec<f64>,
    /// Parallel-edge discriminator, unique per `(from, to)` pair.
    pub(crate) edge_key: Vec<u32>,
    /// Optional (lon, lat) polyline.  Shared so truncated copies of a store
    /// do not duplicate geometry.
    pub(crate) edge_geometry: Vec<Option<Arc<[GeoPoint]>>>,
}

/// Borrowed view of one edge with stable ids resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRef<'a> {
    pub id:       EdgeId,
    pub from:     NodeId,
    pub to:       NodeId,
    pub length_m: f64,
    pub key:      u32,
    pub geometry: Option<&'a [GeoPoint]>,
}

impl GraphStore {
    /// Construct a store with no nodes or edges.
    pub fn empty() -> Self {
        Self {
            node_ids:       Vec::new(),
            node_pos:       Vec::new(),
            id_to_idx:      FxHashMap::default(),
            node_out_start: vec![0],
            edge_from:      Vec::new(),
            edge_to:        Vec::new(),
            edge_length_m:  Vec::new(),
            edge_key:       Vec::new(),
            edge_geometry:  Vec::new(),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    /// All node ids in ascending order (equivalently, `NodeIdx` order).
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.id_to_idx.contains_key(&id)
    }

    /// Dense index of `id`, or `None` if the node is not in this store.
    #[inline]
    pub fn node_idx(&self, id: NodeId) -> Option<NodeIdx> {
        self.id_to_idx.get(&id).copied()
    }

    /// Like [`node_idx`](Self::node_idx) but fails with
    /// [`SpatialError::UnknownNode`].
    pub fn require(&self, id: NodeId) -> SpatialResult<NodeIdx> {
        self.node_idx(id).ok_or(SpatialError::UnknownNode(id))
    }

    #[inline]
    pub fn node_id(&self, idx: NodeIdx) -> NodeId {
        self.node_ids[idx.index()]
    }

    #[inline]
    pub fn node_pos(&self, idx: NodeIdx) -> GeoPoint {
        self.node_pos[idx.index()]
    }

    /// Position of a node by stable id.
    pub fn position(&self, id: NodeId) -> Option<GeoPoint> {
        self.node_idx(id).map(|idx| self.node_pos(idx))
    }

    /// Iterator over `(id, position)` in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, GeoPoint)> + '_ {
        self.node_ids.iter().copied().zip(self.node_pos.iter().copied())
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeIdx) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (parallel edges count separately).
    #[inline]
    pub fn out_degree(&self, node: NodeIdx) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// All parallel edges `from → to`, in key order.
    ///
    /// Binary search inside `from`'s CSR row, so O(log deg).
    pub fn edges_between(&self, from: NodeIdx, to: NodeIdx) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[from.index()] as usize;
        let end   = self.node_out_start[from.index() + 1] as usize;
        let row   = &self.edge_to[start..end];
        let lo    = start + row.partition_point(|&t| t < to);
        let hi    = start + row.partition_point(|&t| t <= to);
        (lo..hi).map(|i| EdgeId(i as u32))
    }

    /// Iterator over every `EdgeId` in CSR order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + use<> {
        (0..self.edge_count() as u32).map(EdgeId)
    }

    #[inline]
    pub fn edge_from(&self, edge: EdgeId) -> NodeIdx {
        self.edge_from[edge.index()]
    }

    #[inline]
    pub fn edge_to(&self, edge: EdgeId) -> NodeIdx {
        self.edge_to[edge.index()]
    }

    #[inline]
    pub fn edge_length_m(&self, edge: EdgeId) -> f64 {
        self.edge_length_m[edge.index()]
    }

    #[inline]
    pub fn edge_key(&self, edge: EdgeId) -> u32 {
        self.edge_key[edge.index()]
    }

    pub fn edge_geometry(&self, edge: EdgeId) -> Option<&[GeoPoint]> {
        self.edge_geometry[edge.index()].as_deref()
    }

    /// Resolve an edge into a borrowed view with stable node ids.
    pub fn edge(&self, edge: EdgeId) -> EdgeRef<'_> {
        EdgeRef {
            id:       edge,
            from:     self.node_id(self.edge_from(edge)),
            to:       self.node_id(self.edge_to(edge)),
            length_m: self.edge_length_m(edge),
            key:      self.edge_key(edge),
            geometry: self.edge_geometry(edge),
        }
    }

    /// Iterator over all edges as [`EdgeRef`]s, e.g. for background rendering.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> + '_ {
        self.edge_ids().map(|e| self.edge(e))
    }

    /// Drawable polyline for an edge: its geometry if present, otherwise the
    /// straight segment between its endpoints.
    pub fn edge_polyline(&self, edge: EdgeId) -> Vec<GeoPoint> {
        match self.edge_geometry(edge) {
            Some(g) => g.to_vec(),
            None => vec![
                self.node_pos(self.edge_from(edge)),
                self.node_pos(self.edge_to(edge)),
            ],
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::empty()
    }
}

// ── Edge specification ────────────────────────────────────────────────────────

/// Description of one directed edge handed to [`GraphStoreBuilder::add_edge`].
#[derive(Debug, Clone)]
pub struct EdgeSpec {
    pub from:     NodeId,
    pub to:       NodeId,
    pub length_m: f64,
    /// Parallel-edge discriminator.  `None` → next free key for the pair.
    pub key:      Option<u32>,
    pub geometry: Option<Vec<GeoPoint>>,
}

impl EdgeSpec {
    pub fn new(from: NodeId, to: NodeId, length_m: f64) -> Self {
        Self { from, to, length_m, key: None, geometry: None }
    }

    pub fn key(mut self, key: u32) -> Self {
        self.key = Some(key);
        self
    }

    pub fn geometry(mut self, geometry: Vec<GeoPoint>) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

// ── GraphStoreBuilder ─────────────────────────────────────────────────────────

/// Construct a [`GraphStore`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// validates the input, sorts nodes by id and edges by
/// `(source, target, key)`, and constructs the CSR arrays.
///
/// # Example
///
/// ```
/// use rr_core::{GeoPoint, NodeId};
/// use rr_spatial::GraphStoreBuilder;
///
/// let mut b = GraphStoreBuilder::new();
/// b.add_node(NodeId(1), GeoPoint::new(107.539, -6.934));
/// b.add_node(NodeId(2), GeoPoint::new(107.540, -6.930));
/// b.add_road(NodeId(1), NodeId(2), 470.0);
/// let store = b.build().unwrap();
/// assert_eq!(store.node_count(), 2);
/// assert_eq!(store.edge_count(), 2); // bidirectional
/// ```
#[derive(Default)]
pub struct GraphStoreBuilder {
    nodes:     Vec<(NodeId, GeoPoint)>,
    raw_edges: Vec<EdgeSpec>,
}

impl GraphStoreBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges to reduce
    /// reallocations when bulk-loading from OSM or CSV.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a road node.  Duplicate ids are reported by [`build`](Self::build).
    pub fn add_node(&mut self, id: NodeId, pos: GeoPoint) -> NodeId {
        self.nodes.push((id, pos));
        id
    }

    /// Add a **directed** edge `from → to` of `length_m` metres.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) {
        self.raw_edges.push(EdgeSpec::new(from, to, length_m));
    }

    /// Convenience: add edges in **both directions** for a two-way road.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_directed_edge(a, b, length_m);
        self.add_directed_edge(b, a, length_m);
    }

    /// Add a fully specified directed edge.
    pub fn add_edge(&mut self, edge: EdgeSpec) {
        self.raw_edges.push(edge);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`GraphStore`].
    ///
    /// # Errors
    ///
    /// - [`SpatialError::Core`] for a node outside WGS-84 range.
    /// - [`SpatialError::DuplicateNode`] if two nodes share an id.
    /// - [`SpatialError::DanglingEdge`] if an edge names an unknown node.
    /// - [`SpatialError::DuplicateEdgeKey`] if two edges of one `(from, to)`
    ///   pair share a key, explicit or assigned.
    /// - [`SpatialError::GeometryMismatch`] if an edge's geometry does not
    ///   start at its source and end at its target.
    ///
    /// Edge lengths are not validated here; the router rejects negative or
    /// non-finite weights when it meets them.
    ///
    /// Time complexity: O(N log N + E log E).
    pub fn build(self) -> SpatialResult<GraphStore> {
        // ── Nodes: validate, sort by id, reject duplicates ────────────────
        let mut nodes = self.nodes;
        for &(_, pos) in &nodes {
            pos.validated()?;
        }
        nodes.sort_unstable_by_key(|&(id, _)| id);
        if let Some(w) = nodes.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(SpatialError::DuplicateNode(w[0].0));
        }

        let node_count = nodes.len();
        let (node_ids, node_pos): (Vec<NodeId>, Vec<GeoPoint>) = nodes.into_iter().unzip();

        let mut id_to_idx = FxHashMap::with_capacity_and_hasher(node_count, Default::default());
        for (i, &id) in node_ids.iter().enumerate() {
            id_to_idx.insert(id, NodeIdx(i as u32));
        }

        // ── Edges: resolve endpoints, check geometry, assign keys ─────────
        let mut next_key: FxHashMap<(NodeIdx, NodeIdx), u32> = FxHashMap::default();
        let mut resolved = Vec::with_capacity(self.raw_edges.len());

        for spec in self.raw_edges {
            let (Some(&from), Some(&to)) = (id_to_idx.get(&spec.from), id_to_idx.get(&spec.to))
            else {
                return Err(SpatialError::DanglingEdge { from: spec.from, to: spec.to });
            };

            if let Some(g) = &spec.geometry {
                let ok = g.len() >= 2
                    && g[0].approx_eq(node_pos[from.index()], GEOMETRY_TOLERANCE_DEG)
                    && g[g.len() - 1].approx_eq(node_pos[to.index()], GEOMETRY_TOLERANCE_DEG);
                if !ok {
                    return Err(SpatialError::GeometryMismatch { from: spec.from, to: spec.to });
                }
            }

            let counter = next_key.entry((from, to)).or_insert(0);
            let key = match spec.key {
                Some(k) => {
                    *counter = (*counter).max(k.saturating_add(1));
                    k
                }
                None => {
                    let k = *counter;
                    *counter += 1;
                    k
                }
            };

            resolved.push(RawEdge {
                from,
                to,
                key,
                length_m: spec.length_m,
                geometry: spec.geometry.map(Arc::from),
            });
        }

        resolved.sort_by_key(|e| (e.from, e.to, e.key));
        if let Some(w) = resolved
            .windows(2)
            .find(|w| (w[0].from, w[0].to, w[0].key) == (w[1].from, w[1].to, w[1].key))
        {
            return Err(SpatialError::DuplicateEdgeKey {
                from: node_ids[w[0].from.index()],
                to:   node_ids[w[0].to.index()],
                key:  w[0].key,
            });
        }

        let store = assemble(node_ids, node_pos, id_to_idx, resolved);
        debug!(
            nodes = store.node_count(),
            edges = store.edge_count(),
            "built graph store"
        );
        Ok(store)
    }
}

// ── CSR assembly ──────────────────────────────────────────────────────────────

pub(crate) struct RawEdge {
    pub(crate) from:     NodeIdx,
    pub(crate) to:       NodeIdx,
    pub(crate) key:      u32,
    pub(crate) length_m: f64,
    pub(crate) geometry: Option<Arc<[GeoPoint]>>,
}

/// Build CSR arrays from edges already sorted by `(from, to, key)`.
pub(crate) fn assemble(
    node_ids:  Vec<NodeId>,
    node_pos:  Vec<GeoPoint>,
    id_to_idx: FxHashMap<NodeId, NodeIdx>,
    sorted:    Vec<RawEdge>,
) -> GraphStore {
    let node_count = node_ids.len();
    let edge_count = sorted.len();

    let mut node_out_start = vec![0u32; node_count + 1];
    for e in &sorted {
        node_out_start[e.from.index() + 1] += 1;
    }
    for i in 1..=node_count {
        node_out_start[i] += node_out_start[i - 1];
    }
    debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

    let mut edge_from     = Vec::with_capacity(edge_count);
    let mut edge_to       = Vec::with_capacity(edge_count);
    let mut edge_length_m = Vec::with_capacity(edge_count);
    let mut edge_key      = Vec::with_capacity(edge_count);
    let mut edge_geometry = Vec::with_capacity(edge_count);
    for e in sorted {
        edge_from.push(e.from);
        edge_to.push(e.to);
        edge_length_m.push(e.length_m);
        edge_key.push(e.key);
        edge_geometry.push(e.geometry);
    }

    GraphStore {
        node_ids,
        node_pos,
        id_to_idx,
        node_out_start,
        edge_from,
        edge_to,
        edge_length_m,
        edge_key,
        edge_geometry,
    }
}
