//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait, so a different engine (A*,
//! contraction hierarchies) can be swapped in without touching the pipeline.
//! The default [`DijkstraRouter`] is a plain binary-heap Dijkstra that stops
//! once every node no farther than the destination is settled.
//!
//! # Weights
//!
//! The search cost of an edge comes from an [`EdgeWeight`], by default
//! [`ByLength`] (metres).  Any `Fn(&GraphStore, EdgeId) -> f64 + Sync`
//! closure is also a weight.  Whatever the weight, the returned
//! [`RouteSummary`] reports *lengths*: for each hop it picks the shortest of
//! the parallel edges between the two nodes.
//!
//! # Determinism
//!
//! Heap entries are ordered by `(cost, node index)`, and node index order is
//! node id order, so pop order is total.  The path itself is chosen after the
//! search: among all shortest paths (the *tight* edges, `dist[u] + w ==
//! dist[v]`), the walk from the start always takes the lowest-id successor
//! that can still reach the destination, so the path whose first differing
//! node has the lower id wins.  This holds with zero-length edges too.
//! Identical input always yields an identical route.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use tracing::debug;

use rr_core::{EdgeId, NodeId, NodeIdx};

use crate::summary::{RouteSummary, summarize_indices};
use crate::{GraphStore, SpatialError, SpatialResult};

/// How many settled nodes between deadline checks.
const DEADLINE_CHECK_INTERVAL: u32 = 1024;

// ── Edge weights ──────────────────────────────────────────────────────────────

/// Search cost of traversing one edge.  Must be finite and non-negative;
/// the router fails with [`SpatialError::InvalidWeight`] otherwise.
pub trait EdgeWeight: Sync {
    fn weight(&self, store: &GraphStore, edge: EdgeId) -> f64;
}

/// Edge length in metres.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByLength;

impl EdgeWeight for ByLength {
    #[inline]
    fn weight(&self, store: &GraphStore, edge: EdgeId) -> f64 {
        store.edge_length_m(edge)
    }
}

impl<F> EdgeWeight for F
where
    F: Fn(&GraphStore, EdgeId) -> f64 + Sync,
{
    #[inline]
    fn weight(&self, store: &GraphStore, edge: EdgeId) -> f64 {
        self(store, edge)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve concurrent
/// requests against a shared, immutable [`GraphStore`].
pub trait Router: Send + Sync {
    /// Compute the route from `from` to `to`.
    ///
    /// `from == to` yields the single-node route with zero distance.
    fn route(&self, store: &GraphStore, from: NodeId, to: NodeId) -> SpatialResult<RouteSummary>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm over the CSR multigraph.
///
/// ```
/// use rr_core::{GeoPoint, NodeId};
/// use rr_spatial::{DijkstraRouter, GraphStoreBuilder, Router};
///
/// let mut b = GraphStoreBuilder::new();
/// for id in 1..=3 {
///     b.add_node(NodeId(id), GeoPoint::new(107.0 + id as f64 * 0.01, -6.9));
/// }
/// b.add_directed_edge(NodeId(1), NodeId(2), 100.0);
/// b.add_directed_edge(NodeId(2), NodeId(3), 150.0);
/// b.add_directed_edge(NodeId(1), NodeId(3), 300.0);
/// let store = b.build().unwrap();
///
/// let route = DijkstraRouter::new().route(&store, NodeId(1), NodeId(3)).unwrap();
/// assert_eq!(route.nodes(), &[NodeId(1), NodeId(2), NodeId(3)]);
/// assert_eq!(route.total_distance_m(), 250.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DijkstraRouter<W = ByLength> {
    weight:   W,
    deadline: Option<Duration>,
}

impl DijkstraRouter<ByLength> {
    /// Router weighting edges by length, with no deadline.
    pub fn new() -> Self {
        Self { weight: ByLength, deadline: None }
    }
}

impl<W: EdgeWeight> DijkstraRouter<W> {
    /// Router using a custom edge weight.
    pub fn with_weight(weight: W) -> Self {
        Self { weight, deadline: None }
    }

    /// Abandon any single search that runs longer than `deadline`, failing
    /// with [`SpatialError::DeadlineExceeded`].
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

impl<W: EdgeWeight + Send> Router for DijkstraRouter<W> {
    fn route(&self, store: &GraphStore, from: NodeId, to: NodeId) -> SpatialResult<RouteSummary> {
        let deadline = self.deadline.map(|d| Instant::now() + d);
        let path = dijkstra(store, from, to, &self.weight, deadline)?;
        summarize_indices(store, &path)
    }
}

/// Shortest path from `from` to `to` under `weight`, as a [`RouteSummary`].
///
/// # Errors
///
/// - [`SpatialError::UnknownNode`] if either id is absent (start checked
///   first).
/// - [`SpatialError::NoPathFound`] if `to` is unreachable from `from`.
/// - [`SpatialError::InvalidWeight`] on a negative or non-finite weight.
/// - [`SpatialError::CostOverflow`] if `to` is unreachable and some path
///   cost on the way exceeded `f64::MAX`.
pub fn shortest_path<W: EdgeWeight>(
    store:  &GraphStore,
    from:   NodeId,
    to:     NodeId,
    weight: &W,
) -> SpatialResult<RouteSummary> {
    let path = dijkstra(store, from, to, weight, None)?;
    summarize_indices(store, &path)
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    cost: f64,
    node: NodeIdx,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra<W: EdgeWeight>(
    store:    &GraphStore,
    from:     NodeId,
    to:       NodeId,
    weight:   &W,
    deadline: Option<Instant>,
) -> SpatialResult<Vec<NodeIdx>> {
    let src = store.require(from)?;
    let dst = store.require(to)?;

    if src == dst {
        return Ok(vec![src]);
    }

    let n = store.node_count();
    // dist[v] = best known cost to reach v; final once settled.
    let mut dist    = vec![f64::INFINITY; n];
    let mut settled = vec![false; n];

    dist[src.index()] = 0.0;

    // Reverse makes BinaryHeap (max) behave as a min-heap.
    let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    heap.push(Reverse(HeapEntry { cost: 0.0, node: src }));
    let mut settled_count: u32 = 0;
    // Cost of `dst` once settled.  Every node at or below it is settled
    // too, so all equal-cost shortest paths are known.
    let mut target = f64::INFINITY;
    let mut overflowed = false;

    while let Some(Reverse(HeapEntry { cost, node })) = heap.pop() {
        if cost > target {
            break;
        }
        // Skip stale heap entries.
        if settled[node.index()] || cost > dist[node.index()] {
            continue;
        }
        settled[node.index()] = true;
        settled_count += 1;

        if node == dst {
            target = cost;
        }

        if let Some(deadline) = deadline {
            if settled_count % DEADLINE_CHECK_INTERVAL == 1 && Instant::now() >= deadline {
                debug!(%from, %to, settled = settled_count, "dijkstra deadline exceeded");
                return Err(SpatialError::DeadlineExceeded { from, to });
            }
        }

        for edge in store.out_edges(node) {
            let w = checked_weight(store, weight, edge)?;
            let neighbor = store.edge_to(edge);
            if settled[neighbor.index()] {
                continue;
            }

            let new_cost = cost + w;
            if !new_cost.is_finite() {
                // Costlier than any finite path, so never on a shortest one.
                overflowed = true;
                continue;
            }
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                heap.push(Reverse(HeapEntry { cost: new_cost, node: neighbor }));
            }
        }
    }

    if !settled[dst.index()] {
        debug!(%from, %to, settled = settled_count, overflowed, "dijkstra exhausted reachable set");
        return Err(if overflowed {
            SpatialError::CostOverflow { from, to }
        } else {
            SpatialError::NoPathFound { from, to }
        });
    }
    debug!(%from, %to, settled = settled_count, cost = target, "dijkstra reached destination");

    TightEdges::collect(store, weight, &dist, &settled)?.lowest_id_path(store, src, dst)
}

fn checked_weight<W: EdgeWeight>(store: &GraphStore, weight: &W, edge: EdgeId) -> SpatialResult<f64> {
    let w = weight.weight(store, edge);
    if w.is_finite() && w >= 0.0 {
        Ok(w)
    } else {
        Err(SpatialError::InvalidWeight {
            from:   store.node_id(store.edge_from(edge)),
            to:     store.node_id(store.edge_to(edge)),
            weight: w,
        })
    }
}

// ── Equal-cost path resolution ────────────────────────────────────────────────

/// Edges `u → v` between settled nodes with `dist[u] + w == dist[v]`.
///
/// Every path from the start made of tight edges is a shortest path, and
/// every shortest path is made of tight edges.
struct TightEdges {
    node_count: usize,
    /// `(to, from)` pairs, sorted, for predecessor lookup.
    reverse:    Vec<(NodeIdx, NodeIdx)>,
    /// Some tight edge has zero weight, so tight cycles are possible.
    zero_edges: bool,
}

impl TightEdges {
    fn collect<W: EdgeWeight>(
        store:   &GraphStore,
        weight:  &W,
        dist:    &[f64],
        settled: &[bool],
    ) -> SpatialResult<Self> {
        let mut reverse    = Vec::new();
        let mut zero_edges = false;
        for (i, _) in settled.iter().enumerate().filter(|&(_, &s)| s) {
            let u = NodeIdx(i as u32);
            for edge in store.out_edges(u) {
                let v = store.edge_to(edge);
                let w = checked_weight(store, weight, edge)?;
                if v != u && settled[v.index()] && dist[u.index()] + w == dist[v.index()] {
                    reverse.push((v, u));
                    zero_edges |= w == 0.0;
                }
            }
        }
        reverse.sort_unstable();
        reverse.dedup();
        Ok(Self { node_count: settled.len(), reverse, zero_edges })
    }

    fn predecessors(&self, v: NodeIdx) -> &[(NodeIdx, NodeIdx)] {
        let lo = self.reverse.partition_point(|&(t, _)| t < v);
        let hi = self.reverse.partition_point(|&(t, _)| t <= v);
        &self.reverse[lo..hi]
    }

    fn is_tight(&self, u: NodeIdx, v: NodeIdx) -> bool {
        self.predecessors(v).iter().any(|&(_, p)| p == u)
    }

    /// Nodes with a tight path to `dst` that avoids every `blocked` node.
    fn reaching(&self, dst: NodeIdx, blocked: &[bool]) -> Vec<bool> {
        let mut reach = vec![false; self.node_count];
        reach[dst.index()] = true;
        let mut stack = vec![dst];
        while let Some(v) = stack.pop() {
            for &(_, u) in self.predecessors(v) {
                if !reach[u.index()] && !blocked[u.index()] {
                    reach[u.index()] = true;
                    stack.push(u);
                }
            }
        }
        reach
    }

    /// Walk from `src`, always stepping to the lowest-id tight successor that
    /// can still reach `dst`.  The result is the shortest path whose first
    /// differing node has the lowest id.
    fn lowest_id_path(
        &self,
        store: &GraphStore,
        src:   NodeIdx,
        dst:   NodeIdx,
    ) -> SpatialResult<Vec<NodeIdx>> {
        let mut visited = vec![false; self.node_count];
        visited[src.index()] = true;
        // Without zero-weight tight edges cost strictly increases along the
        // walk, so a visited node is never a tight successor and one
        // reachability pass suffices.
        let mut reach = self.reaching(dst, &visited);

        let mut path = vec![src];
        let mut cur  = src;
        while cur != dst {
            if self.zero_edges {
                reach = self.reaching(dst, &visited);
            }
            // Out edges are sorted by target, so the first match has the lowest id.
            let next = store
                .out_edges(cur)
                .map(|e| store.edge_to(e))
                .find(|&v| reach[v.index()] && !visited[v.index()] && self.is_tight(cur, v));
            let Some(v) = next else {
                return Err(SpatialError::NoPathFound {
                    from: store.node_id(src),
                    to:   store.node_id(dst),
                });
            };
            visited[v.index()] = true;
            path.push(v);
            cur = v;
        }
        Ok(path)
    }
}
