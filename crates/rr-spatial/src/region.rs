//! Bounding-box truncation of a [`GraphStore`].
//!
//! Keeps exactly the nodes inside the closed box and exactly the edges whose
//! two endpoints both survive.  Edges are never clipped, and the result is
//! not reconnected: truncation can split a connected network into pieces,
//! which the router then reports as `NoPathFound`.
//!
//! Node order is preserved, so the old→new index map is monotone and the
//! input's CSR order is already the output's CSR order.  Truncation is one
//! pass over nodes plus one pass over edges, with no sorting.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use rr_core::{BoundingBox, NodeIdx};

use crate::store::{GraphStore, RawEdge, assemble};

/// Return a new store restricted to `bbox`.  `store` is left untouched;
/// edge geometry is shared with it.
pub fn truncate(store: &GraphStore, bbox: &BoundingBox) -> GraphStore {
    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut remap    = vec![NodeIdx::INVALID; store.node_count()];
    let mut node_ids = Vec::new();
    let mut node_pos = Vec::new();

    for (i, (id, pos)) in store.nodes().enumerate() {
        if bbox.contains(pos) {
            remap[i] = NodeIdx(node_ids.len() as u32);
            node_ids.push(id);
            node_pos.push(pos);
        }
    }

    let mut id_to_idx = FxHashMap::with_capacity_and_hasher(node_ids.len(), Default::default());
    for (i, &id) in node_ids.iter().enumerate() {
        id_to_idx.insert(id, NodeIdx(i as u32));
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let edges: Vec<RawEdge> = store
        .edge_ids()
        .filter_map(|e| {
            let from = remap[store.edge_from(e).index()];
            let to   = remap[store.edge_to(e).index()];
            (from.is_valid() && to.is_valid()).then(|| RawEdge {
                from,
                to,
                key:      store.edge_key(e),
                length_m: store.edge_length_m(e),
                geometry: store.edge_geometry[e.index()].as_ref().map(Arc::clone),
            })
        })
        .collect();

    let out = assemble(node_ids, node_pos, id_to_idx, edges);

    info!(
        %bbox,
        nodes = out.node_count(),
        edges = out.edge_count(),
        removed_nodes = store.node_count() - out.node_count(),
        removed_edges = store.edge_count() - out.edge_count(),
        "truncated graph to bounding box"
    );
    if out.is_empty() {
        warn!(%bbox, "bounding box contains no graph nodes");
    }

    out
}
