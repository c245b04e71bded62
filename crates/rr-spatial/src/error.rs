//! Spatial-subsystem error type.

use thiserror::Error;

use rr_core::{CoreError, EdgeId, NodeId};

/// Errors produced by `rr-spatial`.
///
/// Every variant is a deterministic function of the input data; none is
/// transient, so callers should never retry the same request unchanged.
#[derive(Debug, Error)]
pub enum SpatialError {
    // ── Graph source / load errors ────────────────────────────────────────
    #[error("graph load error: {0}")]
    Load(String),

    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    #[error("edge {from} -> {to} references a node that is not in the graph")]
    DanglingEdge { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} has duplicate key {key}")]
    DuplicateEdgeKey { from: NodeId, to: NodeId, key: u32 },

    #[error("geometry of edge {from} -> {to} does not start/end at its endpoints")]
    GeometryMismatch { from: NodeId, to: NodeId },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    // ── Query errors ──────────────────────────────────────────────────────
    #[error("graph has no nodes; widen the bounding box")]
    EmptyGraph,

    #[error("node {0} not found in graph")]
    UnknownNode(NodeId),

    #[error("route path is empty")]
    EmptyPath,

    #[error("no path from {from} to {to}")]
    NoPathFound { from: NodeId, to: NodeId },

    #[error(
        "no path from {from} to {to} inside the bounding box, \
         but one exists in the full graph; widen the bounding box"
    )]
    DisconnectedByTruncation { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight { from: NodeId, to: NodeId, weight: f64 },

    #[error("path cost from {from} to {to} overflows f64")]
    CostOverflow { from: NodeId, to: NodeId },

    #[error("edge {0} is not a hop of this route in the given graph")]
    UnknownEdge(EdgeId),

    #[error("search from {from} to {to} exceeded its deadline")]
    DeadlineExceeded { from: NodeId, to: NodeId },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
