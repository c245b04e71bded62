//! `rr-core` — foundational types for the `rust_route` workspace.
//!
//! This crate is a dependency of every other `rr-*` crate.  It has no
//! `rr-*` dependencies and only `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`ids`]   | `NodeId` (stable), `NodeIdx` / `EdgeId` (dense indices)   |
//! | [`geo`]   | `GeoPoint`, haversine distance, `BoundingBox`             |
//! | [`error`] | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{BoundingBox, GeoPoint};
pub use ids::{EdgeId, NodeId, NodeIdx};
