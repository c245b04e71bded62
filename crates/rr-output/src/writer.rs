//! The `RouteRenderer` trait implemented by all backend writers.

use rr_spatial::{GraphStore, RouteSummary};

use crate::OutputResult;

/// Receiver of a computed route and its background network.
///
/// Implementations decide the file layout; they never influence routing.
/// `store` must be the store the route was computed on, because the
/// summary's edge ids index into it.
pub trait RouteRenderer {
    /// Write the route: ordered coordinates and total distance.
    fn write_route(&mut self, route: &RouteSummary, store: &GraphStore) -> OutputResult<()>;

    /// Write every edge of `store` for background display.
    fn write_network(&mut self, store: &GraphStore) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
