//! Core error type.
//!
//! Sub-crates wrap `CoreError` as one variant of their own enum via a
//! `#[from]` conversion.

use thiserror::Error;

use crate::GeoPoint;

/// Errors produced while validating core value types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error(
        "invalid bounding box (north {north}, south {south}, east {east}, west {west}): {reason}"
    )]
    InvalidBoundingBox {
        north:  f64,
        south:  f64,
        east:   f64,
        west:   f64,
        reason: &'static str,
    },

    #[error("coordinate {0} is outside lat [-90, 90] / lon [-180, 180]")]
    InvalidCoordinate(GeoPoint),
}

/// Shorthand result type for `rr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
