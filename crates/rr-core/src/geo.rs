//! Geographic coordinate and bounding-box types.
//!
//! `GeoPoint` uses `f64` longitude/latitude.  Graph sources such as OSM carry
//! seven decimal places, and nearest-node ties are decided on exact
//! coordinate equality, so single precision would merge distinct nodes.

use crate::{CoreError, CoreResult};

/// A WGS-84 geographic coordinate.
///
/// Field order follows the (lon, lat) convention used by geometry
/// polylines; constructors take arguments in that same order.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// `true` if both components are finite and within WGS-84 range.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Return `self` if valid, otherwise [`CoreError::InvalidCoordinate`].
    pub fn validated(self) -> CoreResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(CoreError::InvalidCoordinate(self))
        }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// `true` if both components are within `tol_deg` of `other`.
    #[inline]
    pub fn approx_eq(self, other: GeoPoint, tol_deg: f64) -> bool {
        (self.lat - other.lat).abs() <= tol_deg && (self.lon - other.lon).abs() <= tol_deg
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(lon {:.7}, lat {:.7})", self.lon, self.lat)
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// A closed, axis-aligned region in degrees.
///
/// Invariant (checked by [`BoundingBox::new`]): `north > south` and
/// `east > west`.  Boxes crossing the antimeridian are not representable.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    north: f64,
    south: f64,
    east:  f64,
    west:  f64,
}

impl BoundingBox {
    /// Validate and construct a box from (north, south, east, west) degrees.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> CoreResult<Self> {
        let invalid = |reason| CoreError::InvalidBoundingBox { north, south, east, west, reason };

        if ![north, south, east, west].iter().all(|v| v.is_finite()) {
            return Err(invalid("all edges must be finite"));
        }
        if !(-90.0..=90.0).contains(&north) || !(-90.0..=90.0).contains(&south) {
            return Err(invalid("latitude out of range"));
        }
        if !(-180.0..=180.0).contains(&east) || !(-180.0..=180.0).contains(&west) {
            return Err(invalid("longitude out of range"));
        }
        if north <= south {
            return Err(invalid("north must be greater than south"));
        }
        if east <= west {
            return Err(invalid("east must be greater than west"));
        }
        Ok(Self { north, south, east, west })
    }

    pub fn north(&self) -> f64 { self.north }
    pub fn south(&self) -> f64 { self.south }
    pub fn east(&self)  -> f64 { self.east }
    pub fn west(&self)  -> f64 { self.west }

    /// Closed containment test: points on the boundary are inside.
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lon >= self.west && p.lon <= self.east
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[N {:.5}, S {:.5}, E {:.5}, W {:.5}]",
            self.north, self.south, self.east, self.west
        )
    }
}
