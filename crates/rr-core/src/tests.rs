//! Unit tests for rr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, NodeIdx};

    #[test]
    fn index_roundtrip() {
        let id = NodeIdx(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeIdx::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(NodeIdx(100) > NodeIdx(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u64::MAX);
        assert_eq!(NodeIdx::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert!(!EdgeId::default().is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "7");
        assert_eq!(NodeIdx(7).to_string(), "NodeIdx(7)");
        assert_eq!(EdgeId(3).to_string(), "EdgeId(3)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{CoreError, GeoPoint};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(107.539303, -6.934878);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(107.0, -7.0);
        let b = GeoPoint::new(107.0, -6.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn validity() {
        assert!(GeoPoint::new(180.0, -90.0).is_valid());
        assert!(!GeoPoint::new(180.5, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
        assert!(matches!(
            GeoPoint::new(0.0, 91.0).validated(),
            Err(CoreError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn approx_eq_tolerance() {
        let a = GeoPoint::new(107.6, -6.9);
        assert!(a.approx_eq(GeoPoint::new(107.6 + 1e-8, -6.9), 1e-6));
        assert!(!a.approx_eq(GeoPoint::new(107.61, -6.9), 1e-6));
    }
}

#[cfg(test)]
mod bbox {
    use crate::{BoundingBox, CoreError, GeoPoint};

    #[test]
    fn valid_box() {
        let b = BoundingBox::new(-6.85, -6.99, 107.65, 107.50).unwrap();
        assert_eq!(b.north(), -6.85);
        assert_eq!(b.west(), 107.50);
    }

    #[test]
    fn inverted_edges_rejected() {
        assert!(matches!(
            BoundingBox::new(-6.99, -6.85, 107.65, 107.50),
            Err(CoreError::InvalidBoundingBox { .. })
        ));
        assert!(matches!(
            BoundingBox::new(-6.85, -6.99, 107.50, 107.65),
            Err(CoreError::InvalidBoundingBox { .. })
        ));
        // Degenerate (zero-height) boxes are rejected too.
        assert!(BoundingBox::new(1.0, 1.0, 2.0, 0.0).is_err());
    }

    #[test]
    fn non_finite_or_out_of_range_rejected() {
        assert!(BoundingBox::new(f64::NAN, 0.0, 1.0, 0.0).is_err());
        assert!(BoundingBox::new(95.0, 0.0, 1.0, 0.0).is_err());
        assert!(BoundingBox::new(1.0, 0.0, 181.0, 0.0).is_err());
    }

    #[test]
    fn containment_is_closed() {
        let b = BoundingBox::new(1.0, 0.0, 1.0, 0.0).unwrap();
        assert!(b.contains(GeoPoint::new(0.5, 0.5)));
        assert!(b.contains(GeoPoint::new(0.0, 0.0)));
        assert!(b.contains(GeoPoint::new(1.0, 1.0)));
        assert!(!b.contains(GeoPoint::new(1.0000001, 0.5)));
        assert!(!b.contains(GeoPoint::new(0.5, -0.0000001)));
    }
}
