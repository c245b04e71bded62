//! Tests for rr-output writers.

#[cfg(test)]
mod fixtures {
    use rr_core::{GeoPoint, NodeId};
    use rr_spatial::{EdgeSpec, GraphStore, GraphStoreBuilder, RouteSummary, summarize};

    /// 1 → 2 → 3 with a curved first edge and a straight second edge.
    pub fn store_and_route() -> (GraphStore, RouteSummary) {
        let a = GeoPoint::new(107.539303, -6.934878);
        let m = GeoPoint::new(107.542, -6.933);
        let c = GeoPoint::new(107.545, -6.930);
        let d = GeoPoint::new(107.550, -6.925);

        let mut b = GraphStoreBuilder::new();
        b.add_node(NodeId(1), a);
        b.add_node(NodeId(2), c);
        b.add_node(NodeId(3), d);
        b.add_edge(EdgeSpec::new(NodeId(1), NodeId(2), 812.0).geometry(vec![a, m, c]));
        b.add_directed_edge(NodeId(2), NodeId(3), 780.5);
        b.add_directed_edge(NodeId(3), NodeId(2), 780.5);
        let store = b.build().unwrap();

        let route = summarize(&store, &[NodeId(1), NodeId(2), NodeId(3)]).unwrap();
        (store, route)
    }
}

#[cfg(test)]
mod rows {
    use crate::row::{network_rows, route_rows};

    #[test]
    fn cumulative_distance_accumulates() {
        let (store, route) = super::fixtures::store_and_route();
        let rows = route_rows(&route, &store).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].cumulative_m, 0.0);
        assert_eq!(rows[1].cumulative_m, 812.0);
        assert_eq!(rows[2].cumulative_m, 1_592.5);
        assert_eq!(rows[2].node_id, 3);
    }

    #[test]
    fn network_rows_use_geometry_or_segment() {
        let (store, _) = super::fixtures::store_and_route();
        let rows: Vec<_> = network_rows(&store).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].points.len(), 3); // curved
        assert_eq!(rows[1].points.len(), 2); // straight
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::writer::RouteRenderer;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("route_nodes.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["seq", "node_id", "lat", "lon", "cumulative_m"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("network_edges.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["from", "to", "key", "length_m", "wkt"]);
    }

    #[test]
    fn csv_route_and_network_rows() {
        let (store, route) = super::fixtures::store_and_route();
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_network(&store).unwrap();
        w.write_route(&route, &store).unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // idempotent

        let mut rdr = csv::Reader::from_path(dir.path().join("route_nodes.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][1], "1");
        assert_eq!(&rows[2][1], "3");
        assert_eq!(&rows[2][4], "1592.500");

        let mut rdr = csv::Reader::from_path(dir.path().join("network_edges.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][3], "812.000");
        assert!(rows[0][4].starts_with("LINESTRING (107.539303 -6.934878, 107.542 -6.933"));
    }
}

#[cfg(test)]
mod geojson_tests {
    use crate::geojson::GeoJsonWriter;
    use crate::writer::RouteRenderer;

    #[test]
    fn feature_collection_layout() {
        let (store, route) = super::fixtures::store_and_route();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.geojson");

        let mut w = GeoJsonWriter::new(&path);
        w.write_network(&store).unwrap();
        w.write_route(&route, &store).unwrap();
        w.finish().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["type"], "FeatureCollection");

        let features = v["features"].as_array().unwrap();
        assert_eq!(features.len(), 4);
        assert_eq!(features[0]["properties"]["role"], "network");

        let route_feature = &features[3];
        assert_eq!(route_feature["properties"]["role"], "route");
        assert_eq!(route_feature["properties"]["total_distance_m"], 1_592.5);
        // Curved first edge (3 points) + straight second edge, shared joint once.
        let coords = route_feature["geometry"]["coordinates"].as_array().unwrap();
        assert_eq!(coords.len(), 4);
        assert_eq!(coords[0][0], 107.539303);
        assert_eq!(coords[0][1], -6.934878);
    }
}
