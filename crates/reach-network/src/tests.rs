use reach_core::geo::{meters_per_pixel, LonLat};
use reach_core::NodeId;

use crate::edge::{EdgeRow, ScenarioOverlay};
use crate::network::NetworkBuilder;
use crate::NetworkError;

// Roughly 100 m of latitude near the equator.
const LAT_100M: f64 = 100.0 / 111_195.0;

fn ll(lon: f64, lat: f64) -> LonLat {
    LonLat { lon, lat }
}

/// Three-node path a --(1)--> b --(2)--> c along the equator, 100 m per hop.
fn path_rows() -> Vec<EdgeRow> {
    vec![
        EdgeRow::straight(1, 10, 11, ll(0.0, 0.0), ll(0.0, LAT_100M), 100.0),
        EdgeRow::straight(2, 11, 12, ll(0.0, LAT_100M), ll(0.0, 2.0 * LAT_100M), 100.0),
    ]
}

fn walking_builder() -> NetworkBuilder {
    // 1 m/s keeps costs equal to metres.
    NetworkBuilder::new(14, 1.0)
}

mod builder {
    use super::*;

    #[test]
    fn shared_vertices_merge_into_one_node() {
        let mut b = walking_builder();
        assert_eq!(b.add_rows(path_rows().iter()), 0);
        let net = b.build();
        assert_eq!(net.node_count(), 3);
        // Two bidirectional edges -> four arcs.
        assert_eq!(net.arc_count(), 4);
    }

    #[test]
    fn csr_rows_cover_all_arcs() {
        let mut b = walking_builder();
        b.add_rows(path_rows().iter());
        let net = b.build();
        let total: usize = (0..net.node_count())
            .map(|n| net.out_degree(NodeId(n as u32)))
            .sum();
        assert_eq!(total, net.arc_count());
        assert_eq!(net.node_out_start[net.node_count()] as usize, net.arc_count());
    }

    #[test]
    fn middle_node_has_arcs_both_ways() {
        let mut b = walking_builder();
        b.add_rows(path_rows().iter());
        let net = b.build();
        let mid = net.node_for_vertex(11).unwrap();
        let targets: Vec<NodeId> = net.out_arcs(mid).map(|(to, _)| to).collect();
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&net.node_for_vertex(10).unwrap()));
        assert!(targets.contains(&net.node_for_vertex(12).unwrap()));
    }

    #[test]
    fn negative_impedance_closes_one_direction() {
        let mut row = EdgeRow::straight(1, 10, 11, ll(0.0, 0.0), ll(0.0, LAT_100M), 100.0);
        row.rev_cost = -1.0;
        let mut b = walking_builder();
        b.add_row(&row).unwrap();
        let net = b.build();

        let a = net.node_for_vertex(10).unwrap();
        let v = net.node_for_vertex(11).unwrap();
        assert_eq!(net.out_degree(a), 1);
        assert_eq!(net.out_degree(v), 0);
    }

    #[test]
    fn impedance_scales_arc_cost() {
        // 100 m long but 250 impedance metres forward.
        let mut row = EdgeRow::straight(1, 10, 11, ll(0.0, 0.0), ll(0.0, LAT_100M), 100.0);
        row.fwd_cost = 250.0;
        let mut b = NetworkBuilder::new(14, 2.0);
        b.add_row(&row).unwrap();
        let net = b.build();

        let a = net.node_for_vertex(10).unwrap();
        let (_, cost) = net.out_arcs(a).next().unwrap();
        assert!((cost - 125.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_geometry_is_rejected() {
        let row = EdgeRow {
            id: 7,
            source: 1,
            target: 2,
            length_m: 0.0,
            fwd_cost: 0.0,
            rev_cost: 0.0,
            geometry: vec![ll(0.0, 0.0)],
        };
        let mut b = walking_builder();
        match b.add_row(&row) {
            Err(NetworkError::BadGeometry { id: 7, points: 1 }) => {}
            other => panic!("expected BadGeometry, got {other:?}"),
        }
    }

    #[test]
    fn add_rows_skips_bad_rows_and_counts_them() {
        let mut rows = path_rows();
        rows.push(EdgeRow {
            id: 99,
            source: 50,
            target: 51,
            length_m: 1.0,
            fwd_cost: 1.0,
            rev_cost: 1.0,
            geometry: vec![],
        });
        let mut b = walking_builder();
        assert_eq!(b.add_rows(rows.iter()), 1);
        assert_eq!(b.build().node_count(), 3);
    }

    #[test]
    fn empty_builder_builds_empty_network() {
        let net = walking_builder().build();
        assert!(net.is_empty());
        assert_eq!(net.arc_count(), 0);
        assert!(net.nearest_segment(ll(0.0, 0.0).to_pixel(14)).is_none());
    }
}

mod snapping {
    use super::*;

    #[test]
    fn centroid_beside_edge_splits_it() {
        let mut b = walking_builder();
        b.add_rows(path_rows().iter());
        let before_nodes = b.node_count();

        // Centroid next to the midpoint of the first edge.
        let start = b
            .snap_centroid(ll(LAT_100M * 0.1, LAT_100M * 0.5), 300.0)
            .unwrap();
        assert_eq!(start.index(), before_nodes);

        let net = b.build();
        // The split point reaches both original endpoints of edge 1.
        let targets: Vec<NodeId> = net.out_arcs(start).map(|(to, _)| to).collect();
        assert!(targets.contains(&net.node_for_vertex(10).unwrap()));
        assert!(targets.contains(&net.node_for_vertex(11).unwrap()));
    }

    #[test]
    fn split_costs_sum_to_the_original() {
        let mut b = walking_builder();
        b.add_rows(path_rows().iter());
        let start = b
            .snap_centroid(ll(LAT_100M * 0.1, LAT_100M * 0.3), 300.0)
            .unwrap();
        let net = b.build();

        let costs: Vec<f64> = net.out_arcs(start).map(|(_, c)| c).collect();
        assert_eq!(costs.len(), 2);
        let sum: f64 = costs.iter().sum();
        // 100 m at 1 m/s, proportionally apportioned.
        assert!((sum - 100.0).abs() < 0.5, "split cost sum {sum}");
        assert!(costs.iter().all(|&c| c > 0.0 && c < 100.0));
    }

    #[test]
    fn snap_near_endpoint_reuses_the_endpoint_node() {
        let mut b = walking_builder();
        b.add_rows(path_rows().iter());
        let nodes_before = b.node_count();
        let start = b.snap_centroid(ll(0.0, 0.0), 300.0).unwrap();
        assert_eq!(b.node_count(), nodes_before);
        let net = b.build();
        assert_eq!(start, net.node_for_vertex(10).unwrap());
    }

    #[test]
    fn out_of_radius_centroid_is_not_snapped() {
        let mut b = walking_builder();
        b.add_rows(path_rows().iter());
        // ~1 km east of the network, radius 300 m.
        assert!(b.snap_centroid(ll(10.0 * LAT_100M, 0.0), 300.0).is_none());
    }

    #[test]
    fn snap_on_empty_network_is_none() {
        let mut b = walking_builder();
        assert!(b.snap_centroid(ll(0.0, 0.0), 300.0).is_none());
    }

    #[test]
    fn split_retires_the_parent_from_the_index() {
        let mut b = walking_builder();
        b.add_rows(path_rows().iter());
        let split_edge_count = b.edge_count();
        b.snap_centroid(ll(LAT_100M * 0.1, LAT_100M * 0.5), 300.0)
            .unwrap();
        // Parent kept for id stability plus two halves.
        assert_eq!(b.edge_count(), split_edge_count + 2);

        let net = b.build();
        // Querying at the old midpoint must find one of the halves.
        let seg = net
            .nearest_segment(ll(0.0, LAT_100M * 0.5).to_pixel(14))
            .unwrap();
        assert!(seg.edge.index() >= split_edge_count);
    }

    #[test]
    fn second_snap_lands_on_a_split_half() {
        let mut b = walking_builder();
        b.add_rows(path_rows().iter());
        let first = b
            .snap_centroid(ll(LAT_100M * 0.1, LAT_100M * 0.5), 300.0)
            .unwrap();
        let second = b
            .snap_centroid(ll(LAT_100M * 0.1, LAT_100M * 0.25), 300.0)
            .unwrap();
        assert_ne!(first, second);

        let net = b.build();
        // Both artificial nodes are reachable from vertex 10.
        let a = net.node_for_vertex(10).unwrap();
        let targets: Vec<NodeId> = net.out_arcs(a).map(|(to, _)| to).collect();
        assert_eq!(targets.len(), 1);
        assert!(targets[0] == first || targets[0] == second);
    }
}

mod segments {
    use super::*;
    use crate::network::EdgeSegment;
    use reach_core::EdgeId;

    fn seg(a: [f64; 2], b: [f64; 2]) -> EdgeSegment {
        EdgeSegment {
            edge: EdgeId(0),
            a,
            b,
            frac_a: 0.0,
            frac_b: 1.0,
        }
    }

    #[test]
    fn projection_is_clamped_to_the_segment() {
        let s = seg([0.0, 0.0], [10.0, 0.0]);
        assert_eq!(s.project([5.0, 3.0]), (0.5, [5.0, 0.0]));
        assert_eq!(s.project([-4.0, 1.0]).0, 0.0);
        assert_eq!(s.project([40.0, 1.0]).0, 1.0);
    }

    #[test]
    fn zero_length_segment_projects_to_its_anchor() {
        let s = seg([2.0, 2.0], [2.0, 2.0]);
        let (t, p) = s.project([5.0, 2.0]);
        assert_eq!(t, 0.0);
        assert_eq!(p, [2.0, 2.0]);
    }

    #[test]
    fn edge_frac_interpolates_the_fraction_range() {
        let s = EdgeSegment {
            edge: EdgeId(3),
            a: [0.0, 0.0],
            b: [1.0, 0.0],
            frac_a: 0.25,
            frac_b: 0.75,
        };
        assert!((s.edge_frac(0.5) - 0.5).abs() < 1e-12);
    }
}

mod scenario {
    use super::*;

    #[test]
    fn empty_overlay_is_identity() {
        let rows = path_rows();
        let out = ScenarioOverlay::default().apply(rows.clone());
        assert_eq!(out, rows);
    }

    #[test]
    fn deleted_rows_are_dropped() {
        let overlay = ScenarioOverlay {
            deleted_edge_ids: [1].into_iter().collect(),
            edges: vec![],
        };
        let out = overlay.apply(path_rows());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 2);
    }

    #[test]
    fn modified_rows_replace_their_original() {
        let mut replacement = path_rows()[0].clone();
        replacement.fwd_cost = 500.0;
        let overlay = ScenarioOverlay {
            deleted_edge_ids: Default::default(),
            edges: vec![replacement],
        };
        let out = overlay.apply(path_rows());
        assert_eq!(out.len(), 2);
        let row1 = out.iter().find(|r| r.id == 1).unwrap();
        assert_eq!(row1.fwd_cost, 500.0);
    }

    #[test]
    fn new_rows_are_appended() {
        let overlay = ScenarioOverlay {
            deleted_edge_ids: Default::default(),
            edges: vec![EdgeRow::straight(
                42,
                12,
                13,
                ll(0.0, 2.0 * LAT_100M),
                ll(0.0, 3.0 * LAT_100M),
                100.0,
            )],
        };
        let out = overlay.apply(path_rows());
        assert_eq!(out.len(), 3);
        assert!(out.iter().any(|r| r.id == 42));
    }
}

mod radius {
    use super::*;

    #[test]
    fn pixel_radius_tracks_latitude() {
        // The same metric radius spans more pixels at higher latitude.
        let eq = 300.0 / meters_per_pixel(0.0, 14);
        let north = 300.0 / meters_per_pixel(60.0, 14);
        assert!(north > eq * 1.9 && north < eq * 2.1);
    }
}
