use reach_core::geo::{LonLat, PixelBounds};
use reach_core::NodeId;
use reach_network::{EdgeRow, NetworkBuilder, RoutingNetwork};

use crate::engine::shortest_costs;
use crate::raster::{rasterize, UNREACHED};
use crate::RoutingError;

const LAT_100M: f64 = 100.0 / 111_195.0;

fn ll(lon: f64, lat: f64) -> LonLat {
    LonLat { lon, lat }
}

/// a(10) --100m-- b(11) --100m-- c(12) --100m-- d(13), 1 m/s.
fn chain() -> RoutingNetwork {
    let mut b = NetworkBuilder::new(14, 1.0);
    for i in 0..3i64 {
        b.add_row(&EdgeRow::straight(
            i + 1,
            10 + i,
            11 + i,
            ll(0.0, i as f64 * LAT_100M),
            ll(0.0, (i + 1) as f64 * LAT_100M),
            100.0,
        ))
        .unwrap();
    }
    b.build()
}

fn node(net: &RoutingNetwork, ext: i64) -> NodeId {
    net.node_for_vertex(ext).unwrap()
}

mod engine {
    use super::*;

    #[test]
    fn costs_accumulate_along_the_chain() {
        let net = chain();
        let field = shortest_costs(&net, &[node(&net, 10)], 1000.0).unwrap();
        assert_eq!(field.get(node(&net, 10)), Some(0.0));
        assert_eq!(field.get(node(&net, 11)), Some(100.0));
        assert_eq!(field.get(node(&net, 12)), Some(200.0));
        assert_eq!(field.get(node(&net, 13)), Some(300.0));
        assert_eq!(field.reached(), 4);
    }

    #[test]
    fn nodes_beyond_the_cutoff_are_absent() {
        let net = chain();
        let field = shortest_costs(&net, &[node(&net, 10)], 150.0).unwrap();
        assert!(field.get(node(&net, 11)).is_some());
        assert!(field.get(node(&net, 12)).is_none());
        assert!(field.get(node(&net, 13)).is_none());
        assert_eq!(field.reached(), 2);
    }

    #[test]
    fn cost_exactly_at_the_cutoff_is_kept() {
        let net = chain();
        let field = shortest_costs(&net, &[node(&net, 10)], 200.0).unwrap();
        assert_eq!(field.get(node(&net, 12)), Some(200.0));
        assert!(field.get(node(&net, 13)).is_none());
    }

    #[test]
    fn multi_source_takes_the_cheaper_side() {
        let net = chain();
        let sources = [node(&net, 10), node(&net, 13)];
        let field = shortest_costs(&net, &sources, 1000.0).unwrap();
        // Middle nodes are 100 s from their nearer end.
        assert_eq!(field.get(node(&net, 11)), Some(100.0));
        assert_eq!(field.get(node(&net, 12)), Some(100.0));
    }

    #[test]
    fn source_order_does_not_change_costs() {
        let net = chain();
        let a = node(&net, 10);
        let d = node(&net, 13);
        let fwd = shortest_costs(&net, &[a, d], 1000.0).unwrap();
        let rev = shortest_costs(&net, &[d, a], 1000.0).unwrap();
        for ext in 10..=13 {
            let n = node(&net, ext);
            assert_eq!(fwd.get(n), rev.get(n));
        }
    }

    #[test]
    fn duplicate_sources_are_harmless() {
        let net = chain();
        let a = node(&net, 10);
        let field = shortest_costs(&net, &[a, a, a], 1000.0).unwrap();
        assert_eq!(field.reached(), 4);
    }

    #[test]
    fn no_sources_is_an_error() {
        let net = chain();
        match shortest_costs(&net, &[], 100.0) {
            Err(RoutingError::NoSources) => {}
            other => panic!("expected NoSources, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn one_way_edges_block_the_reverse_direction() {
        let mut b = NetworkBuilder::new(14, 1.0);
        let mut row = EdgeRow::straight(1, 10, 11, ll(0.0, 0.0), ll(0.0, LAT_100M), 100.0);
        row.rev_cost = -1.0;
        b.add_row(&row).unwrap();
        let net = b.build();

        let from_b = shortest_costs(&net, &[node(&net, 11)], 1000.0).unwrap();
        assert!(from_b.get(node(&net, 10)).is_none());

        let from_a = shortest_costs(&net, &[node(&net, 10)], 1000.0).unwrap();
        assert_eq!(from_a.get(node(&net, 11)), Some(100.0));
    }

    #[test]
    fn disconnected_component_stays_unreached() {
        let mut b = NetworkBuilder::new(14, 1.0);
        b.add_row(&EdgeRow::straight(1, 10, 11, ll(0.0, 0.0), ll(0.0, LAT_100M), 100.0))
            .unwrap();
        b.add_row(&EdgeRow::straight(2, 20, 21, ll(1.0, 0.0), ll(1.0, LAT_100M), 100.0))
            .unwrap();
        let net = b.build();
        let field = shortest_costs(&net, &[node(&net, 10)], 10_000.0).unwrap();
        assert!(field.get(node(&net, 20)).is_none());
        assert!(field.get(node(&net, 21)).is_none());
    }
}

mod raster {
    use super::*;

    fn extent_around(half: i64) -> PixelBounds {
        let p = ll(0.0, LAT_100M * 1.5).to_pixel(14);
        let (cx, cy) = p.cell();
        PixelBounds {
            west:  cx - half,
            north: cy - half,
            east:  cx + half,
            south: cy + half,
        }
    }

    #[test]
    fn raster_has_the_requested_shape() {
        let net = chain();
        let field = shortest_costs(&net, &[node(&net, 10)], 1200.0).unwrap();
        let r = rasterize(&net, &field, extent_around(4)).unwrap();
        assert_eq!(r.width, 9);
        assert_eq!(r.height, 9);
        assert_eq!(r.minutes.len(), 81);
        assert_eq!(r.zoom, 14);
    }

    #[test]
    fn pixels_near_the_source_carry_small_minutes() {
        let net = chain();
        let start = node(&net, 10);
        let field = shortest_costs(&net, &[start], 1200.0).unwrap();

        let p = ll(0.0, 0.0).to_pixel(14);
        let (x, y) = p.cell();
        let r = rasterize(
            &net,
            &field,
            PixelBounds { west: x, north: y, east: x, south: y },
        )
        .unwrap();
        // 1-pixel raster at the source itself: at most a minute or two.
        assert!(r.minutes[0] <= 2, "got {}", r.minutes[0]);
    }

    #[test]
    fn pixels_beyond_the_cutoff_are_sentinel() {
        let net = chain();
        // 60 s cutoff on a 300 s chain: the far end must be unreachable.
        let field = shortest_costs(&net, &[node(&net, 10)], 60.0).unwrap();

        let p = ll(0.0, LAT_100M * 3.0).to_pixel(14);
        let (x, y) = p.cell();
        let r = rasterize(
            &net,
            &field,
            PixelBounds { west: x, north: y, east: x, south: y },
        )
        .unwrap();
        assert_eq!(r.minutes[0], UNREACHED);
    }

    #[test]
    fn rasterizing_twice_is_identical() {
        let net = chain();
        let field = shortest_costs(&net, &[node(&net, 10)], 600.0).unwrap();
        let extent = extent_around(6);
        let a = rasterize(&net, &field, extent).unwrap();
        let b = rasterize(&net, &field, extent).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_extent_is_an_error() {
        let net = chain();
        let field = shortest_costs(&net, &[node(&net, 10)], 600.0).unwrap();
        let extent = PixelBounds { west: 10, north: 10, east: 9, south: 20 };
        match rasterize(&net, &field, extent) {
            Err(RoutingError::EmptyExtent { .. }) => {}
            other => panic!("expected EmptyExtent, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn addressing_is_row_major_with_inclusive_bounds() {
        let net = chain();
        let field = shortest_costs(&net, &[node(&net, 10)], 1200.0).unwrap();
        let extent = extent_around(2);
        let r = rasterize(&net, &field, extent).unwrap();

        assert!(r.contains(r.west, r.north));
        assert!(r.contains(r.west + r.width as i64 - 1, r.north + r.height as i64 - 1));
        assert!(!r.contains(r.west - 1, r.north));
        assert!(!r.contains(r.west + r.width as i64, r.north));

        // at() agrees with direct indexing.
        let x = r.west + 1;
        let y = r.north + 2;
        let idx = (y - r.north) as usize * r.width + (x - r.west) as usize;
        let direct = r.minutes[idx];
        match r.at(x, y) {
            Some(m) => assert_eq!(m, direct),
            None => assert_eq!(direct, UNREACHED),
        }
    }

    #[test]
    fn snapped_centroid_seeds_the_raster_center() {
        let mut b = NetworkBuilder::new(14, 1.0);
        for i in 0..3i64 {
            b.add_row(&EdgeRow::straight(
                i + 1,
                10 + i,
                11 + i,
                ll(0.0, i as f64 * LAT_100M),
                ll(0.0, (i + 1) as f64 * LAT_100M),
                100.0,
            ))
            .unwrap();
        }
        let centroid = ll(LAT_100M * 0.05, LAT_100M * 1.5);
        let start = b.snap_centroid(centroid, 300.0).unwrap();
        let net = b.build();

        let field = shortest_costs(&net, &[start], 1200.0).unwrap();
        let p = centroid.to_pixel(14);
        let (x, y) = p.cell();
        let r = rasterize(
            &net,
            &field,
            PixelBounds { west: x, north: y, east: x, south: y },
        )
        .unwrap();
        assert!(r.minutes[0] <= 1, "centroid pixel minutes {}", r.minutes[0]);
    }
}
