use reach_core::{RoutingProfile, TravelMode};

use crate::codec::{decode, encode, GridBinaryPayload, GRID_MAGIC};
use crate::error::FormatError;
use crate::store::{
    get_bundle, put_bundle, CacheKey, FsMatrixStore, MatrixStore, MemoryMatrixStore, Namespace,
};
use crate::types::{OpportunityMatrix, TravelTimeMatrix};

fn tt_key(cell: u64) -> CacheKey {
    CacheKey::new(
        Namespace::TravelTime,
        TravelMode::Walking,
        RoutingProfile::Standard,
        cell,
    )
}

fn sample_matrix() -> TravelTimeMatrix {
    let mut m = TravelTimeMatrix::new(12);
    m.push_row(0x8a1f_0001, 100, 200, 3, 2, vec![1, 2, 3, 4, 255, 6]);
    m.push_row(0x8a1f_0002, 90, 190, 2, 2, vec![7, 8, 9, 10]);
    m
}

mod rows {
    use super::*;

    #[test]
    fn parallel_arrays_stay_aligned() {
        let m = sample_matrix();
        assert_eq!(m.len(), 2);
        let r = m.row(1);
        assert_eq!(r.grid_id, 0x8a1f_0002);
        assert_eq!(r.width, 2);
        assert_eq!(r.travel_times, &[7, 8, 9, 10]);
    }

    #[test]
    fn boundary_pixels_are_contained_inclusively() {
        let m = sample_matrix();
        let r = m.row(0);
        // Northwest corner pixel.
        assert!(r.contains(100, 200));
        // Southeast corner pixel (west + width - 1, north + height - 1).
        assert!(r.contains(102, 201));
        assert!(!r.contains(99, 200));
        assert!(!r.contains(103, 200));
        assert!(!r.contains(100, 202));
    }

    #[test]
    fn time_at_uses_row_major_addressing() {
        let m = sample_matrix();
        let r = m.row(0);
        assert_eq!(r.time_at(100, 200), Some(1));
        assert_eq!(r.time_at(102, 200), Some(3));
        assert_eq!(r.time_at(100, 201), Some(4));
        // Sentinel pixel reads as None.
        assert_eq!(r.time_at(101, 201), None);
        // Outside.
        assert_eq!(r.time_at(200, 200), None);
    }
}

mod opportunity {
    use super::*;

    #[test]
    fn contiguous_categories_share_a_bucket() {
        let mut m = OpportunityMatrix::default();
        m.push_point("cafe", 3, 1, "a".into(), "u1".into());
        m.push_point("cafe", 5, 2, "b".into(), "u2".into());
        m.push_point("school", 7, 3, "c".into(), "u3".into());
        assert_eq!(m.categories, vec!["cafe", "school"]);
        assert_eq!(m.travel_times[0], vec![3, 5]);
        assert_eq!(m.uids[1], vec!["u3"]);
    }

    #[test]
    fn unsorted_input_fragments_buckets() {
        // Documented contiguous-run semantics: interleaved labels open a
        // fresh bucket per run.
        let mut m = OpportunityMatrix::default();
        m.push_point("cafe", 1, 1, "a".into(), "u1".into());
        m.push_point("school", 2, 2, "b".into(), "u2".into());
        m.push_point("cafe", 3, 3, "c".into(), "u3".into());
        assert_eq!(m.categories, vec!["cafe", "school", "cafe"]);
    }
}

mod codec {
    use super::*;

    fn payload() -> GridBinaryPayload {
        GridBinaryPayload {
            zoom: 12,
            west: 1024,
            north: 2048,
            width: 3,
            height: 2,
            depth: 2,
            values: vec![vec![5, 8, 8, 10, 9, 9], vec![0, -3, 4, 4, 4, 100]],
            metadata: serde_json::json!({"accessibility": "walking_standard"}),
        }
    }

    #[test]
    fn decode_prefix_sums_the_documented_example() {
        // magic, version 0, zoom 12, west 0, north 0, 2x1x1, deltas [5, 3].
        let mut bytes = Vec::new();
        bytes.extend_from_slice(GRID_MAGIC);
        for v in [0i32, 12, 0, 0, 2, 1, 1, 5, 3] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let p = decode(&bytes).unwrap();
        assert_eq!(p.values, vec![vec![5, 8]]);
        assert_eq!(p.width, 2);
        assert_eq!(p.metadata, serde_json::json!({}));
    }

    #[test]
    fn encode_then_decode_is_identity() {
        let p = payload();
        let decoded = decode(&encode(&p).unwrap()).unwrap();
        assert_eq!(decoded, p);
    }

    #[test]
    fn decode_then_encode_is_byte_identical() {
        let bytes = encode(&payload()).unwrap();
        let again = encode(&decode(&bytes).unwrap()).unwrap();
        assert_eq!(again, bytes);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = encode(&payload()).unwrap();
        bytes[0] = b'X';
        assert!(matches!(decode(&bytes), Err(FormatError::BadMagic)));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut bytes = encode(&payload()).unwrap();
        bytes[8..12].copy_from_slice(&7i32.to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(FormatError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn truncated_body_is_rejected() {
        let bytes = encode(&payload()).unwrap();
        let cut = &bytes[..40];
        assert!(matches!(decode(cut), Err(FormatError::Truncated { .. })));
    }

    #[test]
    fn short_header_is_rejected() {
        assert!(matches!(
            decode(b"ACCESSGR"),
            Err(FormatError::Truncated { .. })
        ));
    }

    #[test]
    fn mismatched_slice_length_fails_encode() {
        let mut p = payload();
        p.values[1].pop();
        assert!(matches!(encode(&p), Err(FormatError::BadDimensions(_))));
    }

    #[test]
    fn negative_values_round_trip() {
        let p = GridBinaryPayload {
            zoom: 9,
            west: -5,
            north: -7,
            width: 2,
            height: 2,
            depth: 1,
            values: vec![vec![i32::MAX, -1, 0, i32::MIN]],
            metadata: serde_json::json!({}),
        };
        assert_eq!(decode(&encode(&p).unwrap()).unwrap(), p);
    }
}

mod store {
    use super::*;

    #[test]
    fn fs_roundtrip_and_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsMatrixStore::new(dir.path());
        let key = tt_key(0x8a1f);

        put_bundle(&store, &key, &sample_matrix()).unwrap();
        assert!(dir
            .path()
            .join("traveltime/walking/standard/8a1f.bin")
            .is_file());

        let back: TravelTimeMatrix = get_bundle(&store, &key).unwrap().unwrap();
        assert_eq!(back, sample_matrix());
    }

    #[test]
    fn missing_key_is_none_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsMatrixStore::new(dir.path());
        let got: Option<TravelTimeMatrix> = get_bundle(&store, &tt_key(42)).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn overwrite_replaces_the_whole_bundle() {
        let store = MemoryMatrixStore::new();
        let key = tt_key(1);
        put_bundle(&store, &key, &sample_matrix()).unwrap();

        let mut smaller = TravelTimeMatrix::new(12);
        smaller.push_row(9, 0, 0, 1, 1, vec![4]);
        put_bundle(&store, &key, &smaller).unwrap();

        let back: TravelTimeMatrix = get_bundle(&store, &key).unwrap().unwrap();
        assert_eq!(back, smaller);
    }

    #[test]
    fn namespaces_do_not_collide() {
        let store = MemoryMatrixStore::new();
        let tt = tt_key(1);
        let opp = CacheKey::new(
            Namespace::Opportunity,
            TravelMode::Walking,
            RoutingProfile::Standard,
            1,
        );
        put_bundle(&store, &tt, &sample_matrix()).unwrap();
        let got: Option<OpportunityMatrix> = get_bundle(&store, &opp).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn concurrent_writers_to_disjoint_keys_do_not_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsMatrixStore::new(dir.path());

        std::thread::scope(|s| {
            for cell in 0u64..8 {
                let store = &store;
                s.spawn(move || {
                    let mut m = TravelTimeMatrix::new(12);
                    m.push_row(cell, cell as i64, 0, 1, 1, vec![cell as u8]);
                    for _ in 0..20 {
                        put_bundle(store, &tt_key(cell), &m).unwrap();
                    }
                });
            }
        });

        for cell in 0u64..8 {
            let back: TravelTimeMatrix = get_bundle(&store, &tt_key(cell)).unwrap().unwrap();
            assert_eq!(back.grid_ids, vec![cell]);
            assert_eq!(back.travel_times[0], vec![cell as u8]);
        }
    }
}
