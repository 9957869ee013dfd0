//! Connectivity aggregation: reachable-area estimates per travel-time
//! bucket.

use h3o::CellIndex;

use reach_core::RunSettings;
use reach_matrix::{
    get_bundle, CacheKey, ConnectivityMatrix, MatrixStore, Namespace, TravelTimeMatrix,
};

use crate::error::AggregateResult;

/// Count reachable pixels per travel-time bucket for every raster row of
/// `cell`'s cached travel-time bundle.
///
/// Bucket `t` counts pixels whose value is exactly `t` minutes, for
/// `t in 1..=max_travel_min` — raw per-bucket counts; callers wanting the
/// cumulative "area within t" accumulate them.  A cell with no cached
/// bundle yields an empty matrix with a warning.
pub fn compute_connectivity(
    store: &dyn MatrixStore,
    cell: CellIndex,
    settings: &RunSettings,
) -> AggregateResult<ConnectivityMatrix> {
    let key = CacheKey::new(
        Namespace::TravelTime,
        settings.mode,
        settings.profile,
        u64::from(cell),
    );

    let mut matrix = ConnectivityMatrix::default();
    let Some(bundle) = get_bundle::<TravelTimeMatrix>(store, &key)? else {
        log::warn!(
            "no travel-time bundle for cell {cell} ({}/{}), connectivity empty",
            settings.mode,
            settings.profile
        );
        return Ok(matrix);
    };

    let buckets = settings.max_travel_min as usize;
    for row in bundle.rows() {
        let mut areas = vec![0u32; buckets];
        for &minutes in row.travel_times {
            let m = minutes as usize;
            if (1..=buckets).contains(&m) {
                areas[m - 1] += 1;
            }
        }
        matrix.push(row.grid_id, areas);
    }
    Ok(matrix)
}
