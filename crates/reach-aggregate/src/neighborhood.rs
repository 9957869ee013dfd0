//! Neighborhood selection and cached-bundle loading shared by both
//! aggregators.

use h3o::CellIndex;

use reach_core::geo::GeoBounds;
use reach_core::{LonLat, RunSettings};
use reach_grid::hex_edge_length_m;
use reach_matrix::{get_bundle, CacheKey, MatrixStore, Namespace, TravelTimeMatrix};

use crate::error::AggregateResult;

/// Cells whose travel-time bundles can reach into `cell`: a k-ring where
/// `k = ceil(max_travel_distance / hex_edge_length)`.
///
/// Travel distance is `speed * cutoff`; dividing by the cell's own edge
/// length adapts `k` to the resolution in play.
pub fn neighborhood(cell: CellIndex, settings: &RunSettings) -> Vec<CellIndex> {
    let edge_m = hex_edge_length_m(cell);
    let k = (settings.max_travel_m() / edge_m).ceil() as u32;
    cell.grid_disk::<Vec<_>>(k)
}

/// Load the travel-time bundle of every neighborhood cell, skipping cells
/// never computed.  Lazily-computed caches make gaps normal, so a gap is a
/// warning, not a failure.
pub fn load_neighborhood(
    store: &dyn MatrixStore,
    cells: &[CellIndex],
    settings: &RunSettings,
) -> AggregateResult<Vec<TravelTimeMatrix>> {
    let mut bundles = Vec::with_capacity(cells.len());
    for &cell in cells {
        let key = CacheKey::new(
            Namespace::TravelTime,
            settings.mode,
            settings.profile,
            u64::from(cell),
        );
        match get_bundle::<TravelTimeMatrix>(store, &key)? {
            Some(bundle) => bundles.push(bundle),
            None => log::warn!(
                "no travel-time bundle for cell {cell} ({}/{})",
                settings.mode,
                settings.profile
            ),
        }
    }
    Ok(bundles)
}

/// Geographic bounds enclosing the boundaries of every cell, for filtering
/// the point source.  `None` for an empty cell list.
pub fn cells_bounds(cells: &[CellIndex]) -> Option<GeoBounds> {
    GeoBounds::around(cells.iter().flat_map(|cell| {
        cell.boundary()
            .iter()
            .map(|v| LonLat::new(v.lng(), v.lat()))
            .collect::<Vec<_>>()
    }))
}
