//! Opportunity aggregation: which points of interest are reachable from a
//! bulk cell, bucketed by category.

use h3o::{CellIndex, LatLng};

use reach_core::geo::pixel_to_lonlat;
use reach_core::RunSettings;
use reach_matrix::{MatrixStore, OpportunityMatrix, TravelTimeMatrix};

use crate::error::AggregateResult;
use crate::neighborhood::{cells_bounds, load_neighborhood, neighborhood};
use crate::points::{PoiPoint, PointSource};

/// Join `bulk_cell`'s own points of interest against every cached
/// travel-time raster in its neighborhood.
///
/// Candidate points are restricted to the bulk cell's hexagon — the
/// neighborhood governs only which rasters can reach them, so a point never
/// lands in more than one cell's matrix.  A point is kept when some raster
/// row contains its pixel and reaches it within the cutoff; the row with
/// the smallest travel time wins when several overlap.  Points are sorted
/// by `(category, uid)` before bucketing, which keeps the contiguous
/// category buckets whole and makes the output order reproducible.
pub fn compute_opportunities(
    store: &dyn MatrixStore,
    bulk_cell: CellIndex,
    points: &dyn PointSource,
    settings: &RunSettings,
) -> AggregateResult<OpportunityMatrix> {
    let cells = neighborhood(bulk_cell, settings);
    let bundles = load_neighborhood(store, &cells, settings)?;

    let mut matrix = OpportunityMatrix::default();
    let Some(bounds) = cells_bounds(std::slice::from_ref(&bulk_cell)) else {
        return Ok(matrix);
    };

    let mut candidates = points.points_in(bounds, settings.zoom)?;
    candidates.retain(|p| in_cell(p, bulk_cell, settings.zoom));
    candidates.sort_by(|a, b| (&a.category, &a.uid).cmp(&(&b.category, &b.uid)));

    for point in &candidates {
        if let Some((minutes, grid_id)) = best_reach(&bundles, point, settings.max_travel_min) {
            matrix.push_point(
                &point.category,
                minutes,
                grid_id,
                point.name.clone(),
                point.uid.clone(),
            );
        }
    }
    Ok(matrix)
}

/// `true` if the point's pixel center falls inside `cell`'s hexagon.  The
/// bounding-box source query over-fetches near the hexagon corners; this
/// is the exact membership test.
fn in_cell(point: &PoiPoint, cell: CellIndex, zoom: u8) -> bool {
    let ll = pixel_to_lonlat(point.x as f64 + 0.5, point.y as f64 + 0.5, zoom);
    LatLng::new(ll.lat, ll.lon).is_ok_and(|c| c.to_cell(cell.resolution()) == cell)
}

/// Smallest travel time to `point` across all rows whose raster contains
/// its pixel, together with the winning row's grid id.  `None` when no row
/// reaches the point within `max_min`.
fn best_reach(
    bundles: &[TravelTimeMatrix],
    point: &PoiPoint,
    max_min: u32,
) -> Option<(u8, u64)> {
    let mut best: Option<(u8, u64)> = None;
    for bundle in bundles {
        for row in bundle.rows() {
            if let Some(minutes) = row.time_at(point.x, point.y) {
                if minutes as u32 <= max_min
                    && best.is_none_or(|(b, _)| minutes < b)
                {
                    best = Some((minutes, row.grid_id));
                }
            }
        }
    }
    best
}
