//! The travel-time computation run: per-bulk-cell fan-out, network
//! construction, shortest paths, rasterization, and cache writes.
//!
//! # Parallelism
//!
//! Bulk cells are independent at this stage, so the fan-out is a Rayon
//! parallel map with no shared mutable state: each worker builds its own
//! network slice and writes its own cache key.  The cache's atomic replace
//! makes concurrent writers to different keys safe.
//!
//! # Failure isolation
//!
//! A failing cell is logged and counted, never propagated — siblings keep
//! running.  Only an invalid [`RunSettings`] aborts the whole call, before
//! any work starts.

use h3o::CellIndex;
use rayon::prelude::*;

use reach_core::geo::GeoBounds;
use reach_core::{NodeId, RunSettings};
use reach_grid::{centroid, raster_extent, StudyAreaGrid};
use reach_matrix::{put_bundle, CacheKey, MatrixStore, Namespace, TravelTimeMatrix};
use reach_network::{EdgeSource, NetworkBuilder, ScenarioOverlay};
use reach_routing::{rasterize, shortest_costs};

use crate::error::PipelineResult;

// ── RunReport ─────────────────────────────────────────────────────────────────

/// Outcome summary of one travel-time run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub cells_total: usize,
    pub cells_computed: usize,
    /// Cells that failed and were skipped; their keys keep any prior bundle.
    pub cells_failed: usize,
    /// Matrix rows written across all computed cells.
    pub rows_written: usize,
}

/// Fold per-cell outcomes into a [`RunReport`].  Shared by the travel-time
/// run and the derived-matrix passes.
pub(crate) fn collect_report(cells_total: usize, outcomes: Vec<Result<usize, ()>>) -> RunReport {
    let mut report = RunReport {
        cells_total,
        ..RunReport::default()
    };
    for outcome in outcomes {
        match outcome {
            Ok(rows) => {
                report.cells_computed += 1;
                report.rows_written += rows;
            }
            Err(()) => report.cells_failed += 1,
        }
    }
    report
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Compute and cache a [`TravelTimeMatrix`] for every bulk cell of `grid`.
///
/// Validates `settings` up front (nothing is computed on failure), then
/// fans out per bulk cell.
pub fn compute_travel_time_matrices(
    store: &dyn MatrixStore,
    grid: &StudyAreaGrid,
    edges: &dyn EdgeSource,
    overlay: &ScenarioOverlay,
    settings: &RunSettings,
) -> PipelineResult<RunReport> {
    settings.validate()?;
    grid.config.validate()?;

    let outcomes: Vec<Result<usize, ()>> = grid
        .bulk_cells()
        .par_iter()
        .map(|&bulk| {
            compute_bulk_cell(store, grid, edges, overlay, settings, bulk).map_err(|e| {
                log::error!("bulk cell {bulk} failed: {e}");
            })
        })
        .collect();

    let report = collect_report(grid.len(), outcomes);
    log::info!(
        "travel-time run done: {}/{} cells, {} rows ({}/{})",
        report.cells_computed,
        report.cells_total,
        report.rows_written,
        settings.mode,
        settings.profile
    );
    Ok(report)
}

// ── Per-cell computation ──────────────────────────────────────────────────────

/// Compute one bulk cell's bundle and replace it in the cache.  Returns the
/// number of matrix rows written.
pub fn compute_bulk_cell(
    store: &dyn MatrixStore,
    grid: &StudyAreaGrid,
    edges: &dyn EdgeSource,
    overlay: &ScenarioOverlay,
    settings: &RunSettings,
    bulk: CellIndex,
) -> PipelineResult<usize> {
    let children = grid.calc_children(bulk);
    let Some(bounds) = GeoBounds::around(children.iter().map(|&c| centroid(c))) else {
        return Ok(0);
    };
    // The slice must hold everything reachable from any child, plus snap
    // slack at the rim.
    let bounds = bounds.buffered_m(settings.max_travel_m() + settings.snap_radius_m);

    let rows = overlay.apply(edges.edges_in(bounds)?);
    let mut builder = NetworkBuilder::new(settings.zoom, settings.speed_m_s());
    let bad_rows = builder.add_rows(rows.iter());
    if bad_rows > 0 {
        log::debug!("bulk cell {bulk}: skipped {bad_rows} unusable edge rows");
    }

    // Snap every child centroid before freezing the graph; children with no
    // edge in range get no matrix row.
    let starts: Vec<Option<NodeId>> = children
        .iter()
        .map(|&child| builder.snap_centroid(centroid(child), settings.snap_radius_m))
        .collect();
    let network = builder.build();

    let mut matrix = TravelTimeMatrix::new(settings.zoom);
    for (&child, start) in children.iter().zip(starts) {
        let Some(start) = start else { continue };

        let field = shortest_costs(&network, &[start], settings.cutoff_s())?;
        let raster = rasterize(&network, &field, raster_extent(child, settings.zoom))?;
        matrix.push_row(
            u64::from(child),
            raster.west,
            raster.north,
            raster.width as u32,
            raster.height as u32,
            raster.minutes,
        );
    }

    let key = CacheKey::new(
        Namespace::TravelTime,
        settings.mode,
        settings.profile,
        u64::from(bulk),
    );
    put_bundle(store, &key, &matrix)?;
    Ok(matrix.len())
}
