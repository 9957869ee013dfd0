//! Derived-matrix entry points: aggregate, then cache the result.
//!
//! Derived matrices are caches of caches — always recomputable from the
//! travel-time bundles plus source data, so a recompute simply replaces
//! whatever was stored before.

use h3o::CellIndex;
use rayon::prelude::*;

use reach_aggregate::{compute_connectivity, compute_opportunities, PointSource};
use reach_core::RunSettings;
use reach_grid::StudyAreaGrid;
use reach_matrix::{
    put_bundle, CacheKey, ConnectivityMatrix, MatrixStore, Namespace, OpportunityMatrix,
};

use crate::error::PipelineResult;
use crate::run::{collect_report, RunReport};

/// Compute and cache the opportunity matrix for one bulk cell.
pub fn compute_opportunity_matrix(
    store: &dyn MatrixStore,
    bulk: CellIndex,
    points: &dyn PointSource,
    settings: &RunSettings,
) -> PipelineResult<OpportunityMatrix> {
    settings.validate()?;
    let matrix = compute_opportunities(store, bulk, points, settings)?;
    let key = CacheKey::new(
        Namespace::Opportunity,
        settings.mode,
        settings.profile,
        u64::from(bulk),
    );
    put_bundle(store, &key, &matrix)?;
    Ok(matrix)
}

/// Compute and cache an [`OpportunityMatrix`] for every bulk cell of
/// `grid`, with the same per-cell failure isolation as the travel-time
/// run.  `rows_written` counts aggregated points across all cells.
pub fn compute_opportunity_matrices(
    store: &dyn MatrixStore,
    grid: &StudyAreaGrid,
    points: &dyn PointSource,
    settings: &RunSettings,
) -> PipelineResult<RunReport> {
    settings.validate()?;
    grid.config.validate()?;

    let outcomes: Vec<Result<usize, ()>> = grid
        .bulk_cells()
        .par_iter()
        .map(|&bulk| {
            compute_opportunity_matrix(store, bulk, points, settings)
                .map(|m| m.uids.iter().map(Vec::len).sum())
                .map_err(|e| log::error!("opportunity pass: bulk cell {bulk} failed: {e}"))
        })
        .collect();

    let report = collect_report(grid.len(), outcomes);
    log::info!(
        "opportunity pass done: {}/{} cells, {} points ({}/{})",
        report.cells_computed,
        report.cells_total,
        report.rows_written,
        settings.mode,
        settings.profile
    );
    Ok(report)
}

/// Compute and cache a [`ConnectivityMatrix`] for every bulk cell of
/// `grid`.  Cells with no cached travel-time bundle produce an empty
/// matrix rather than failing.  `rows_written` counts matrix rows.
pub fn compute_connectivity_matrices(
    store: &dyn MatrixStore,
    grid: &StudyAreaGrid,
    settings: &RunSettings,
) -> PipelineResult<RunReport> {
    settings.validate()?;
    grid.config.validate()?;

    let outcomes: Vec<Result<usize, ()>> = grid
        .bulk_cells()
        .par_iter()
        .map(|&bulk| {
            compute_connectivity_matrix(store, bulk, settings)
                .map(|m| m.len())
                .map_err(|e| log::error!("connectivity pass: bulk cell {bulk} failed: {e}"))
        })
        .collect();

    let report = collect_report(grid.len(), outcomes);
    log::info!(
        "connectivity pass done: {}/{} cells, {} rows ({}/{})",
        report.cells_computed,
        report.cells_total,
        report.rows_written,
        settings.mode,
        settings.profile
    );
    Ok(report)
}

/// Compute and cache the connectivity matrix for one cell.
pub fn compute_connectivity_matrix(
    store: &dyn MatrixStore,
    cell: CellIndex,
    settings: &RunSettings,
) -> PipelineResult<ConnectivityMatrix> {
    settings.validate()?;
    let matrix = compute_connectivity(store, cell, settings)?;
    let key = CacheKey::new(
        Namespace::Connectivity,
        settings.mode,
        settings.profile,
        u64::from(cell),
    );
    put_bundle(store, &key, &matrix)?;
    Ok(matrix)
}
