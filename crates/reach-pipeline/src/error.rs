//! Error types for reach-pipeline.
//!
//! Only configuration and storage problems abort a call.  Everything a
//! single bulk cell can hit (missing network data, a failed source read)
//! is isolated to that cell: logged, counted in the run report, and never
//! allowed to disturb sibling cells.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] reach_core::CoreError),

    #[error(transparent)]
    Grid(#[from] reach_grid::GridError),

    #[error(transparent)]
    Network(#[from] reach_network::NetworkError),

    #[error(transparent)]
    Routing(#[from] reach_routing::RoutingError),

    #[error(transparent)]
    Storage(#[from] reach_matrix::StorageError),

    #[error(transparent)]
    Aggregate(#[from] reach_aggregate::AggregateError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
