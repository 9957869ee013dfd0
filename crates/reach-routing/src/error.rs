//! Error types for reach-routing.

use thiserror::Error;

/// Errors raised by the shortest-path engine and the rasterizer.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// A shortest-path run was requested with no start nodes.  Happens when
    /// none of a calculation cell's centroids snapped to the network; the
    /// cell is skipped, not zero-filled.
    #[error("shortest-path run has no start nodes")]
    NoSources,

    /// A raster extent with zero pixels cannot be rasterized.
    #[error("empty raster extent ({width}x{height})")]
    EmptyExtent { width: usize, height: usize },
}

/// Alias for `Result<T, RoutingError>`.
pub type RoutingResult<T> = Result<T, RoutingError>;
