//! Error types for reach-network.

use thiserror::Error;

/// Errors raised while reading edge rows or building the routing graph.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// An edge row with fewer than two geometry points cannot form a
    /// segment.  Recoverable: callers skip the row and continue.
    #[error("edge {id} has a degenerate geometry ({points} points)")]
    BadGeometry { id: i64, points: usize },

    /// The external network source failed.  Recoverable at the bulk-cell
    /// level: the cell is skipped, siblings continue.
    #[error("network source error: {0}")]
    Source(String),
}

/// Alias for `Result<T, NetworkError>`.
pub type NetworkResult<T> = Result<T, NetworkError>;
