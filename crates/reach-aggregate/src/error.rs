//! Error types for reach-aggregate.

use thiserror::Error;

/// Errors raised while aggregating cached matrices.
///
/// Missing neighbor bundles are *not* errors; they are skipped with a
/// warning per the cache contract.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// The cache itself failed (I/O, corrupt bundle).
    #[error(transparent)]
    Storage(#[from] reach_matrix::StorageError),

    /// The external point source failed.
    #[error("point source error: {0}")]
    Source(String),
}

pub type AggregateResult<T> = Result<T, AggregateError>;
