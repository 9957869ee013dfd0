//! Error types for reach-grid.

use thiserror::Error;

/// Errors raised while building or persisting a study-area grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// Bad resolution pair or other configuration problem.  Fails fast;
    /// nothing is computed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The study-area geometry contains no usable polygon.
    #[error("study area polygon is empty")]
    EmptyStudyArea,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("grid codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Alias for `Result<T, GridError>`.
pub type GridResult<T> = Result<T, GridError>;
