//! Error taxonomy for reach-matrix.
//!
//! Two distinct failure families live here.  [`FormatError`] covers the
//! binary grid exchange codec: it fails the single decode/encode call that
//! raised it and nothing else.  [`StorageError`] covers the cache: a failed
//! `put` never leaves a partial bundle visible (writes are staged and
//! atomically renamed).  A missing key is *not* an error — `get` returns
//! `Ok(None)` and callers skip.

use thiserror::Error;

/// Malformed or unsupported binary grid payload.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("bad magic (expected \"ACCESSGR\")")]
    BadMagic,

    #[error("unsupported grid version {0}")]
    UnsupportedVersion(i32),

    #[error("payload truncated: need {expected} bytes, have {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("inconsistent grid dimensions: {0}")]
    BadDimensions(String),

    #[error("metadata trailer is not valid JSON: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Cache read/write failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("bundle serialization failed: {0}")]
    Codec(#[from] bincode::Error),
}

pub type FormatResult<T> = Result<T, FormatError>;
pub type StorageResult<T> = Result<T, StorageError>;
