//! Base error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! via `From` or wrap it as one variant.  Configuration errors are always
//! fatal to the call that raised them — nothing is computed past one.

use thiserror::Error;

/// The top-level error type for `reach-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `reach-core`.
pub type CoreResult<T> = Result<T, CoreError>;
