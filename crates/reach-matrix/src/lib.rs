//! `reach-matrix` — matrix bundles, the key-addressed cache, and the binary
//! grid exchange codec.
//!
//! Bundles are immutable once cached; an overwrite is a whole-bundle
//! replace through an atomic rename, never a partial update.  The codec is
//! the byte-exact interop surface with external routing engines.
//!
//! | Module    | Contents                                                             |
//! |-----------|----------------------------------------------------------------------|
//! | [`types`] | `TravelTimeMatrix`, `OpportunityMatrix`, `ConnectivityMatrix`        |
//! | [`store`] | `MatrixStore` trait, `FsMatrixStore`, `MemoryMatrixStore`, key types |
//! | [`codec`] | `GridBinaryPayload`, `decode`, `encode`                              |
//! | [`error`] | `FormatError`, `StorageError` and result aliases                     |

pub mod codec;
pub mod error;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use codec::{decode, encode, GridBinaryPayload, GRID_MAGIC, GRID_VERSION};
pub use error::{FormatError, FormatResult, StorageError, StorageResult};
pub use store::{
    get_bundle, put_bundle, CacheKey, FsMatrixStore, MatrixStore, MemoryMatrixStore, Namespace,
};
pub use types::{ConnectivityMatrix, MatrixRow, OpportunityMatrix, TravelTimeMatrix};
