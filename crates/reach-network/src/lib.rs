//! `reach-network` — the transient routing graph.
//!
//! Each computation run builds its own [`RoutingNetwork`] from a filtered
//! slice of raw edge rows (plus scenario deltas), snaps the run's calculation
//! centroids onto it, and throws it away afterwards.  The graph is never
//! persisted and never mutated after [`NetworkBuilder::build`].
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`edge`]    | `EdgeRow`, `EdgeSource` trait, `ScenarioOverlay`            |
//! | [`network`] | `RoutingNetwork` (CSR + R-tree), `NetworkBuilder`, snapping |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |

pub mod edge;
pub mod error;
pub mod network;

#[cfg(test)]
mod tests;

pub use edge::{EdgeRow, EdgeSource, ScenarioOverlay};
pub use error::{NetworkError, NetworkResult};
pub use network::{EdgeSegment, NetworkBuilder, RoutingNetwork};
