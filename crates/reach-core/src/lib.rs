//! `reach-core` — foundational types for the `rust_reach` accessibility toolkit.
//!
//! This crate is a dependency of every other `reach-*` crate.  It intentionally
//! has no `reach-*` dependencies and minimal external ones (only `serde` and
//! `thiserror`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`ids`]      | `NodeId`, `ArcId`, `EdgeId`                               |
//! | [`geo`]      | `LonLat`, `PixelPoint`, web-mercator pixel projection     |
//! | [`mode`]     | `TravelMode`, `RoutingProfile`                            |
//! | [`settings`] | `RunSettings` — one computation run's configuration       |
//! | [`error`]    | `CoreError`, `CoreResult`                                 |

pub mod error;
pub mod geo;
pub mod ids;
pub mod mode;
pub mod settings;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{GeoBounds, LonLat, PixelBounds, PixelPoint};
pub use ids::{ArcId, EdgeId, NodeId};
pub use mode::{RoutingProfile, TravelMode};
pub use settings::RunSettings;
