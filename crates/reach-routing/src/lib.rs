//! `reach-routing` — shortest-path engine and travel-time rasterizer.
//!
//! One calculation cell is served by one [`shortest_costs`] run (seeded with
//! the cell centroid's snapped start nodes) followed by one [`rasterize`]
//! call over the cell's pixel extent.  Both are pure functions of their
//! inputs and deterministic, so cached rasters never go stale relative to
//! recomputation.
//!
//! | Module     | Contents                                     |
//! |------------|----------------------------------------------|
//! | [`engine`] | `CostField`, `shortest_costs`                |
//! | [`raster`] | `TravelTimeRaster`, `rasterize`, `UNREACHED` |
//! | [`error`]  | `RoutingError`, `RoutingResult<T>`           |

pub mod engine;
pub mod error;
pub mod raster;

#[cfg(test)]
mod tests;

pub use engine::{shortest_costs, CostField};
pub use error::{RoutingError, RoutingResult};
pub use raster::{rasterize, TravelTimeRaster, UNREACHED};
