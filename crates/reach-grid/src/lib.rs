//! `reach-grid` — the two-level hexagonal grid hierarchy.
//!
//! A study area is tessellated into coarse **bulk cells** (the unit of
//! caching and parallel dispatch) whose fine **calculation cells** are the
//! start points of individual shortest-path runs.  Boundary-adjacent
//! neighbor cells are unioned in so accessibility near the study-area edge
//! is not truncated.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`hierarchy`] | `GridConfig`, `StudyAreaGrid`, `calc_children`          |
//! | [`extent`]    | per-child raster extents, hex metrics                   |
//! | [`error`]     | `GridError`, `GridResult<T>`                            |

pub mod error;
pub mod extent;
pub mod hierarchy;


pub use error::{GridError, GridResult};
pub use extent::{cell_polygon, centroid, hex_edge_length_m, hex_size_m, raster_extent};
pub use hierarchy::{calc_children, GridConfig, StudyAreaGrid};
