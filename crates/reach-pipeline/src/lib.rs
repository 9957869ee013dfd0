//! `reach-pipeline` — the end-to-end accessibility computation.
//!
//! Ties the layers together: the study-area grid enumerates bulk cells,
//! each cell gets its own network slice, shortest-path runs, and rasters,
//! and the resulting bundles land in the matrix cache.  Derived matrices
//! (opportunity, connectivity) read those bundles back later.
//!
//! The pipeline owns no executor beyond Rayon's fan-out and exposes plain
//! functions; triggering, queueing, and HTTP concerns live with the caller.
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | [`run`]    | `compute_travel_time_matrices`, `compute_bulk_cell`         |
//! | [`derive`] | opportunity/connectivity passes, per cell and per grid      |
//! | [`error`]  | `PipelineError`, `PipelineResult<T>`                        |

pub mod derive;
pub mod error;
pub mod run;


pub use derive::{
    compute_connectivity_matrices, compute_connectivity_matrix, compute_opportunity_matrices,
    compute_opportunity_matrix,
};
pub use error::{PipelineError, PipelineResult};
pub use run::{compute_bulk_cell, compute_travel_time_matrices, RunReport};
