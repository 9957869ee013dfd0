//! `reach-aggregate` — derived matrices from cached travel-time bundles.
//!
//! Aggregation is a pure reader of the matrix cache: it joins a cell's
//! neighborhood of travel-time rasters against points of interest
//! (opportunities) or counts raster pixels per minute bucket
//! (connectivity).  It tolerates gaps — lazily computed neighbors may not
//! exist yet — and may run concurrently with writers of unrelated keys.
//!
//! | Module           | Contents                                  |
//! |------------------|-------------------------------------------|
//! | [`points`]       | `PoiPoint`, `PointSource` trait           |
//! | [`neighborhood`] | k-ring selection and bundle loading       |
//! | [`opportunity`]  | `compute_opportunities`                   |
//! | [`connectivity`] | `compute_connectivity`                    |
//! | [`error`]        | `AggregateError`, `AggregateResult<T>`    |

pub mod connectivity;
pub mod error;
pub mod neighborhood;
pub mod opportunity;
pub mod points;


pub use connectivity::compute_connectivity;
pub use error::{AggregateError, AggregateResult};
pub use neighborhood::{cells_bounds, load_neighborhood, neighborhood};
pub use opportunity::compute_opportunities;
pub use points::{PoiPoint, PointSource};
