//! Point-of-interest source seam.

use reach_core::geo::GeoBounds;

use crate::error::AggregateResult;

/// One candidate point, already projected to pixel space at the zoom the
/// aggregation runs at.
#[derive(Clone, Debug, PartialEq)]
pub struct PoiPoint {
    pub uid: String,
    pub category: String,
    pub name: String,
    pub x: i64,
    pub y: i64,
}

/// Read-only seam to the store holding points of interest.
///
/// Implementations project their coordinates to pixel space at the
/// requested zoom so the aggregator works in integer pixel arithmetic only.
pub trait PointSource: Send + Sync {
    /// All points inside `bounds`, projected at `zoom`.
    fn points_in(&self, bounds: GeoBounds, zoom: u8) -> AggregateResult<Vec<PoiPoint>>;
}
