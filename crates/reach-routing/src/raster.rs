//! Projects a node cost field onto a regular pixel raster.
//!
//! Every pixel of a bulk-cell extent gets the travel time of its nearest
//! network edge, interpolated along that edge from whichever endpoint is
//! cheaper to approach it from.  Pixels whose nearest edge is unreached at
//! both endpoints, or whose interpolated cost exceeds the cutoff, carry the
//! [`UNREACHED`] sentinel.
//!
//! Raster values are whole minutes.  The matrix layer serializes rasters
//! as-is, so the sentinel is part of the stored format.

use reach_core::geo::{PixelBounds, PixelPoint};
use reach_network::{EdgeSegment, RoutingNetwork};

use crate::engine::CostField;
use crate::error::{RoutingError, RoutingResult};

/// Minute value marking a pixel no reached edge serves.
pub const UNREACHED: u8 = 255;

// ── TravelTimeRaster ──────────────────────────────────────────────────────────

/// One calculation cell's travel-time raster.
///
/// `west`/`north` are the raster origin in global pixel coordinates at
/// `zoom` (not geographic degrees), so consumers address it with integer
/// arithmetic only: `index = (y - north) * width + (x - west)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TravelTimeRaster {
    pub west: i64,
    pub north: i64,
    pub width: usize,
    pub height: usize,
    pub zoom: u8,
    /// Row-major minutes, `height * width` long; [`UNREACHED`] = no value.
    pub minutes: Vec<u8>,
}

impl TravelTimeRaster {
    /// Inclusive pixel bounds covered by this raster.
    pub fn bounds(&self) -> PixelBounds {
        PixelBounds {
            west:  self.west,
            north: self.north,
            east:  self.west + self.width as i64 - 1,
            south: self.north + self.height as i64 - 1,
        }
    }

    /// `true` if global pixel `(x, y)` falls inside the raster.  Bounds are
    /// inclusive on all four edges.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.west
            && x < self.west + self.width as i64
            && y >= self.north
            && y < self.north + self.height as i64
    }

    /// Minutes at global pixel `(x, y)`; `None` outside the raster or at an
    /// unreached pixel.
    pub fn at(&self, x: i64, y: i64) -> Option<u8> {
        if !self.contains(x, y) {
            return None;
        }
        let idx = (y - self.north) as usize * self.width + (x - self.west) as usize;
        match self.minutes[idx] {
            UNREACHED => None,
            m => Some(m),
        }
    }
}

// ── Rasterizer ────────────────────────────────────────────────────────────────

/// Rasterize `field` over `extent`.
///
/// Deterministic: identical inputs always produce an identical raster.
pub fn rasterize(
    network: &RoutingNetwork,
    field: &CostField,
    extent: PixelBounds,
) -> RoutingResult<TravelTimeRaster> {
    let width = extent.width();
    let height = extent.height();
    if width == 0 || height == 0 {
        return Err(RoutingError::EmptyExtent { width, height });
    }

    let cutoff_s = field.cutoff_s();
    let mut minutes = Vec::with_capacity(width * height);

    for y in extent.north..=extent.south {
        for x in extent.west..=extent.east {
            // Pixel center.
            let p = PixelPoint {
                x: x as f64 + 0.5,
                y: y as f64 + 0.5,
            };
            let value = match network.nearest_segment(p) {
                Some(seg) => {
                    let cost_s = pixel_cost_s(network, field, seg, [p.x, p.y]);
                    if cost_s <= cutoff_s {
                        minutes_of(cost_s)
                    } else {
                        UNREACHED
                    }
                }
                None => UNREACHED,
            };
            minutes.push(value);
        }
    }

    Ok(TravelTimeRaster {
        west: extent.west,
        north: extent.north,
        width,
        height,
        zoom: network.zoom,
        minutes,
    })
}

/// Interpolated cost of reaching the projection of `p` onto `seg`'s edge:
/// the cheaper of approaching from either endpoint along the edge at its
/// directional speed.  `INFINITY` when neither endpoint offers a way in.
fn pixel_cost_s(
    network: &RoutingNetwork,
    field: &CostField,
    seg: &EdgeSegment,
    p: [f64; 2],
) -> f64 {
    let (t, _) = seg.project(p);
    let frac = seg.edge_frac(t);
    let e = seg.edge.index();

    let from_a = approach(
        field.get(network.edge_a[e]),
        frac * network.edge_fwd_s[e],
    );
    let from_b = approach(
        field.get(network.edge_b[e]),
        (1.0 - frac) * network.edge_rev_s[e],
    );
    from_a.min(from_b)
}

/// `endpoint_cost + along`, or `INFINITY` when the endpoint is unreached or
/// the direction is closed.  `0 * INFINITY` is NaN, which the finiteness
/// check also rejects.
#[inline]
fn approach(endpoint_cost: Option<f64>, along_s: f64) -> f64 {
    match endpoint_cost {
        Some(c) if along_s.is_finite() => c + along_s,
        _ => f64::INFINITY,
    }
}

/// Whole minutes for storage; clamped below the sentinel.
#[inline]
fn minutes_of(cost_s: f64) -> u8 {
    let m = (cost_s / 60.0).round();
    if m >= UNREACHED as f64 {
        UNREACHED - 1
    } else {
        m as u8
    }
}
