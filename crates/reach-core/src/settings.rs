//! Per-run configuration.
//!
//! One `RunSettings` value describes a single accessibility computation:
//! the mode/profile pair it is keyed under, the assumed travel speed, the
//! travel-time cutoff, and the pixel zoom of the output rasters.  It is
//! built once by the caller, validated, and then passed by reference into
//! every stage — there is no global configuration state.

use crate::error::{CoreError, CoreResult};
use crate::mode::{RoutingProfile, TravelMode};

/// Configuration for one accessibility computation run.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RunSettings {
    pub mode:    TravelMode,
    pub profile: RoutingProfile,

    /// Assumed travel speed in km/h (fractional speeds are fine).
    pub speed_kmh: f64,

    /// Travel-time cutoff in whole minutes.  Raster values and opportunity
    /// travel times are bounded by this.
    pub max_travel_min: u32,

    /// Web-mercator zoom of the output pixel grid (256 px tiles).
    pub zoom: u8,

    /// Centroid-to-edge snap search radius in metres.  Centroids with no
    /// edge inside this radius are excluded from the run.
    pub snap_radius_m: f64,
}

impl RunSettings {
    /// Speed in metres per second.
    #[inline]
    pub fn speed_m_s(&self) -> f64 {
        self.speed_kmh / 3.6
    }

    /// Cutoff in seconds — the unit the shortest-path engine works in.
    #[inline]
    pub fn cutoff_s(&self) -> f64 {
        self.max_travel_min as f64 * 60.0
    }

    /// Maximum ground distance reachable within the cutoff, in metres.
    /// Drives the neighborhood ring size during aggregation.
    #[inline]
    pub fn max_travel_m(&self) -> f64 {
        self.speed_m_s() * self.cutoff_s()
    }

    /// Fail fast on configuration errors; nothing downstream tolerates them.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.profile.supports(self.mode) {
            return Err(CoreError::Config(format!(
                "profile {} is not defined for mode {}",
                self.profile, self.mode
            )));
        }
        if !(self.speed_kmh > 0.0) {
            return Err(CoreError::Config(format!(
                "speed must be positive, got {} km/h",
                self.speed_kmh
            )));
        }
        if self.max_travel_min == 0 {
            return Err(CoreError::Config("max_travel_min must be >= 1".into()));
        }
        if self.zoom > 20 {
            return Err(CoreError::Config(format!("zoom {} out of range", self.zoom)));
        }
        if !(self.snap_radius_m > 0.0) {
            return Err(CoreError::Config(format!(
                "snap radius must be positive, got {} m",
                self.snap_radius_m
            )));
        }
        Ok(())
    }
}

impl Default for RunSettings {
    /// 20-minute standard walking run at 5 km/h on the zoom-12 pixel grid.
    fn default() -> Self {
        Self {
            mode:           TravelMode::Walking,
            profile:        RoutingProfile::Standard,
            speed_kmh:      5.0,
            max_travel_min: 20,
            zoom:           12,
            snap_radius_m:  300.0,
        }
    }
}
