//! Travel modes and routing profiles.
//!
//! A *mode* selects the transport kind, a *profile* the impedance weighting
//! used when the network source computed per-edge costs (e.g. a wheelchair
//! profile penalizes stairs and kerbs).  Together they form the first two
//! levels of every cache key, so both expose stable lowercase labels.

use std::str::FromStr;

use crate::error::CoreError;

/// Active-mobility transport mode.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walking,
    Cycling,
}

impl TravelMode {
    /// Stable label used in cache paths and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
        }
    }
}

impl FromStr for TravelMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walking" => Ok(TravelMode::Walking),
            "cycling" => Ok(TravelMode::Cycling),
            other => Err(CoreError::Config(format!("unknown travel mode: {other}"))),
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Impedance profile applied by the network source when costing edges.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingProfile {
    Standard,
    Elderly,
    SafeNight,
    Wheelchair,
    Pedelec,
}

impl RoutingProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingProfile::Standard   => "standard",
            RoutingProfile::Elderly    => "elderly",
            RoutingProfile::SafeNight  => "safe_night",
            RoutingProfile::Wheelchair => "wheelchair",
            RoutingProfile::Pedelec    => "pedelec",
        }
    }

    /// `true` if this profile is defined for `mode`.
    pub fn supports(self, mode: TravelMode) -> bool {
        match mode {
            TravelMode::Walking => !matches!(self, RoutingProfile::Pedelec),
            TravelMode::Cycling => matches!(
                self,
                RoutingProfile::Standard | RoutingProfile::Pedelec
            ),
        }
    }
}

impl FromStr for RoutingProfile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard"   => Ok(RoutingProfile::Standard),
            "elderly"    => Ok(RoutingProfile::Elderly),
            "safe_night" => Ok(RoutingProfile::SafeNight),
            "wheelchair" => Ok(RoutingProfile::Wheelchair),
            "pedelec"    => Ok(RoutingProfile::Pedelec),
            other => Err(CoreError::Config(format!("unknown routing profile: {other}"))),
        }
    }
}

impl std::fmt::Display for RoutingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
