//! Geographic coordinates and the web-mercator pixel grid.
//!
//! # Pixel space
//!
//! All rasters are addressed in **web-mercator pixel coordinates**: the world
//! at a given `zoom` is a square of `2^zoom * 256` pixels, x growing east,
//! y growing south.  Matrix rows store their origin (`west`, `north`) in this
//! space so downstream consumers perform integer arithmetic only.
//!
//! Coordinates use `f64` throughout: at zoom 12 a pixel is ~38 m wide and the
//! world is ~10^6 px across, which already exhausts `f32`'s 24-bit mantissa.

/// A WGS-84 geographic coordinate (degrees).
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

/// A (possibly fractional) position in web-mercator pixel space at a fixed
/// zoom.  The zoom itself is carried by the surrounding context.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

/// Inclusive integer pixel bounds of a raster extent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelBounds {
    pub west:  i64,
    pub north: i64,
    pub east:  i64,
    pub south: i64,
}

impl PixelBounds {
    #[inline]
    pub fn width(&self) -> usize {
        (self.east - self.west + 1).max(0) as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        (self.south - self.north + 1).max(0) as usize
    }
}

/// A geographic bounding box in lon/lat degrees, used to filter network and
/// point sources to the slice a run actually needs.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoBounds {
    pub west:  f64,
    pub south: f64,
    pub east:  f64,
    pub north: f64,
}

impl GeoBounds {
    /// Smallest box containing every point, or `None` for an empty input.
    pub fn around(points: impl IntoIterator<Item = LonLat>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut b = GeoBounds {
            west:  first.lon,
            south: first.lat,
            east:  first.lon,
            north: first.lat,
        };
        for p in iter {
            b.west = b.west.min(p.lon);
            b.south = b.south.min(p.lat);
            b.east = b.east.max(p.lon);
            b.north = b.north.max(p.lat);
        }
        Some(b)
    }

    /// Expand all four edges by `metres` (degree conversion at the box's
    /// mid-latitude; good enough for query buffers).
    pub fn buffered_m(self, metres: f64) -> Self {
        let mid_lat = (self.south + self.north) * 0.5;
        let d_lat = metres / 111_320.0;
        let d_lon = d_lat / mid_lat.to_radians().cos().max(0.01);
        GeoBounds {
            west:  self.west - d_lon,
            south: self.south - d_lat,
            east:  self.east + d_lon,
            north: self.north + d_lat,
        }
    }

    #[inline]
    pub fn contains(&self, p: LonLat) -> bool {
        p.lon >= self.west && p.lon <= self.east && p.lat >= self.south && p.lat <= self.north
    }
}

const EARTH_RADIUS_M: f64 = 6_378_137.0; // WGS-84 equatorial, spherical mercator
const TILE_SIZE: f64 = 256.0;

/// World size in pixels at `zoom`.
#[inline]
pub fn world_pixels(zoom: u8) -> f64 {
    TILE_SIZE * (1u64 << zoom) as f64
}

impl LonLat {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Project to fractional web-mercator pixel coordinates at `zoom`.
    pub fn to_pixel(self, zoom: u8) -> PixelPoint {
        let n = world_pixels(zoom);
        let x = (self.lon + 180.0) / 360.0 * n;
        let lat_rad = self.lat.to_radians();
        let y = (1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0 * n;
        PixelPoint { x, y }
    }

    /// Project to spherical-mercator metres (used for metre-true buffering
    /// around a point before converting the result back to pixel space).
    pub fn to_mercator_m(self) -> (f64, f64) {
        let x = EARTH_RADIUS_M * self.lon.to_radians();
        let y = EARTH_RADIUS_M * self.lat.to_radians().tan().asinh();
        (x, y)
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: LonLat) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

/// Inverse of [`LonLat::to_pixel`]: the geographic coordinate of a
/// (possibly fractional) pixel position at `zoom`.
pub fn pixel_to_lonlat(x: f64, y: f64, zoom: u8) -> LonLat {
    let n = world_pixels(zoom);
    let lon = x / n * 360.0 - 180.0;
    let lat = (std::f64::consts::PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
    LonLat { lon, lat }
}

/// Inverse of [`LonLat::to_mercator_m`].
pub fn mercator_m_to_lonlat(x: f64, y: f64) -> LonLat {
    let lon = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (y / EARTH_RADIUS_M).sinh().atan().to_degrees();
    LonLat { lon, lat }
}

/// Ground metres covered by one pixel at `zoom` and latitude `lat`.
pub fn meters_per_pixel(lat: f64, zoom: u8) -> f64 {
    let circumference = 2.0 * std::f64::consts::PI * EARTH_RADIUS_M;
    circumference * lat.to_radians().cos() / world_pixels(zoom)
}

impl PixelPoint {
    /// The integer pixel containing this point (floor on both axes).
    #[inline]
    pub fn cell(self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }

    /// Squared Euclidean distance in pixel units.
    #[inline]
    pub fn distance_2(self, other: PixelPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl std::fmt::Display for LonLat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}
