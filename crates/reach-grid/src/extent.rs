//! Hex-cell geometry helpers and per-child raster extents.

use geo::{LineString, Polygon};
use h3o::{CellIndex, LatLng};

use reach_core::geo::{mercator_m_to_lonlat, LonLat, PixelBounds};

/// Centroid of a cell as a lon/lat coordinate.
pub fn centroid(cell: CellIndex) -> LonLat {
    let ll = LatLng::from(cell);
    LonLat::new(ll.lng(), ll.lat())
}

/// The cell's hexagon as a closed `geo` polygon (lon/lat degrees).
pub fn cell_polygon(cell: CellIndex) -> Polygon<f64> {
    let boundary = cell.boundary();
    let mut coords: Vec<(f64, f64)> = boundary.iter().map(|v| (v.lng(), v.lat())).collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    Polygon::new(LineString::from(coords), vec![])
}

/// Circumradius of the cell in metres: the largest centroid-to-vertex
/// distance.  For a hexagon this equals its edge length.
pub fn hex_size_m(cell: CellIndex) -> f64 {
    let center = centroid(cell);
    cell.boundary()
        .iter()
        .map(|v| center.distance_m(LonLat::new(v.lng(), v.lat())))
        .fold(0.0, f64::max)
}

/// Mean vertex-to-vertex edge length of the cell in metres.  Measured on
/// the actual cell rather than taken from a resolution-level average, so
/// it stays honest near the poles and pentagon distortions.
pub fn hex_edge_length_m(cell: CellIndex) -> f64 {
    let boundary = cell.boundary();
    let verts: Vec<LonLat> = boundary.iter().map(|v| LonLat::new(v.lng(), v.lat())).collect();
    if verts.len() < 2 {
        return 0.0;
    }
    let n = verts.len();
    let total: f64 = (0..n)
        .map(|i| verts[i].distance_m(verts[(i + 1) % n]))
        .sum();
    total / n as f64
}

/// Raster extent of a calculation cell.
///
/// The centroid is projected to spherical-mercator metres, buffered by
/// `hex_size * sqrt(2)` with a square cap (covering the hexagon's bounding
/// square), and the buffered box's corners are reprojected to integer pixel
/// coordinates at `zoom`.  Bounds are inclusive on all four edges.
pub fn raster_extent(cell: CellIndex, zoom: u8) -> PixelBounds {
    let center = centroid(cell);
    let buffer = hex_size_m(cell) * std::f64::consts::SQRT_2;

    let (mx, my) = center.to_mercator_m();
    // Mercator y grows north; pixel y grows south.
    let north_west = mercator_m_to_lonlat(mx - buffer, my + buffer).to_pixel(zoom);
    let south_east = mercator_m_to_lonlat(mx + buffer, my - buffer).to_pixel(zoom);

    PixelBounds {
        west:  north_west.x.floor() as i64,
        north: north_west.y.floor() as i64,
        east:  south_east.x.floor() as i64,
        south: south_east.y.floor() as i64,
    }
}
