//! Matrix bundle types: parallel-array bundles keyed by bulk cell.
//!
//! Bundles are stored and replaced whole.  Parallel arrays (rather than a
//! `Vec` of row structs) keep the serialized form compact and match the
//! layout downstream consumers address by row index.

use serde::{Deserialize, Serialize};

// ── TravelTimeMatrix ──────────────────────────────────────────────────────────

/// One bulk cell's travel-time bundle: one row per calculation-cell child
/// that had a valid snapped starting point.  Children that failed to snap
/// have no row (dropped, not zero-filled).
///
/// All row-indexed vectors are parallel; `zoom` is shared by every row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelTimeMatrix {
    pub zoom: u8,
    /// Calculation-cell id of each row (64-bit hex-grid id).
    pub grid_ids: Vec<u64>,
    /// Raster origin of each row in global pixel coordinates.
    pub west: Vec<i64>,
    pub north: Vec<i64>,
    pub width: Vec<u32>,
    pub height: Vec<u32>,
    /// Row-major minutes per row, `width * height` long; 255 = unreachable.
    pub travel_times: Vec<Vec<u8>>,
}

/// Borrowed view of one matrix row.
#[derive(Clone, Copy, Debug)]
pub struct MatrixRow<'a> {
    pub grid_id: u64,
    pub west: i64,
    pub north: i64,
    pub width: u32,
    pub height: u32,
    pub travel_times: &'a [u8],
}

impl TravelTimeMatrix {
    pub fn new(zoom: u8) -> Self {
        Self { zoom, ..Default::default() }
    }

    pub fn len(&self) -> usize {
        self.grid_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid_ids.is_empty()
    }

    /// Append one row.  `travel_times` must be `width * height` long.
    pub fn push_row(
        &mut self,
        grid_id: u64,
        west: i64,
        north: i64,
        width: u32,
        height: u32,
        travel_times: Vec<u8>,
    ) {
        debug_assert_eq!(travel_times.len(), (width * height) as usize);
        self.grid_ids.push(grid_id);
        self.west.push(west);
        self.north.push(north);
        self.width.push(width);
        self.height.push(height);
        self.travel_times.push(travel_times);
    }

    pub fn row(&self, i: usize) -> MatrixRow<'_> {
        MatrixRow {
            grid_id: self.grid_ids[i],
            west: self.west[i],
            north: self.north[i],
            width: self.width[i],
            height: self.height[i],
            travel_times: &self.travel_times[i],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = MatrixRow<'_>> {
        (0..self.len()).map(|i| self.row(i))
    }
}

impl MatrixRow<'_> {
    /// `true` if global pixel `(x, y)` falls inside this row's raster.
    /// Bounds are inclusive on all four edges: a point exactly on the
    /// northern or western boundary pixel is contained.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        let east = self.west + self.width as i64 - 1;
        let south = self.north + self.height as i64 - 1;
        self.west <= x && x <= east && self.north <= y && y <= south
    }

    /// Travel time in minutes at global pixel `(x, y)`; `None` outside the
    /// raster or at an unreachable pixel (sentinel 255).
    pub fn time_at(&self, x: i64, y: i64) -> Option<u8> {
        if !self.contains(x, y) {
            return None;
        }
        let idx = (y - self.north) as usize * self.width as usize + (x - self.west) as usize;
        match self.travel_times[idx] {
            u8::MAX => None,
            m => Some(m),
        }
    }
}

// ── OpportunityMatrix ─────────────────────────────────────────────────────────

/// Category-bucketed reachable points for one bulk cell.
///
/// `categories[c]` labels bucket `c`; the four per-bucket vectors are
/// parallel within each bucket.  Each point appears at most once: when
/// several rasters contain it, the entry carries the smallest travel time
/// and that raster row's grid id.  Always recomputable from the travel-time
/// bundles plus the point source — a cache, never a source of truth.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OpportunityMatrix {
    pub categories: Vec<String>,
    pub travel_times: Vec<Vec<u8>>,
    pub grid_ids: Vec<Vec<u64>>,
    pub names: Vec<Vec<String>>,
    pub uids: Vec<Vec<String>>,
}

impl OpportunityMatrix {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Index of the currently open bucket for `category`, opening a new one
    /// when the label differs from the immediately preceding bucket.
    ///
    /// This is first-seen *contiguous* bucketing: feed points pre-sorted by
    /// category or the same label fragments into multiple buckets.
    pub fn bucket_for(&mut self, category: &str) -> usize {
        match self.categories.last() {
            Some(last) if last == category => self.categories.len() - 1,
            _ => {
                self.categories.push(category.to_owned());
                self.travel_times.push(Vec::new());
                self.grid_ids.push(Vec::new());
                self.names.push(Vec::new());
                self.uids.push(Vec::new());
                self.categories.len() - 1
            }
        }
    }

    pub fn push_point(
        &mut self,
        category: &str,
        travel_time: u8,
        grid_id: u64,
        name: String,
        uid: String,
    ) {
        let b = self.bucket_for(category);
        self.travel_times[b].push(travel_time);
        self.grid_ids[b].push(grid_id);
        self.names[b].push(name);
        self.uids[b].push(uid);
    }
}

// ── ConnectivityMatrix ────────────────────────────────────────────────────────

/// Per-cell reachable-area estimates: for each grid id, pixel counts per
/// travel-time bucket `1..=max_time` (raw per-bucket counts, not
/// accumulated).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityMatrix {
    pub grid_ids: Vec<u64>,
    /// `areas[i][t-1]` = pixels of cell `grid_ids[i]` with travel time `t`.
    pub areas: Vec<Vec<u32>>,
}

impl ConnectivityMatrix {
    pub fn len(&self) -> usize {
        self.grid_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid_ids.is_empty()
    }

    pub fn push(&mut self, grid_id: u64, areas: Vec<u32>) {
        self.grid_ids.push(grid_id);
        self.areas.push(areas);
    }
}
