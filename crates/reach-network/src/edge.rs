//! Raw edge rows, the network-source seam, and scenario overlays.

use std::collections::{HashMap, HashSet};

use reach_core::geo::{GeoBounds, LonLat};

use crate::error::NetworkResult;

/// One edge row as delivered by the network source.
///
/// `fwd_cost` / `rev_cost` are directional impedance lengths in metres, as
/// computed by the source for the active routing profile (a penalized edge
/// carries more impedance metres than physical metres).  A negative value
/// closes that direction — one-way streets need no duplicate rows.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EdgeRow {
    pub id: i64,
    pub source: i64,
    pub target: i64,
    pub length_m: f64,
    pub fwd_cost: f64,
    pub rev_cost: f64,
    /// Edge polyline in lon/lat; at least the two endpoints.
    pub geometry: Vec<LonLat>,
}

impl EdgeRow {
    /// Convenience for straight two-point edges (tests, synthetic data).
    pub fn straight(
        id: i64,
        source: i64,
        target: i64,
        from: LonLat,
        to: LonLat,
        length_m: f64,
    ) -> Self {
        Self {
            id,
            source,
            target,
            length_m,
            fwd_cost: length_m,
            rev_cost: length_m,
            geometry: vec![from, to],
        }
    }
}

// ── EdgeSource ────────────────────────────────────────────────────────────────

/// Read-only seam to the store holding raw network edges.
///
/// Implementations wrap whatever actually holds the data (a relational
/// store, a file extract, an in-memory fixture).  The core only ever asks
/// for the slice intersecting an extent.
///
/// # Thread safety
///
/// Must be `Send + Sync`: one source value is shared across the per-bulk-cell
/// Rayon fan-out.
pub trait EdgeSource: Send + Sync {
    /// All edge rows intersecting `bounds`.
    fn edges_in(&self, bounds: GeoBounds) -> NetworkResult<Vec<EdgeRow>>;
}

// ── ScenarioOverlay ───────────────────────────────────────────────────────────

/// Edge deltas of a planning scenario: deletions and added or modified rows.
///
/// Applied to the raw slice before graph construction, so the rest of the
/// pipeline never knows scenarios exist.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ScenarioOverlay {
    /// Edge ids removed by the scenario.
    pub deleted_edge_ids: HashSet<i64>,
    /// New edges, plus modified edges keyed by their original id.
    pub edges: Vec<EdgeRow>,
}

impl ScenarioOverlay {
    pub fn is_empty(&self) -> bool {
        self.deleted_edge_ids.is_empty() && self.edges.is_empty()
    }

    /// Apply the overlay to a raw slice: drop deleted rows, replace rows
    /// whose id reappears in the overlay, append the rest.
    pub fn apply(&self, rows: Vec<EdgeRow>) -> Vec<EdgeRow> {
        if self.is_empty() {
            return rows;
        }

        let replacements: HashMap<i64, &EdgeRow> =
            self.edges.iter().map(|e| (e.id, e)).collect();

        let mut out: Vec<EdgeRow> = rows
            .into_iter()
            .filter(|row| {
                !self.deleted_edge_ids.contains(&row.id) && !replacements.contains_key(&row.id)
            })
            .collect();
        out.extend(self.edges.iter().cloned());
        out
    }
}
