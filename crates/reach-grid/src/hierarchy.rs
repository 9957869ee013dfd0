//! Study-area tessellation and the bulk/calculation cell hierarchy.
//!
//! # Discovery
//!
//! Covering cells are found by a BFS flood over the hex grid: seeded from
//! the cells under the polygon's exterior vertices, expanding through every
//! cell whose hexagon intersects the polygon.  This needs only core `h3o`
//! primitives (`to_cell`, `grid_disk`, `boundary`) plus `geo` predicates,
//! and visits O(cells covered) hexagons.
//!
//! The final grid is the union of:
//! - **covering cells** — centroid inside the (multi-)polygon, and
//! - **boundary ring** — 1-ring neighbors of covering cells, outside the
//!   covering set, whose hexagon intersects the polygon.  This avoids edge
//!   effects without inflating the grid by a full extra ring everywhere.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use geo::{Contains, Intersects, MultiPolygon, Point};
use h3o::{CellIndex, LatLng, Resolution};

use crate::error::{GridError, GridResult};
use crate::extent::cell_polygon;

// ── GridConfig ────────────────────────────────────────────────────────────────

/// The resolution pair of a grid hierarchy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridConfig {
    /// Coarse resolution — unit of caching and parallel dispatch.
    pub bulk_resolution: Resolution,
    /// Fine resolution — unit of a single shortest-path run.
    pub calc_resolution: Resolution,
}

impl GridConfig {
    /// Fail fast on an unusable resolution pair.
    pub fn validate(&self) -> GridResult<()> {
        if self.calc_resolution <= self.bulk_resolution {
            return Err(GridError::Config(format!(
                "calculation resolution {} must be finer than bulk resolution {}",
                self.calc_resolution, self.bulk_resolution
            )));
        }
        Ok(())
    }
}

// ── StudyAreaGrid ─────────────────────────────────────────────────────────────

/// The set of bulk cells covering one study area, boundary ring included.
///
/// Immutable once built; regenerate only by an explicit rebuild.  Cells are
/// kept sorted ascending so repeated builds over the same polygon produce
/// the identical value.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StudyAreaGrid {
    pub config: GridConfig,
    cells: Vec<CellIndex>,
}

impl StudyAreaGrid {
    /// Tessellate `area` into bulk cells at `config.bulk_resolution` and
    /// union in the intersecting boundary ring.
    ///
    /// Duplicate cells across polygon parts collapse (set semantics).  An
    /// empty polygon or a bad resolution pair is a configuration error and
    /// produces no partial output.
    pub fn build(area: &MultiPolygon<f64>, config: GridConfig) -> GridResult<Self> {
        config.validate()?;
        if area.iter().all(|p| p.exterior().0.is_empty()) {
            return Err(GridError::EmptyStudyArea);
        }

        let res = config.bulk_resolution;

        // Flood every hexagon intersecting any polygon part.
        let mut intersecting: BTreeSet<CellIndex> = BTreeSet::new();
        for part in area.iter() {
            flood_intersecting(part, res, &mut intersecting);
        }

        // Covering subset: centroid inside the area.
        let covering: BTreeSet<CellIndex> = intersecting
            .iter()
            .copied()
            .filter(|&cell| {
                let ll = LatLng::from(cell);
                area.contains(&Point::new(ll.lng(), ll.lat()))
            })
            .collect();

        // Outward ring: 1-ring neighbors of covering cells that are outside
        // the covering set but whose hexagon still touches the polygon.
        let mut cells = covering.clone();
        for &cell in &covering {
            for neighbor in cell.grid_disk::<Vec<_>>(1) {
                if covering.contains(&neighbor) || cells.contains(&neighbor) {
                    continue;
                }
                if cell_polygon(neighbor).intersects(area) {
                    cells.insert(neighbor);
                }
            }
        }

        if cells.is_empty() {
            return Err(GridError::EmptyStudyArea);
        }

        Ok(Self {
            config,
            cells: cells.into_iter().collect(),
        })
    }

    /// All bulk cells, sorted ascending.
    #[inline]
    pub fn bulk_cells(&self) -> &[CellIndex] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: CellIndex) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// Calculation children of `bulk` at this grid's calculation resolution.
    pub fn calc_children(&self, bulk: CellIndex) -> Vec<CellIndex> {
        calc_children(bulk, self.config.calc_resolution)
    }

    // ── Persistence ───────────────────────────────────────────────────────
    //
    // A grid is created once per (study area, resolution pair) and reused by
    // every later computation; rebuilds are explicit.  Writes stage to a
    // temporary file and rename so readers never observe a partial grid.

    pub fn save(&self, path: &Path) -> GridResult<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bincode::serialize(self)?)?;
        tmp.persist(path).map_err(|e| GridError::Io(e.error))?;
        Ok(())
    }

    pub fn load(path: &Path) -> GridResult<Self> {
        let file = File::open(path)?;
        Ok(bincode::deserialize_from(BufReader::new(file))?)
    }
}

/// Calculation-resolution children of a bulk cell, in `h3o`'s child
/// iteration order.  The order is stable across calls — matrix row ordering
/// depends on it.
pub fn calc_children(bulk: CellIndex, calc_resolution: Resolution) -> Vec<CellIndex> {
    bulk.children(calc_resolution).collect()
}

// ── Flood fill ────────────────────────────────────────────────────────────────

/// BFS from the cells under `part`'s exterior vertices through every cell
/// whose hexagon intersects `part`, inserting hits into `out`.
fn flood_intersecting(
    part: &geo::Polygon<f64>,
    res: Resolution,
    out: &mut BTreeSet<CellIndex>,
) {
    let mut queue: VecDeque<CellIndex> = part
        .exterior()
        .coords()
        .filter_map(|c| LatLng::new(c.y, c.x).ok())
        .map(|ll| ll.to_cell(res))
        .collect();

    let mut visited: HashSet<CellIndex> = HashSet::new();
    while let Some(cell) = queue.pop_front() {
        if !visited.insert(cell) {
            continue;
        }
        if !cell_polygon(cell).intersects(part) {
            continue;
        }
        out.insert(cell);
        for neighbor in cell.grid_disk::<Vec<_>>(1) {
            if !visited.contains(&neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
}
