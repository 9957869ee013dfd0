//! Routing graph representation, builder, and centroid snapping.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing arcs.
//! Given a `NodeId n`, its outgoing arcs occupy the slice:
//!
//! ```text
//! arc_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! An *arc* is one usable direction of an underlying *edge*: an edge whose
//! forward and reverse impedances are both open contributes two arcs, a
//! one-way street contributes one.  Iteration over a node's outgoing arcs is
//! a contiguous memory scan — ideal for Dijkstra's inner loop.
//!
//! Node ids are a dense 0..N-1 numbering assigned here; the mapping from the
//! source data's vertex keys is kept for seeding start points but never
//! leaks into the arrays.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds every live geometry segment in web-mercator
//! pixel space.  It serves two queries: snapping a calculation centroid to
//! its nearest edge, and the rasterizer's per-pixel nearest-edge lookup.
//!
//! # Snapping
//!
//! `NetworkBuilder::snap_centroid` projects the centroid onto the nearest
//! segment within the search radius and splits the underlying edge there
//! through an artificial node, apportioning length and both directional
//! costs proportionally.  The parent edge is retired from the index so the
//! rasterizer always sees the split halves.  A centroid with no edge in
//! range is reported as `None`, never an error.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use reach_core::geo::{meters_per_pixel, LonLat, PixelPoint};
use reach_core::{EdgeId, NodeId};

use crate::edge::EdgeRow;
use crate::error::{NetworkError, NetworkResult};

// ── R-tree segment entry ──────────────────────────────────────────────────────

/// One polyline segment of an edge geometry, in pixel space.
///
/// `frac_a`/`frac_b` locate the segment along the full edge polyline (0 at
/// the edge's `a` endpoint, 1 at `b`) so a projection onto the segment can
/// be turned into a fraction of the whole edge.
#[derive(Clone, Debug)]
pub struct EdgeSegment {
    pub edge:   EdgeId,
    pub a:      [f64; 2],
    pub b:      [f64; 2],
    pub frac_a: f64,
    pub frac_b: f64,
}

impl EdgeSegment {
    /// Clamped projection of `p` onto the segment: `(t, closest_point)`
    /// with `t` in `[0, 1]`.
    pub fn project(&self, p: [f64; 2]) -> (f64, [f64; 2]) {
        let dx = self.b[0] - self.a[0];
        let dy = self.b[1] - self.a[1];
        let len2 = dx * dx + dy * dy;
        let t = if len2 == 0.0 {
            0.0
        } else {
            (((p[0] - self.a[0]) * dx + (p[1] - self.a[1]) * dy) / len2).clamp(0.0, 1.0)
        };
        (t, [self.a[0] + t * dx, self.a[1] + t * dy])
    }

    /// Fraction along the parent edge at segment parameter `t`.
    #[inline]
    pub fn edge_frac(&self, t: f64) -> f64 {
        self.frac_a + (self.frac_b - self.frac_a) * t
    }
}

impl PartialEq for EdgeSegment {
    /// Identity for R-tree removal: an edge never carries two segments with
    /// the same fraction range.
    fn eq(&self, other: &Self) -> bool {
        self.edge == other.edge && self.frac_a == other.frac_a && self.frac_b == other.frac_b
    }
}

impl RTreeObject for EdgeSegment {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.a, self.b)
    }
}

impl PointDistance for EdgeSegment {
    /// Squared point-to-segment distance in pixel units.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let (_, closest) = self.project(*point);
        let dx = point[0] - closest[0];
        let dy = point[1] - closest[1];
        dx * dx + dy * dy
    }
}

// ── RoutingNetwork ────────────────────────────────────────────────────────────

/// Immutable directed routing graph in CSR format plus the segment R-tree.
///
/// All array fields are `pub` for direct indexed access on hot paths.  Do
/// not construct directly; use [`NetworkBuilder`].  Edge arrays may contain
/// retired (split) edges to keep `EdgeId` indexing stable — those are never
/// reachable through the R-tree or the CSR arcs.
pub struct RoutingNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Pixel-space position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<PixelPoint>,

    // ── CSR arc adjacency ─────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing arcs of node `n` are at indices
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = node_count + 1.
    pub node_out_start: Vec<u32>,

    /// Destination node of each arc.
    pub arc_to: Vec<NodeId>,

    /// Traversal cost of each arc in seconds.
    pub arc_cost_s: Vec<f64>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_a: Vec<NodeId>,
    pub edge_b: Vec<NodeId>,
    pub edge_length_m: Vec<f64>,
    /// Full-edge traversal seconds a→b; `f64::INFINITY` if that direction
    /// is closed.
    pub edge_fwd_s: Vec<f64>,
    /// Full-edge traversal seconds b→a.
    pub edge_rev_s: Vec<f64>,

    /// Zoom of the pixel space every coordinate in this graph lives in.
    pub zoom: u8,

    seg_index: RTree<EdgeSegment>,
    ext_to_node: FxHashMap<i64, NodeId>,
}

impl RoutingNetwork {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arc_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over `(destination, cost_s)` of all outgoing arcs of `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_arcs(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(move |i| (self.arc_to[i], self.arc_cost_s[i]))
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest live geometry segment to a pixel-space point.
    pub fn nearest_segment(&self, p: PixelPoint) -> Option<&EdgeSegment> {
        self.seg_index.nearest_neighbor(&[p.x, p.y])
    }

    /// Dense node id for an external vertex key, if that vertex appeared in
    /// any edge row.
    pub fn node_for_vertex(&self, ext: i64) -> Option<NodeId> {
        self.ext_to_node.get(&ext).copied()
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

struct BuiltEdge {
    a: NodeId,
    b: NodeId,
    length_m: f64,
    fwd_s: f64,
    rev_s: f64,
    geometry_px: Vec<[f64; 2]>,
    /// Set when the edge was split by snapping; retired edges produce no
    /// arcs and have no segments in the index.
    superseded: bool,
}

/// Construct a [`RoutingNetwork`] incrementally, then call
/// [`build`](Self::build).
///
/// Feed edge rows with [`add_rows`](Self::add_rows), snap the run's
/// calculation centroids with [`snap_centroid`](Self::snap_centroid), then
/// build.  The segment R-tree is maintained incrementally because snapping
/// both queries it and rewrites it.
pub struct NetworkBuilder {
    zoom: u8,
    speed_m_s: f64,
    node_pos: Vec<PixelPoint>,
    ext_to_node: FxHashMap<i64, NodeId>,
    edges: Vec<BuiltEdge>,
    /// Live segments per edge, mirroring the R-tree contents.
    edge_segments: Vec<Vec<EdgeSegment>>,
    seg_index: RTree<EdgeSegment>,
}

impl NetworkBuilder {
    /// `zoom` fixes the pixel space; `speed_m_s` converts impedance metres
    /// into traversal seconds.
    pub fn new(zoom: u8, speed_m_s: f64) -> Self {
        Self {
            zoom,
            speed_m_s,
            node_pos: Vec::new(),
            ext_to_node: FxHashMap::default(),
            edges: Vec::new(),
            edge_segments: Vec::new(),
            seg_index: RTree::new(),
        }
    }

    /// Add a single edge row.
    ///
    /// Rows with a degenerate geometry are rejected (recoverable — see
    /// [`add_rows`] for the skip-and-continue path).
    pub fn add_row(&mut self, row: &EdgeRow) -> NetworkResult<EdgeId> {
        if row.geometry.len() < 2 {
            return Err(NetworkError::BadGeometry {
                id: row.id,
                points: row.geometry.len(),
            });
        }

        let geometry_px: Vec<[f64; 2]> = row
            .geometry
            .iter()
            .map(|&ll| {
                let p = ll.to_pixel(self.zoom);
                [p.x, p.y]
            })
            .collect();

        let a = self.node_for(row.source, geometry_px[0]);
        let b = self.node_for(row.target, *geometry_px.last().unwrap_or(&geometry_px[0]));

        let fwd_s = direction_secs(row.fwd_cost, self.speed_m_s);
        let rev_s = direction_secs(row.rev_cost, self.speed_m_s);
        Ok(self.push_edge(a, b, row.length_m, fwd_s, rev_s, geometry_px))
    }

    /// Add every row, skipping (and warn-logging) unusable ones.  Returns
    /// the number of rows skipped.
    pub fn add_rows<'a>(&mut self, rows: impl IntoIterator<Item = &'a EdgeRow>) -> usize {
        let mut skipped = 0;
        for row in rows {
            if let Err(e) = self.add_row(row) {
                log::warn!("skipping edge row: {e}");
                skipped += 1;
            }
        }
        skipped
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ── Snapping ──────────────────────────────────────────────────────────

    /// Snap a calculation centroid onto the nearest edge within
    /// `radius_m`, splitting it through a new artificial node.
    ///
    /// Returns the start node to seed the shortest-path run with, or `None`
    /// when no edge lies in range (the centroid is then excluded from the
    /// run — its matrix row is dropped, not zero-filled).
    pub fn snap_centroid(&mut self, centroid: LonLat, radius_m: f64) -> Option<NodeId> {
        let p = centroid.to_pixel(self.zoom);
        let q = [p.x, p.y];

        let seg = self.seg_index.nearest_neighbor(&q)?.clone();
        let radius_px = radius_m / meters_per_pixel(centroid.lat, self.zoom);
        if seg.distance_2(&q) > radius_px * radius_px {
            return None;
        }

        let (t, closest) = seg.project(q);
        let frac = seg.edge_frac(t);

        // Projections landing on an endpoint reuse it; a zero-length split
        // half would produce degenerate segments.
        const EPS: f64 = 1e-6;
        let e = seg.edge.index();
        if frac <= EPS {
            return Some(self.edges[e].a);
        }
        if frac >= 1.0 - EPS {
            return Some(self.edges[e].b);
        }
        Some(self.split_edge(seg.edge, frac, closest))
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Consume the builder and produce an immutable [`RoutingNetwork`].
    ///
    /// Time complexity: O(A log A) for the arc sort, where A = arcs.
    pub fn build(self) -> RoutingNetwork {
        let node_count = self.node_pos.len();

        // One directed arc per open direction of every live edge.
        let mut raw: Vec<(NodeId, NodeId, f64)> = Vec::with_capacity(self.edges.len() * 2);
        for e in &self.edges {
            if e.superseded {
                continue;
            }
            if e.fwd_s.is_finite() {
                raw.push((e.a, e.b, e.fwd_s));
            }
            if e.rev_s.is_finite() {
                raw.push((e.b, e.a, e.rev_s));
            }
        }
        raw.sort_unstable_by(|x, y| x.0.cmp(&y.0).then(x.1.cmp(&y.1)));

        let arc_to:     Vec<NodeId> = raw.iter().map(|r| r.1).collect();
        let arc_cost_s: Vec<f64>    = raw.iter().map(|r| r.2).collect();

        // CSR row pointer.
        let mut node_out_start = vec![0u32; node_count + 1];
        for r in &raw {
            node_out_start[r.0.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        RoutingNetwork {
            node_pos:       self.node_pos,
            node_out_start,
            arc_to,
            arc_cost_s,
            edge_a:         self.edges.iter().map(|e| e.a).collect(),
            edge_b:         self.edges.iter().map(|e| e.b).collect(),
            edge_length_m:  self.edges.iter().map(|e| e.length_m).collect(),
            edge_fwd_s:     self.edges.iter().map(|e| e.fwd_s).collect(),
            edge_rev_s:     self.edges.iter().map(|e| e.rev_s).collect(),
            zoom:           self.zoom,
            seg_index:      self.seg_index,
            ext_to_node:    self.ext_to_node,
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn node_for(&mut self, ext: i64, pos: [f64; 2]) -> NodeId {
        if let Some(&id) = self.ext_to_node.get(&ext) {
            return id;
        }
        let id = NodeId(self.node_pos.len() as u32);
        self.node_pos.push(PixelPoint { x: pos[0], y: pos[1] });
        self.ext_to_node.insert(ext, id);
        id
    }

    fn push_node(&mut self, pos: [f64; 2]) -> NodeId {
        let id = NodeId(self.node_pos.len() as u32);
        self.node_pos.push(PixelPoint { x: pos[0], y: pos[1] });
        id
    }

    fn push_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        length_m: f64,
        fwd_s: f64,
        rev_s: f64,
        geometry_px: Vec<[f64; 2]>,
    ) -> EdgeId {
        let edge = EdgeId(self.edges.len() as u32);
        let segments = segments_of(edge, &geometry_px);
        for seg in &segments {
            self.seg_index.insert(seg.clone());
        }
        self.edge_segments.push(segments);
        self.edges.push(BuiltEdge {
            a,
            b,
            length_m,
            fwd_s,
            rev_s,
            geometry_px,
            superseded: false,
        });
        edge
    }

    fn split_edge(&mut self, edge: EdgeId, frac: f64, at: [f64; 2]) -> NodeId {
        let i = edge.index();
        let (a, b, length_m, fwd_s, rev_s) = {
            let e = &self.edges[i];
            (e.a, e.b, e.length_m, e.fwd_s, e.rev_s)
        };
        let (head, tail) = split_polyline(&self.edges[i].geometry_px, frac, at);

        // Retire the parent from the spatial index before the halves go in.
        for seg in std::mem::take(&mut self.edge_segments[i]) {
            self.seg_index.remove(&seg);
        }
        self.edges[i].superseded = true;

        let m = self.push_node(at);
        self.push_edge(a, m, length_m * frac, fwd_s * frac, rev_s * frac, head);
        self.push_edge(
            m,
            b,
            length_m * (1.0 - frac),
            fwd_s * (1.0 - frac),
            rev_s * (1.0 - frac),
            tail,
        );
        m
    }
}

/// Seconds to traverse `impedance_m` metres, or `INFINITY` for a closed
/// direction (negative impedance).
#[inline]
fn direction_secs(impedance_m: f64, speed_m_s: f64) -> f64 {
    if impedance_m < 0.0 {
        f64::INFINITY
    } else {
        impedance_m / speed_m_s
    }
}

/// Break a pixel polyline into R-tree segments with cumulative fractions.
fn segments_of(edge: EdgeId, geometry_px: &[[f64; 2]]) -> Vec<EdgeSegment> {
    let total: f64 = geometry_px
        .windows(2)
        .map(|w| seg_len(w[0], w[1]))
        .sum();

    if total == 0.0 {
        // Degenerate (all points coincide): one zero-length segment keeps
        // the edge findable.
        return vec![EdgeSegment {
            edge,
            a: geometry_px[0],
            b: geometry_px[geometry_px.len() - 1],
            frac_a: 0.0,
            frac_b: 1.0,
        }];
    }

    let mut out = Vec::with_capacity(geometry_px.len() - 1);
    let mut cum = 0.0;
    for w in geometry_px.windows(2) {
        let len = seg_len(w[0], w[1]);
        out.push(EdgeSegment {
            edge,
            a: w[0],
            b: w[1],
            frac_a: cum / total,
            frac_b: (cum + len) / total,
        });
        cum += len;
    }
    out
}

/// Split a pixel polyline at fraction `frac` of its length; `at` is the
/// precomputed split point.  Both halves contain `at` so no geometry is
/// lost.
fn split_polyline(geometry_px: &[[f64; 2]], frac: f64, at: [f64; 2]) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
    let total: f64 = geometry_px
        .windows(2)
        .map(|w| seg_len(w[0], w[1]))
        .sum();
    let last = geometry_px[geometry_px.len() - 1];

    if total == 0.0 {
        return (vec![geometry_px[0], at], vec![at, last]);
    }

    let target = frac * total;
    let mut cum = 0.0;
    let mut head: Vec<[f64; 2]> = Vec::new();
    for (i, w) in geometry_px.windows(2).enumerate() {
        head.push(w[0]);
        let len = seg_len(w[0], w[1]);
        if cum + len >= target {
            head.push(at);
            let mut tail = vec![at];
            tail.extend_from_slice(&geometry_px[i + 1..]);
            return (head, tail);
        }
        cum += len;
    }

    // Accumulated rounding pushed the target past the end.
    head.push(at);
    (head, vec![at, last])
}

#[inline]
fn seg_len(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}
