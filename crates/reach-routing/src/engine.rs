//! Multi-source, cutoff-bounded shortest paths over the routing graph.
//!
//! # Cost units
//!
//! All costs are **milliseconds** (u32) internally, which gives the heap a
//! total order and deterministic behaviour for free.  [`CostField`] exposes
//! seconds as `f64` at the boundary; millisecond rounding is far below the
//! minute resolution of the rasters built from these fields.
//!
//! # Cutoff semantics
//!
//! A node enters the field only if its final cost is `<= cutoff`.  Labels
//! that would exceed the cutoff are never pushed, so the search frontier
//! collapses at the cutoff boundary instead of exploring the whole graph —
//! nodes beyond it are simply absent from the result.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use reach_core::NodeId;
use reach_network::RoutingNetwork;

use crate::error::{RoutingError, RoutingResult};

// ── CostField ─────────────────────────────────────────────────────────────────

/// Result of one shortest-path run: best known cost per node, dense over the
/// graph's node range, with unreached nodes absent.
pub struct CostField {
    /// Best cost in milliseconds; `u32::MAX` = unreached.
    cost_ms: Vec<u32>,
    cutoff_ms: u32,
}

impl CostField {
    /// Cost in seconds to reach `node`, or `None` if the node is beyond the
    /// cutoff or disconnected from every source.
    #[inline]
    pub fn get(&self, node: NodeId) -> Option<f64> {
        self.get_ms(node).map(|ms| ms as f64 / 1000.0)
    }

    /// Millisecond cost, `None` if unreached.
    #[inline]
    pub fn get_ms(&self, node: NodeId) -> Option<u32> {
        match self.cost_ms.get(node.index()) {
            Some(&ms) if ms != u32::MAX => Some(ms),
            _ => None,
        }
    }

    /// The cutoff this field was computed with, in seconds.
    pub fn cutoff_s(&self) -> f64 {
        self.cutoff_ms as f64 / 1000.0
    }

    /// Number of nodes within the cutoff.
    pub fn reached(&self) -> usize {
        self.cost_ms.iter().filter(|&&ms| ms != u32::MAX).count()
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Run Dijkstra from every node in `sources` at once (all seeded at cost 0)
/// and return the cost field truncated at `cutoff_s`.
///
/// One run serves one calculation-cell centroid; the sources are that
/// centroid's snapped start nodes.  Duplicate sources are harmless.
///
/// Ties are broken by `NodeId`, so identical inputs always produce an
/// identical field.
pub fn shortest_costs(
    network: &RoutingNetwork,
    sources: &[NodeId],
    cutoff_s: f64,
) -> RoutingResult<CostField> {
    if sources.is_empty() {
        return Err(RoutingError::NoSources);
    }

    let cutoff_ms = (cutoff_s * 1000.0).round() as u32;
    let n = network.node_count();
    let mut cost_ms = vec![u32::MAX; n];

    // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    for &s in sources {
        if cost_ms[s.index()] != 0 {
            cost_ms[s.index()] = 0;
            heap.push(Reverse((0, s)));
        }
    }

    while let Some(Reverse((cost, node))) = heap.pop() {
        // Skip stale heap entries.
        if cost > cost_ms[node.index()] {
            continue;
        }

        for (neighbor, arc_s) in network.out_arcs(node) {
            let arc_ms = (arc_s * 1000.0).round() as u32;
            let new_cost = cost.saturating_add(arc_ms);

            if new_cost <= cutoff_ms && new_cost < cost_ms[neighbor.index()] {
                cost_ms[neighbor.index()] = new_cost;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Ok(CostField { cost_ms, cutoff_ms })
}
