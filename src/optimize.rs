//! Graph optimizer — precompute a direct edge for every unit pair.
//!
//! Runs in two phases so the result does not depend on pair order:
//!
//! 1. `plan` snapshots the unordered unit pairs and resolves every pair that
//!    lacks a direct edge against the graph as it stands
//! 2. `optimize` applies the buffered insertions only after every pair has
//!    been evaluated
//!
//! After a pass every pair of units has a direct edge in both directions, so
//! `resolve` never searches. A second pass plans nothing.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::graph::UnitGraph;
use crate::model::UnitIx;
use crate::resolve::resolve;
use crate::Result;

/// One pending directed edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedEdge {
    pub from: UnitIx,
    pub to: UnitIx,
    pub factor: f64,
}

/// What an optimization pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeReport {
    /// Unordered pairs of distinct units, `n * (n - 1) / 2`.
    pub pairs_examined: usize,
    /// Directed edges inserted.
    pub edges_added: usize,
}

/// Compute the edges an optimization pass would insert, without mutating.
///
/// Fails with the first resolution error (e.g. `NoPathFound` on a
/// disconnected graph, `InvalidFactor` when a composed multiplier
/// overflows); nothing has been inserted at that point.
pub fn plan(graph: &UnitGraph) -> Result<Vec<PlannedEdge>> {
    let n = graph.len();
    let mut planned = Vec::new();

    for a in (0..n).map(UnitIx) {
        for b in (a.0 + 1..n).map(UnitIx) {
            match (graph.weight(a, b), graph.weight(b, a)) {
                (Some(_), Some(_)) => {}
                (Some(forward), None) => {
                    planned.push(PlannedEdge { from: b, to: a, factor: 1.0 / forward });
                }
                (None, Some(backward)) => {
                    planned.push(PlannedEdge { from: a, to: b, factor: 1.0 / backward });
                }
                (None, None) => {
                    let from = graph.unit_at(a).name.as_str();
                    let to = graph.unit_at(b).name.as_str();
                    let multiplier = resolve(graph, from, to)?.multiplier;
                    planned.push(PlannedEdge { from: a, to: b, factor: multiplier });
                    planned.push(PlannedEdge { from: b, to: a, factor: 1.0 / multiplier });
                }
            }
        }
    }

    Ok(planned)
}

/// Insert a direct edge for every unit pair lacking one.
pub fn optimize(graph: &mut UnitGraph) -> Result<OptimizeReport> {
    let n = graph.len();
    let planned = plan(graph)?;

    let mut report = OptimizeReport {
        pairs_examined: n * n.saturating_sub(1) / 2,
        edges_added: 0,
    };
    for edge in planned {
        if graph.insert_edge(edge.from, edge.to, edge.factor) {
            report.edges_added += 1;
            debug!(
                property = graph.property(),
                from = %graph.unit_at(edge.from).name,
                to = %graph.unit_at(edge.to).name,
                factor = edge.factor,
                "precomputed edge"
            );
        }
    }

    info!(
        property = graph.property(),
        units = n,
        pairs = report.pairs_examined,
        added = report.edges_added,
        "optimization pass complete"
    );
    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::model::{ConversionRecord, Unit};
    use crate::Error;
    use float_cmp::approx_eq;
    use pretty_assertions::assert_eq;

    fn chain() -> UnitGraph {
        build_graph("length", &[
            ConversionRecord::new("m", "meter", "ft", "foot", 3.28084),
            ConversionRecord::new("ft", "foot", "in", "inch", 12.0),
            ConversionRecord::new("in", "inch", "mil", "thou", 1000.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_complete_after_pass() {
        let mut g = chain();
        let report = optimize(&mut g).unwrap();
        assert_eq!(report, OptimizeReport { pairs_examined: 6, edges_added: 6 });
        assert_eq!(g.edge_count(), 12);

        let names: Vec<String> = g.unit_names().map(String::from).collect();
        for a in &names {
            for b in &names {
                if a != b {
                    assert!(g.has_edge(a, b), "missing {a} -> {b}");
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let mut g = chain();
        optimize(&mut g).unwrap();
        let once = g.edges();
        let report = optimize(&mut g).unwrap();
        assert_eq!(report.edges_added, 0);
        assert_eq!(g.edges(), once);
    }

    #[test]
    fn test_plan_uses_unoptimized_graph() {
        let g = chain();
        let planned = plan(&g).unwrap();
        let m = g.ix("m").unwrap();
        let mil = g.ix("mil").unwrap();
        let edge = planned.iter().find(|e| e.from == m && e.to == mil).unwrap();
        assert!(approx_eq!(f64, edge.factor, 3.28084 * 12.0 * 1000.0, epsilon = 1e-6));
        // planning alone never mutates
        assert_eq!(g.edge_count(), 6);
    }

    #[test]
    fn test_fills_missing_reverse() {
        let mut g = UnitGraph::new("length");
        let m = g.ensure_unit(Unit::new("m"));
        let cm = g.ensure_unit(Unit::new("cm"));
        g.insert_edge(m, cm, 100.0);

        let report = optimize(&mut g).unwrap();
        assert_eq!(report.edges_added, 1);
        assert_eq!(g.direct_factor("cm", "m"), Some(0.01));
    }

    #[test]
    fn test_overflowing_pair_inserts_nothing() {
        let mut g = build_graph("huge", &[
            ConversionRecord::new("a", "", "b", "", 1e200),
            ConversionRecord::new("b", "", "c", "", 1e200),
        ])
        .unwrap();
        assert!(matches!(plan(&g), Err(Error::InvalidFactor { .. })));
        assert!(matches!(optimize(&mut g), Err(Error::InvalidFactor { .. })));
        assert_eq!(g.edge_count(), 4);
        assert!(!g.has_edge("a", "c"));
        assert!(!g.has_edge("c", "a"));
        assert!(g.check_consistency(1e-9).is_empty());
    }

    #[test]
    fn test_disconnected_graph_is_untouched() {
        let mut g = chain();
        g.ensure_unit(Unit::new("parsec"));
        let before = g.edge_count();
        assert!(matches!(optimize(&mut g), Err(Error::NoPathFound { .. })));
        assert_eq!(g.edge_count(), before);
    }
}
