//! Multiplier resolution — direct edge first, else shortest-path composition.
//!
//! Resolution order for `resolve(graph, from, to)`:
//!
//! 1. `from == to` → multiplier 1, path `[from]`
//! 2. direct edge `from → to` → its weight, path `[from, to]`
//! 3. breadth-first search ignoring weights; the multiplier is the product
//!    of the edge weights along the path in traversal order
//!
//! A composed multiplier that leaves the finite positive range fails with
//! `InvalidFactor` rather than returning `inf` or `0`.
//!
//! A direct edge is authoritative even when a composed path would give a
//! slightly different value. Among equal-length paths, whichever BFS reaches
//! first wins; neighbors are visited in edge-insertion order, but callers
//! should only rely on the path being length-optimal.

use std::collections::VecDeque;

use tracing::debug;

use crate::graph::UnitGraph;
use crate::model::{PathResult, UnitIx, is_valid_factor};
use crate::{Error, Result};

/// Resolve the multiplier converting `from` into `to` within one graph.
pub fn resolve(graph: &UnitGraph, from: &str, to: &str) -> Result<PathResult> {
    let src = graph.require(from)?;
    let dst = graph.require(to)?;

    if src == dst {
        return Ok(PathResult::identity(from));
    }

    if let Some(factor) = graph.weight(src, dst) {
        return Ok(PathResult::direct(from, to, factor));
    }

    let hops = shortest_path(graph, src, dst).ok_or_else(|| Error::NoPathFound {
        from: from.to_string(),
        to: to.to_string(),
        property: graph.property().to_string(),
    })?;

    let mut result = PathResult::identity(from);
    for pair in hops.windows(2) {
        let factor = graph.weight(pair[0], pair[1]).ok_or_else(|| Error::NoPathFound {
            from: from.to_string(),
            to: to.to_string(),
            property: graph.property().to_string(),
        })?;
        result.append(graph.unit_at(pair[1]).name.as_str(), factor);
    }

    // Long chains of large or small factors can overflow to inf or underflow to 0.
    if !is_valid_factor(result.multiplier) {
        return Err(Error::InvalidFactor {
            from: from.to_string(),
            to: to.to_string(),
            factor: result.multiplier.to_string(),
        });
    }

    debug!(property = graph.property(), path = %result, "multiplier composed");
    Ok(result)
}

/// Convert a value between two units of the same graph. Purely multiplicative.
pub fn convert(value: f64, from: &str, to: &str, graph: &UnitGraph) -> Result<f64> {
    Ok(value * resolve(graph, from, to)?.multiplier)
}

/// Unweighted shortest path over directed edges, endpoints included.
pub fn shortest_path(graph: &UnitGraph, src: UnitIx, dst: UnitIx) -> Option<Vec<UnitIx>> {
    if src == dst {
        return Some(vec![src]);
    }

    let mut parent: Vec<Option<UnitIx>> = vec![None; graph.len()];
    let mut queue = VecDeque::from([src]);
    parent[src.0] = Some(src);

    while let Some(current) = queue.pop_front() {
        for &(next, _) in graph.neighbors(current) {
            if parent[next.0].is_some() {
                continue;
            }
            parent[next.0] = Some(current);
            if next == dst {
                return Some(unwind(&parent, src, dst));
            }
            queue.push_back(next);
        }
    }

    None
}

fn unwind(parent: &[Option<UnitIx>], src: UnitIx, dst: UnitIx) -> Vec<UnitIx> {
    let mut path = vec![dst];
    let mut cursor = dst;
    while cursor != src {
        match parent[cursor.0] {
            Some(prev) => {
                path.push(prev);
                cursor = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

// ============================================================================
// Tests
// ============================================================================
