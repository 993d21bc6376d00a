//! # Unit Graph
//!
//! A directed, edge-weighted graph over the units of one property.
//! The weight on `A → B` is the multiplier converting a value in `A` to `B`.
//!
//! ## Layout
//!
//! - `units`: dense node table, indexed by `UnitIx`, in insertion order
//! - `index`: unit name → `UnitIx`
//! - `adjacency`: per-node outgoing `(target, factor)` list, insertion order
//! - `weights`: `(from, to)` → factor, for O(1) direct-edge lookup
//!
//! Edges are only ever added, never removed or reweighted. Every mutation
//! goes through `insert_edge`, which keeps `adjacency` and `weights` in step.

pub mod builder;

use std::collections::VecDeque;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::model::{Edge, Unit, UnitIx, is_valid_factor};
use crate::{Error, Result};

pub use builder::{GraphBuilder, attach_unit, build_graph};

// ============================================================================
// UnitGraph
// ============================================================================

/// Conversion graph for a single property.
#[derive(Debug, Clone, Default)]
pub struct UnitGraph {
    property: String,
    units: Vec<Unit>,
    index: HashMap<String, UnitIx>,
    adjacency: Vec<Vec<(UnitIx, f64)>>,
    weights: HashMap<(UnitIx, UnitIx), f64>,
}

/// An edge pair whose weights are not reciprocal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inconsistency {
    pub from: String,
    pub to: String,
    pub forward: f64,
    /// `None` when the reverse edge is missing altogether.
    pub backward: Option<f64>,
}

impl UnitGraph {
    pub fn new(property: impl Into<String>) -> Self {
        Self { property: property.into(), ..Self::default() }
    }

    /// Name of the property this graph belongs to.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }

    // ========================================================================
    // Units
    // ========================================================================

    /// Insert a unit if its name is new. Returns the index either way;
    /// an existing unit keeps its display name.
    pub fn ensure_unit(&mut self, unit: Unit) -> UnitIx {
        if let Some(&ix) = self.index.get(&unit.name) {
            return ix;
        }
        let ix = UnitIx(self.units.len());
        self.index.insert(unit.name.clone(), ix);
        self.units.push(unit);
        self.adjacency.push(Vec::new());
        ix
    }

    pub(crate) fn set_full_name(&mut self, ix: UnitIx, full_name: Option<String>) {
        if let Some(unit) = self.units.get_mut(ix.0) {
            unit.full_name = full_name;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn ix(&self, name: &str) -> Option<UnitIx> {
        self.index.get(name).copied()
    }

    /// Like `ix`, but a missing unit is an error.
    pub fn require(&self, name: &str) -> Result<UnitIx> {
        self.ix(name).ok_or_else(|| Error::UnitNotFound {
            unit: name.to_string(),
            property: self.property.clone(),
        })
    }

    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.ix(name).map(|ix| &self.units[ix.0])
    }

    /// Unit at a given index. Panics on an index from another graph
    /// that is out of range, like slice indexing.
    pub fn unit_at(&self, ix: UnitIx) -> &Unit {
        &self.units[ix.0]
    }

    /// All units in insertion order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Unit names in insertion order.
    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.name.as_str())
    }

    // ========================================================================
    // Edges
    // ========================================================================

    /// Insert a single directed edge. Returns false (and changes nothing)
    /// if the edge already exists: edges are never reweighted.
    pub(crate) fn insert_edge(&mut self, from: UnitIx, to: UnitIx, factor: f64) -> bool {
        debug_assert!(from != to, "self-loops are never created");
        if self.weights.contains_key(&(from, to)) {
            return false;
        }
        self.weights.insert((from, to), factor);
        self.adjacency[from.0].push((to, factor));
        true
    }

    /// Insert `from → to` with `factor` and its inverse, skipping whichever
    /// direction already exists. Returns the number of edges added.
    pub fn add_edge_pair(&mut self, from: &str, to: &str, factor: f64) -> Result<usize> {
        let a = self.require(from)?;
        let b = self.require(to)?;
        if a == b {
            return Err(Error::InvalidRecord(format!("edge converts unit '{from}' to itself")));
        }
        if !is_valid_factor(factor) {
            return Err(Error::InvalidFactor {
                from: from.to_string(),
                to: to.to_string(),
                factor: factor.to_string(),
            });
        }
        let added = usize::from(self.insert_edge(a, b, factor))
            + usize::from(self.insert_edge(b, a, 1.0 / factor));
        Ok(added)
    }

    /// Weight of the direct edge `from → to`, if any.
    pub fn weight(&self, from: UnitIx, to: UnitIx) -> Option<f64> {
        self.weights.get(&(from, to)).copied()
    }

    /// Weight of the direct edge between two named units, if any.
    pub fn direct_factor(&self, from: &str, to: &str) -> Option<f64> {
        self.weight(self.ix(from)?, self.ix(to)?)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.direct_factor(from, to).is_some()
    }

    /// Outgoing edges of a unit in insertion order.
    pub fn neighbors(&self, ix: UnitIx) -> &[(UnitIx, f64)] {
        &self.adjacency[ix.0]
    }

    /// Every directed edge, grouped by source unit in insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(from, out)| {
                out.iter().map(move |&(to, factor)| {
                    Edge::new(self.units[from].name.clone(), self.units[to.0].name.clone(), factor)
                })
            })
            .collect()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Units not reachable from the first unit when edge direction is
    /// ignored. Empty iff the graph is weakly connected.
    pub fn unreachable_units(&self) -> Vec<String> {
        if self.units.is_empty() {
            return Vec::new();
        }

        let mut undirected: Vec<Vec<usize>> = vec![Vec::new(); self.units.len()];
        for &(a, b) in self.weights.keys() {
            undirected[a.0].push(b.0);
            undirected[b.0].push(a.0);
        }

        let mut seen = vec![false; self.units.len()];
        let mut queue = VecDeque::from([0usize]);
        seen[0] = true;
        while let Some(current) = queue.pop_front() {
            for &next in &undirected[current] {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }

        seen.iter()
            .enumerate()
            .filter(|&(_, &reached)| !reached)
            .map(|(ix, _)| self.units[ix].name.clone())
            .collect()
    }

    /// An empty graph counts as connected.
    pub fn is_weakly_connected(&self) -> bool {
        self.unreachable_units().is_empty()
    }

    /// Fail with `DisconnectedGraph` unless weakly connected.
    pub fn ensure_connected(&self) -> Result<()> {
        let unreachable = self.unreachable_units();
        if unreachable.is_empty() {
            return Ok(());
        }
        Err(Error::DisconnectedGraph {
            property: self.property.clone(),
            unreachable,
        })
    }

    /// Edge pairs whose weights are not reciprocal within `tolerance`
    /// (relative), and edges whose reverse is missing.
    pub fn check_consistency(&self, tolerance: f64) -> Vec<Inconsistency> {
        let mut found = Vec::new();
        for (from, out) in self.adjacency.iter().enumerate() {
            for &(to, forward) in out {
                let backward = self.weight(to, UnitIx(from));
                let ok = match backward {
                    // Report each broken pair once, from its lower index.
                    Some(_) if to.0 < from => continue,
                    Some(back) => ((forward * back) - 1.0).abs() <= tolerance,
                    None => false,
                };
                if !ok {
                    found.push(Inconsistency {
                        from: self.units[from].name.clone(),
                        to: self.units[to.0].name.clone(),
                        forward,
                        backward,
                    });
                }
            }
        }
        found
    }
}

// ============================================================================
// Tests
// ============================================================================
