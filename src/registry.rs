//! # Property Registry
//!
//! Owns one `UnitGraph` per property and a denormalized table of
//! `(unit, full name, property)` rows used to find which properties a pair
//! of unit names can be converted in.
//!
//! The row table is a derived cache: it is rebuilt from the graphs after
//! every change to their unit sets and is never patched in place.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::graph::{UnitGraph, attach_unit};
use crate::model::{ConversionRecord, UnitRow};
use crate::optimize::{self, OptimizeReport};
use crate::{Error, Result};

/// Property name → graph, plus the cross-property unit table.
#[derive(Debug, Clone, Default)]
pub struct PropertyRegistry {
    graphs: BTreeMap<String, UnitGraph>,
    rows: Vec<UnitRow>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a graph under its own property name.
    ///
    /// The graph must be weakly connected; a disconnected graph means the
    /// unit table is structurally wrong and is rejected with
    /// `DisconnectedGraph`.
    pub fn register(&mut self, graph: UnitGraph) -> Result<()> {
        let name = graph.property().to_string();
        if self.graphs.contains_key(&name) {
            return Err(Error::DuplicateProperty(name));
        }
        graph.ensure_connected()?;

        info!(
            property = %name,
            units = graph.len(),
            edges = graph.edge_count(),
            "property registered"
        );
        self.graphs.insert(name, graph);
        self.rebuild_rows();
        Ok(())
    }

    pub fn graph(&self, property: &str) -> Result<&UnitGraph> {
        self.graphs
            .get(property)
            .ok_or_else(|| Error::PropertyNotFound(property.to_string()))
    }

    pub fn contains(&self, property: &str) -> bool {
        self.graphs.contains_key(property)
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Registered property names, sorted.
    pub fn properties(&self) -> Vec<String> {
        self.graphs.keys().cloned().collect()
    }

    /// Iterate graphs in property-name order.
    pub fn graphs(&self) -> impl Iterator<Item = &UnitGraph> {
        self.graphs.values()
    }

    // ========================================================================
    // Unit table
    // ========================================================================

    /// Unit rows, optionally restricted to one property.
    pub fn units(&self, property: Option<&str>) -> Result<Vec<UnitRow>> {
        match property {
            None => Ok(self.rows.clone()),
            Some(p) => {
                self.graph(p)?;
                Ok(self.rows.iter().filter(|r| r.property == p).cloned().collect())
            }
        }
    }

    /// Properties that define a unit with this name.
    pub fn properties_for_unit(&self, unit: &str) -> BTreeSet<String> {
        self.rows
            .iter()
            .filter(|r| r.name == unit)
            .map(|r| r.property.clone())
            .collect()
    }

    /// Properties that define both units.
    pub fn properties_for_unit_pair(&self, from: &str, to: &str) -> BTreeSet<String> {
        let from_props = self.properties_for_unit(from);
        let to_props = self.properties_for_unit(to);
        from_props.intersection(&to_props).cloned().collect()
    }

    /// Pick the property a conversion runs in.
    ///
    /// An explicit property is used as given (it must exist). Otherwise the
    /// unit pair must belong to exactly one property: none is
    /// `UnitsNotRelated`, several is `AmbiguousProperty`.
    pub fn select_property(&self, from: &str, to: &str, property: Option<&str>) -> Result<&UnitGraph> {
        if let Some(p) = property {
            return self.graph(p);
        }

        let candidates = self.properties_for_unit_pair(from, to);
        let mut iter = candidates.iter();
        match (iter.next(), iter.next()) {
            (Some(only), None) => self.graph(only),
            (None, _) => Err(Error::UnitsNotRelated {
                from: from.to_string(),
                to: to.to_string(),
            }),
            (Some(_), Some(_)) => Err(Error::AmbiguousProperty {
                from: from.to_string(),
                to: to.to_string(),
                candidates: candidates.iter().cloned().collect(),
            }),
        }
    }

    fn rebuild_rows(&mut self) {
        self.rows = self
            .graphs
            .values()
            .flat_map(|g| {
                g.units().iter().map(move |u| UnitRow {
                    name: u.name.clone(),
                    full_name: u.full_name.clone(),
                    property: g.property().to_string(),
                })
            })
            .collect();
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Add a unit to a registered property with one record linking it to a
    /// unit already in that property.
    pub fn add_unit(&mut self, property: &str, record: &ConversionRecord) -> Result<String> {
        let graph = self
            .graphs
            .get_mut(property)
            .ok_or_else(|| Error::PropertyNotFound(property.to_string()))?;
        let name = attach_unit(graph, record)?;
        self.rebuild_rows();
        Ok(name)
    }

    /// Optimize one property's graph.
    pub fn optimize(&mut self, property: &str) -> Result<OptimizeReport> {
        let graph = self
            .graphs
            .get_mut(property)
            .ok_or_else(|| Error::PropertyNotFound(property.to_string()))?;
        optimize::optimize(graph)
    }

    /// Optimize every graph; returns the summed report.
    pub fn optimize_all(&mut self) -> Result<OptimizeReport> {
        let mut total = OptimizeReport::default();
        for graph in self.graphs.values_mut() {
            let report = optimize::optimize(graph)?;
            total.pairs_examined += report.pairs_examined;
            total.edges_added += report.edges_added;
        }
        self.rebuild_rows();
        Ok(total)
    }
}

// ============================================================================
// Tests
// ============================================================================
