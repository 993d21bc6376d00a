//! Graph export — hand unit graphs to renderers and graph databases.
//!
//! Two shapes:
//!
//! ```text
//! UnitGraph       → GraphView → export_json()        → renderer input
//! PropertyRegistry → export_cypher_dump() → CREATE/MATCH statements
//!   → paste into Neo4j Browser to inspect the conversion network
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::graph::UnitGraph;
use crate::model::{Edge, Unit};
use crate::registry::PropertyRegistry;
use crate::Result;

// ============================================================================
// GraphView
// ============================================================================

/// Node and weighted-edge lists of one property graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub property: String,
    pub units: Vec<Unit>,
    pub edges: Vec<Edge>,
}

impl GraphView {
    pub fn of(graph: &UnitGraph) -> Self {
        Self {
            property: graph.property().to_string(),
            units: graph.units().to_vec(),
            edges: graph.edges(),
        }
    }

    /// Edges with `from < to` by unit order, one per inverse pair.
    /// Renderers that draw undirected lines want these.
    pub fn forward_edges(&self) -> impl Iterator<Item = &Edge> {
        let position = |name: &str| self.units.iter().position(|u| u.name == name);
        self.edges.iter().filter(move |e| position(&e.from) < position(&e.to))
    }
}

/// Write a graph as pretty-printed `GraphView` JSON.
pub fn export_json(graph: &UnitGraph, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &GraphView::of(graph))?;
    writeln!(writer)?;
    Ok(())
}

// ============================================================================
// Cypher dump
// ============================================================================

/// Export every registered property as a Cypher script.
///
/// Units become `(:Unit {name, full_name, property})` nodes and every
/// directed edge a `[:CONVERTS_TO {factor}]` relationship.
pub fn export_cypher_dump(registry: &PropertyRegistry, writer: &mut dyn Write) -> Result<()> {
    // Header
    writeln!(writer, "// unitgraph Cypher DUMP")?;
    writeln!(writer, "// Properties: {}", registry.len())?;
    writeln!(writer)?;

    for graph in registry.graphs() {
        writeln!(
            writer,
            "// {}: {} units, {} edges",
            graph.property(),
            graph.len(),
            graph.edge_count()
        )?;

        for unit in graph.units() {
            let full_name = match &unit.full_name {
                Some(f) => format!(", full_name: {}", quote(f)),
                None => String::new(),
            };
            writeln!(
                writer,
                "CREATE (:Unit {{name: {}{}, property: {}}});",
                quote(&unit.name),
                full_name,
                quote(graph.property()),
            )?;
        }

        for edge in graph.edges() {
            writeln!(
                writer,
                "MATCH (a:Unit {{name: {from}, property: {p}}}), (b:Unit {{name: {to}, property: {p}}}) \
                 CREATE (a)-[:CONVERTS_TO {{factor: {factor:?}}}]->(b);",
                from = quote(&edge.from),
                to = quote(&edge.to),
                p = quote(graph.property()),
                factor = edge.factor,
            )?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Format a string as a Cypher literal.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::model::ConversionRecord;

    fn length() -> UnitGraph {
        build_graph("length", &[ConversionRecord::new("m", "meter", "ft", "foot", 2.0)]).unwrap()
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("ft"), "'ft'");
        assert_eq!(quote("o'clock"), "'o\\'clock'");
    }

    #[test]
    fn test_view_forward_edges() {
        let view = GraphView::of(&length());
        assert_eq!(view.units.len(), 2);
        assert_eq!(view.edges.len(), 2);
        let forward: Vec<_> = view.forward_edges().collect();
        assert_eq!(forward, vec![&Edge::new("m", "ft", 2.0)]);
    }

    #[test]
    fn test_export_json_roundtrip() {
        let mut buf = Vec::new();
        export_json(&length(), &mut buf).unwrap();
        let view: GraphView = serde_json::from_slice(&buf).unwrap();
        assert_eq!(view, GraphView::of(&length()));
    }

    #[test]
    fn test_cypher_dump() {
        let mut reg = PropertyRegistry::new();
        reg.register(length()).unwrap();
        let mut buf = Vec::new();
        export_cypher_dump(&reg, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.contains("CREATE (:Unit {name: 'm', full_name: 'meter', property: 'length'});"));
        assert!(out.contains("CREATE (a)-[:CONVERTS_TO {factor: 2.0}]->(b);"));
        assert!(out.contains("CREATE (a)-[:CONVERTS_TO {factor: 0.5}]->(b);"));
    }
}
