//! GraphBuilder — turns a property's conversion table into a `UnitGraph`.
//!
//! Each record contributes the edge `from → to` and its inverse. The
//! builder does not check connectivity; `PropertyRegistry::register` does.

use hashbrown::HashSet;
use tracing::{debug, warn};

use super::UnitGraph;
use crate::model::{ConversionRecord, Unit, UnitIx};
use crate::{Error, Result};

/// Incremental builder for one property's graph.
#[derive(Debug)]
pub struct GraphBuilder {
    graph: UnitGraph,
    /// Units whose display name came from a "from" column. Those labels are
    /// final; labels picked up from a "to" column are provisional.
    labeled_from: HashSet<UnitIx>,
}

impl GraphBuilder {
    pub fn new(property: impl Into<String>) -> Self {
        Self { graph: UnitGraph::new(property), labeled_from: HashSet::new() }
    }

    /// Add one record (edge plus inverse).
    ///
    /// A record repeating a pair that is already known, in either
    /// direction, keeps the first factor and is otherwise ignored.
    pub fn add_record(&mut self, record: &ConversionRecord) -> Result<&mut Self> {
        record.validate()?;

        let from = self.label_from(&record.unit_from, &record.label_from);
        let to = self.graph.ensure_unit(
            Unit::new(record.unit_to.as_str()).with_full_name(record.label_to.as_str()),
        );

        if self.graph.weight(from, to).is_some() || self.graph.weight(to, from).is_some() {
            warn!(
                property = self.graph.property(),
                from = %record.unit_from,
                to = %record.unit_to,
                factor = record.factor,
                "duplicate conversion record ignored"
            );
            return Ok(self);
        }

        self.graph.insert_edge(from, to, record.factor);
        self.graph.insert_edge(to, from, 1.0 / record.factor);
        debug!(
            property = self.graph.property(),
            from = %record.unit_from,
            to = %record.unit_to,
            factor = record.factor,
            "edge pair inserted"
        );
        Ok(self)
    }

    pub fn add_records<'r>(
        &mut self,
        records: impl IntoIterator<Item = &'r ConversionRecord>,
    ) -> Result<&mut Self> {
        for record in records {
            self.add_record(record)?;
        }
        Ok(self)
    }

    pub fn build(self) -> UnitGraph {
        self.graph
    }

    /// Resolve the unit in a "from" column, applying the first-from label rule.
    fn label_from(&mut self, name: &str, label: &str) -> UnitIx {
        let candidate = Unit::new(name).with_full_name(label);
        let existed = self.graph.contains(name);
        let ix = self.graph.ensure_unit(candidate.clone());

        if self.labeled_from.insert(ix) {
            // A blank from-label does not erase a provisional one.
            if existed && candidate.full_name.is_some() {
                self.graph.set_full_name(ix, candidate.full_name);
            }
        } else if candidate.full_name.is_some()
            && candidate.full_name != self.graph.unit_at(ix).full_name
        {
            warn!(
                property = self.graph.property(),
                unit = name,
                kept = ?self.graph.unit_at(ix).full_name,
                ignored = ?candidate.full_name,
                "conflicting display name ignored"
            );
        }
        ix
    }
}

/// Build a property graph from its full record list.
pub fn build_graph(property: impl Into<String>, records: &[ConversionRecord]) -> Result<UnitGraph> {
    let mut builder = GraphBuilder::new(property);
    builder.add_records(records)?;
    Ok(builder.build())
}

/// Attach a new unit to an existing graph with a single record.
///
/// Exactly one end of `record` must already be in the graph; the other end
/// is the new unit. Returns the new unit's name.
pub fn attach_unit(graph: &mut UnitGraph, record: &ConversionRecord) -> Result<String> {
    record.validate()?;

    let (known, new_name, new_label) =
        match (graph.contains(&record.unit_from), graph.contains(&record.unit_to)) {
            (true, false) => (&record.unit_from, &record.unit_to, &record.label_to),
            (false, true) => (&record.unit_to, &record.unit_from, &record.label_from),
            (true, true) => {
                return Err(Error::InvalidRecord(format!(
                    "units '{}' and '{}' both exist in '{}'; nothing new to attach",
                    record.unit_from,
                    record.unit_to,
                    graph.property()
                )));
            }
            (false, false) => {
                return Err(Error::DisconnectedGraph {
                    property: graph.property().to_string(),
                    unreachable: vec![record.unit_from.clone(), record.unit_to.clone()],
                });
            }
        };

    graph.ensure_unit(Unit::new(new_name.as_str()).with_full_name(new_label.as_str()));
    graph.add_edge_pair(&record.unit_from, &record.unit_to, record.factor)?;
    debug!(property = graph.property(), unit = %new_name, via = %known, "unit attached");
    Ok(new_name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(from: &str, lf: &str, to: &str, lt: &str, factor: f64) -> ConversionRecord {
        ConversionRecord::new(from, lf, to, lt, factor)
    }

    #[test]
    fn test_build_inserts_inverse() {
        let g = build_graph("length", &[rec("m", "meter", "ft", "foot", 3.28084)]).unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.direct_factor("ft", "m"), Some(1.0 / 3.28084));
    }

    #[test]
    fn test_first_from_label_wins() {
        let g = build_graph("length", &[
            rec("ft", "", "m", "metre", 0.3048),
            rec("m", "meter", "km", "kilometer", 0.001),
            rec("m", "METER", "cm", "centimeter", 100.0),
        ])
        .unwrap();
        // "metre" was provisional (to-column); first from-column label replaces it.
        assert_eq!(g.unit("m").unwrap().full_name.as_deref(), Some("meter"));
        assert_eq!(g.unit("ft").unwrap().full_name, None);
    }

    #[test]
    fn test_duplicate_pair_keeps_first_factor() {
        let g = build_graph("length", &[
            rec("m", "", "ft", "", 3.28084),
            rec("ft", "", "m", "", 0.5),
        ])
        .unwrap();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.direct_factor("m", "ft"), Some(3.28084));
    }

    #[test]
    fn test_invalid_factor_fails() {
        let err = build_graph("length", &[rec("m", "", "ft", "", 0.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidFactor { .. }));
    }

    #[test]
    fn test_builder_does_not_check_connectivity() {
        let g = build_graph("length", &[
            rec("m", "", "ft", "", 3.28084),
            rec("kg", "", "lb", "", 2.20462),
        ])
        .unwrap();
        assert!(!g.is_weakly_connected());
    }

    #[test]
    fn test_attach_unit() {
        let mut g = build_graph("length", &[rec("m", "meter", "ft", "foot", 3.28084)]).unwrap();
        let name = attach_unit(&mut g, &rec("yd", "yard", "ft", "foot", 3.0)).unwrap();
        assert_eq!(name, "yd");
        assert_eq!(g.unit("yd").unwrap().display_name(), "yard");
        assert_eq!(g.direct_factor("ft", "yd"), Some(1.0 / 3.0));
        assert!(g.is_weakly_connected());
    }

    #[test]
    fn test_attach_unit_requires_exactly_one_known_end() {
        let mut g = build_graph("length", &[rec("m", "", "ft", "", 3.28084)]).unwrap();
        assert!(matches!(
            attach_unit(&mut g, &rec("m", "", "ft", "", 3.0)),
            Err(Error::InvalidRecord(_))
        ));
        assert!(matches!(
            attach_unit(&mut g, &rec("mi", "", "km", "", 1.609)),
            Err(Error::DisconnectedGraph { .. })
        ));
        assert_eq!(g.len(), 2);
    }
}
