//! End-to-end integration tests for loading and property selection.
//!
//! Covers ambiguity between properties sharing unit names, connectivity
//! enforcement at load time, and source failures.

use pretty_assertions::assert_eq;
use unitgraph::{
    ConversionRecord, EngineConfig, Error, MemorySource, RecordSource, Result, UnitConverter,
};

// ============================================================================
// Helper: "ton" and "pound" exist as both mass and force.
// ============================================================================

fn mass_and_force() -> MemorySource {
    MemorySource::new()
        .with_table("mass", [
            ConversionRecord::new("ton", "short ton", "pound", "pound", 2000.0),
            ConversionRecord::new("kg", "kilogram", "pound", "pound", 2.20462),
        ])
        .with_table("force", [
            ConversionRecord::new("ton", "ton-force", "pound", "pound-force", 2240.0),
            ConversionRecord::new("N", "newton", "pound", "pound-force", 0.224809),
        ])
}

// ============================================================================
// 1. Ambiguous unit pair
// ============================================================================

#[test]
fn test_ambiguous_without_property() {
    let units = UnitConverter::from_source(&mass_and_force(), EngineConfig::default()).unwrap();

    let err = units.convert(1.0, "ton", "pound", None).unwrap_err();
    match err {
        Error::AmbiguousProperty { candidates, .. } => {
            assert_eq!(candidates, vec!["force", "mass"]);
        }
        other => panic!("expected AmbiguousProperty, got {other:?}"),
    }
}

#[test]
fn test_explicit_property_disambiguates() {
    let units = UnitConverter::from_source(&mass_and_force(), EngineConfig::default()).unwrap();

    let mass = units.convert(1.0, "ton", "pound", Some("mass")).unwrap();
    assert_eq!(mass.result, 2000.0);
    assert_eq!(mass.property, "mass");

    let force = units.convert(1.0, "ton", "pound", Some("force")).unwrap();
    assert_eq!(force.result, 2240.0);
    assert_eq!(force.property, "force");
}

#[test]
fn test_unique_pair_needs_no_property() {
    let units = UnitConverter::from_source(&mass_and_force(), EngineConfig::default()).unwrap();
    let c = units.convert(1.0, "kg", "ton", None).unwrap();
    assert_eq!(c.property, "mass");
    assert_eq!(c.path.as_slice(), ["kg", "pound", "ton"]);
}

#[test]
fn test_unit_pair_candidates() {
    let units = UnitConverter::from_source(&mass_and_force(), EngineConfig::default()).unwrap();
    let registry = units.registry();
    assert_eq!(registry.properties_for_unit("pound").len(), 2);
    assert!(registry.properties_for_unit_pair("N", "kg").is_empty());
    assert_eq!(units.properties(), vec!["force", "mass"]);
}

// ============================================================================
// 2. Connectivity enforcement
// ============================================================================

#[test]
fn test_disconnected_table_fails_load() {
    let source = mass_and_force().with_table("volume", [
        ConversionRecord::new("l", "liter", "ml", "milliliter", 1000.0),
        ConversionRecord::new("gal", "gallon", "qt", "quart", 4.0),
    ]);

    let err = UnitConverter::from_source(&source, EngineConfig::default()).unwrap_err();
    match err {
        Error::DisconnectedGraph { property, unreachable } => {
            assert_eq!(property, "volume");
            assert_eq!(unreachable, vec!["gal", "qt"]);
        }
        other => panic!("expected DisconnectedGraph, got {other:?}"),
    }
}

#[test]
fn test_invalid_row_fails_before_load() {
    let mut source = MemorySource::new();
    let err = source
        .insert_row("length", &["m", "meter", "ft", "foot", "0"])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidFactor { .. }));
}

// ============================================================================
// 3. Source failures propagate
// ============================================================================

struct BrokenSource;

impl RecordSource for BrokenSource {
    fn properties(&self) -> Result<Vec<String>> {
        Ok(vec!["length".into()])
    }

    fn records(&self, property: &str) -> Result<Vec<ConversionRecord>> {
        Err(Error::Source(format!("table for '{property}' is unreadable")))
    }
}

#[test]
fn test_source_error_aborts_load() {
    let err = UnitConverter::from_source(&BrokenSource, EngineConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Source(ref msg) if msg.contains("length")));
}

#[test]
fn test_source_by_reference() {
    let source = mass_and_force();
    let by_ref: &MemorySource = &source;
    let units = UnitConverter::from_source(&by_ref, EngineConfig::default()).unwrap();
    assert_eq!(units.properties().len(), 2);
}
