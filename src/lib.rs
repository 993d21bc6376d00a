//! # unitgraph — Graph-Based Unit Conversion
//!
//! Converts values between units of the same physical property using only a
//! sparse set of known factors. Each property is a graph: units are nodes,
//! factors are weighted edges (stored with their inverses), and any missing
//! multiplier is composed along the shortest path.
//!
//! ## Design Principles
//!
//! 1. **Sparse input**: a new unit needs one factor to any existing unit
//! 2. **Direct edges are authoritative**: a stored factor always wins over a path
//! 3. **Optimization is explicit**: `optimize()` precomputes all pairs, never implicitly
//! 4. **Loader owns nothing**: `RecordSource` hands over records, the engine never does I/O
//!
//! ## Quick Start
//!
//! ```rust
//! use unitgraph::{ConversionRecord, EngineConfig, UnitConverter};
//!
//! # fn example() -> unitgraph::Result<()> {
//! let mut units = UnitConverter::new(EngineConfig::default());
//! units.add_property("length", &[
//!     ConversionRecord::new("m", "meter", "ft", "foot", 3.28084),
//!     ConversionRecord::new("ft", "foot", "in", "inch", 12.0),
//! ])?;
//!
//! let c = units.convert(1.0, "m", "in", None)?;
//! assert_eq!(c.property, "length");
//! assert_eq!(c.path.as_slice(), ["m", "ft", "in"]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Components
//!
//! | Component | Module | Description |
//! |-----------|--------|-------------|
//! | `UnitGraph` | `graph` | Weighted digraph for one property |
//! | `GraphBuilder` | `graph::builder` | Records → graph, inverses included |
//! | resolver | `resolve` | Direct edge or BFS-composed multiplier |
//! | optimizer | `optimize` | All-pairs direct edges |
//! | `PropertyRegistry` | `registry` | Property → graph, unit table |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod resolve;
pub mod optimize;
pub mod registry;
pub mod source;
pub mod config;
pub mod export;

use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Unit, UnitIx, Edge, PathResult, UnitPath,
    ConversionRecord, UnitRow,
};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use graph::{UnitGraph, GraphBuilder, Inconsistency, build_graph};
pub use optimize::OptimizeReport;
pub use registry::PropertyRegistry;
pub use source::{RecordSource, MemorySource};
pub use config::EngineConfig;
pub use export::GraphView;

// ============================================================================
// Query results
// ============================================================================

/// Result of `UnitConverter::convert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub result: f64,
    pub multiplier: f64,
    pub property: String,
    pub path: UnitPath,
}

/// Result of `UnitConverter::multiplier`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierResult {
    pub multiplier: f64,
    pub property: String,
    pub path: UnitPath,
}

// ============================================================================
// Top-level converter handle
// ============================================================================

/// The primary entry point. Owns a `PropertyRegistry` and answers
/// conversion queries against it.
#[derive(Debug, Clone, Default)]
pub struct UnitConverter {
    registry: PropertyRegistry,
    config: EngineConfig,
}

impl UnitConverter {
    /// An empty converter; add properties with `add_property`.
    pub fn new(config: EngineConfig) -> Self {
        Self { registry: PropertyRegistry::new(), config }
    }

    /// Build every property a source offers.
    ///
    /// All-or-nothing: the first invalid or disconnected table aborts the
    /// load. With `optimize_on_load` set, all graphs are optimized before
    /// returning.
    pub fn from_source<S: RecordSource>(source: &S, config: EngineConfig) -> Result<Self> {
        let mut converter = Self::new(config);
        let properties = source.properties()?;
        for property in &properties {
            let records = source.records(property)?;
            converter.add_property(property.as_str(), &records)?;
        }
        if converter.config.optimize_on_load {
            converter.optimize()?;
        }
        info!(
            source = %source.describe(),
            properties = properties.len(),
            units = converter.registry.units(None)?.len(),
            optimized = converter.config.optimize_on_load,
            "unit tables loaded"
        );
        Ok(converter)
    }

    /// Build and register one property from its records.
    pub fn add_property(&mut self, property: impl Into<String>, records: &[ConversionRecord]) -> Result<()> {
        let graph = build_graph(property, records)?;
        self.registry.register(graph)
    }

    /// Add a unit to an existing property via one factor to a known unit.
    pub fn add_unit(&mut self, property: &str, record: &ConversionRecord) -> Result<String> {
        self.registry.add_unit(property, record)
    }

    /// Convert `value` from one unit to another.
    ///
    /// Without `property`, the unit pair must identify exactly one property.
    pub fn convert(&self, value: f64, from: &str, to: &str, property: Option<&str>) -> Result<Conversion> {
        let m = self.multiplier(from, to, property)?;
        Ok(Conversion {
            result: value * m.multiplier,
            multiplier: m.multiplier,
            property: m.property,
            path: m.path,
        })
    }

    /// The multiplier converting `from` into `to`, and how it was derived.
    pub fn multiplier(&self, from: &str, to: &str, property: Option<&str>) -> Result<MultiplierResult> {
        let graph = self.registry.select_property(from, to, property)?;
        let PathResult { multiplier, path } = resolve::resolve(graph, from, to)?;
        Ok(MultiplierResult {
            multiplier,
            property: graph.property().to_string(),
            path,
        })
    }

    /// Unit rows, optionally for one property.
    pub fn units(&self, property: Option<&str>) -> Result<Vec<UnitRow>> {
        self.registry.units(property)
    }

    /// Registered property names, sorted.
    pub fn properties(&self) -> Vec<String> {
        self.registry.properties()
    }

    /// Precompute direct edges for every unit pair in every property.
    pub fn optimize(&mut self) -> Result<OptimizeReport> {
        self.registry.optimize_all()
    }

    /// Graph of one property, for inspection or export.
    pub fn graph(&self, property: &str) -> Result<&UnitGraph> {
        self.registry.graph(property)
    }

    /// Reciprocity violations across all properties, using the configured
    /// tolerance.
    pub fn check_consistency(&self) -> Vec<(String, Inconsistency)> {
        self.registry
            .graphs()
            .flat_map(|g| {
                g.check_consistency(self.config.tolerance)
                    .into_iter()
                    .map(move |i| (g.property().to_string(), i))
            })
            .collect()
    }

    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid factor {factor:?} for {from} -> {to}: must be a finite, positive number")]
    InvalidFactor { from: String, to: String, factor: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Property '{property}' is not connected; unreachable units: {unreachable:?}")]
    DisconnectedGraph { property: String, unreachable: Vec<String> },

    #[error("Unit '{unit}' not found in property '{property}'")]
    UnitNotFound { unit: String, property: String },

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    #[error("Property already registered: {0}")]
    DuplicateProperty(String),

    #[error("No path from '{from}' to '{to}' in property '{property}'")]
    NoPathFound { from: String, to: String, property: String },

    #[error("No property contains both '{from}' and '{to}'")]
    UnitsNotRelated { from: String, to: String },

    #[error("Units '{from}' and '{to}' exist in several properties {candidates:?}; specify one")]
    AmbiguousProperty { from: String, to: String, candidates: Vec<String> },

    #[error("Source error: {0}")]
    Source(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
