//! # Record Source Trait
//!
//! The contract between unitgraph and whatever locates conversion tables.
//! The engine never touches storage directly: a source names its properties
//! and hands over clean `ConversionRecord` lists, one property at a time.
//!
//! ## Implementations
//!
//! | Source | Module | Description |
//! |--------|--------|-------------|
//! | `MemorySource` | `memory` | In-process tables for embedding/testing |
//!
//! File- or folder-backed loaders live in the embedding application and
//! implement `RecordSource`; `ConversionRecord::from_row` gives them the
//! same factor parsing the engine uses.

pub mod memory;

use crate::model::ConversionRecord;
use crate::Result;

pub use memory::MemorySource;

// ============================================================================
// RecordSource Trait
// ============================================================================

/// Supplies the conversion tables for a set of properties.
pub trait RecordSource {
    /// Names of the properties this source can supply.
    fn properties(&self) -> Result<Vec<String>>;

    /// The conversion table for one property.
    ///
    /// Unknown properties fail with `PropertyNotFound`.
    fn records(&self, property: &str) -> Result<Vec<ConversionRecord>>;

    /// Short description for log lines.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().rsplit("::").next().unwrap_or("source").to_string()
    }
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn properties(&self) -> Result<Vec<String>> {
        (**self).properties()
    }

    fn records(&self, property: &str) -> Result<Vec<ConversionRecord>> {
        (**self).records(property)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
