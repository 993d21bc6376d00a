//! In-memory record source.
//!
//! This is the reference implementation of `RecordSource`. Tables are held
//! as plain record vectors keyed by property name, in insertion order.
//!
//! Use this source for:
//! - Tests of the builder, resolver, optimizer and registry
//! - Embedding unitgraph with compiled-in unit tables
//! - Feeding records that a caller parsed from its own file format

use crate::model::ConversionRecord;
use crate::{Error, Result};
use super::RecordSource;

// ============================================================================
// MemorySource
// ============================================================================

/// Conversion tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: Vec<(String, Vec<ConversionRecord>)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records to a property's table, creating it if needed.
    pub fn with_table(
        mut self,
        property: impl Into<String>,
        records: impl IntoIterator<Item = ConversionRecord>,
    ) -> Self {
        self.insert(property, records);
        self
    }

    pub fn insert(
        &mut self,
        property: impl Into<String>,
        records: impl IntoIterator<Item = ConversionRecord>,
    ) {
        let property = property.into();
        match self.tables.iter_mut().find(|(name, _)| *name == property) {
            Some((_, table)) => table.extend(records),
            None => self.tables.push((property, records.into_iter().collect())),
        }
    }

    /// Append a text row, parsed with `ConversionRecord::from_row`.
    pub fn insert_row(&mut self, property: impl Into<String>, row: &[&str]) -> Result<()> {
        let record = ConversionRecord::from_row(row)?;
        self.insert(property, [record]);
        Ok(())
    }
}

impl RecordSource for MemorySource {
    fn properties(&self) -> Result<Vec<String>> {
        Ok(self.tables.iter().map(|(name, _)| name.clone()).collect())
    }

    fn records(&self, property: &str) -> Result<Vec<ConversionRecord>> {
        self.tables
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, table)| table.clone())
            .ok_or_else(|| Error::PropertyNotFound(property.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
