//! Unit — a named measurement scale inside one property graph.

use serde::{Deserialize, Serialize};

/// Dense index of a unit inside its owning `UnitGraph`.
///
/// Indices are only meaningful for the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitIx(pub usize);

impl std::fmt::Display for UnitIx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Short name, unique within its property (e.g. `"ft"`).
    pub name: String,
    /// Display name (e.g. `"foot"`), if the source table supplied one.
    pub full_name: Option<String>,
}

impl Unit {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), full_name: None }
    }

    /// Attach a display name. Blank labels are treated as absent.
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        self.full_name = if full_name.trim().is_empty() { None } else { Some(full_name) };
        self
    }

    /// Display name if known, short name otherwise.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.name)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.full_name {
            Some(full) => write!(f, "{} ({})", self.name, full),
            None => write!(f, "{}", self.name),
        }
    }
}
