//! Edge — a directed conversion factor between two units.

use serde::{Deserialize, Serialize};

/// A directed, weighted edge: `value_in_to = value_in_from * factor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub factor: f64,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, factor: f64) -> Self {
        Self { from: from.into(), to: to.into(), factor }
    }

    /// The algebraic inverse (`to → from`, `1 / factor`).
    pub fn inverse(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            factor: 1.0 / self.factor,
        }
    }

    /// Convert a value expressed in `from` into `to`.
    pub fn apply(&self, value: f64) -> f64 {
        value * self.factor
    }
}

/// A factor is usable as an edge weight iff it is finite and strictly
/// positive. Multipliers between scales of one property are never negative.
pub fn is_valid_factor(factor: f64) -> bool {
    factor.is_finite() && factor > 0.0
}
