//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Default relative tolerance for reciprocal-edge checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Settings applied when a `UnitConverter` is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Run the optimizer over every property right after loading.
    pub optimize_on_load: bool,
    /// Relative tolerance for `UnitGraph::check_consistency`.
    pub tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { optimize_on_load: false, tolerance: DEFAULT_TOLERANCE }
    }
}

impl EngineConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn optimized(mut self) -> Self {
        self.optimize_on_load = true;
        self
    }
}
