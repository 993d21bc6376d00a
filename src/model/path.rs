//! PathResult — a resolved multiplier and the units it was derived through.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Unit names along a resolved path. Real unit tables rarely need more
/// than a couple of hops, so short paths stay inline.
pub type UnitPath = SmallVec<[String; 4]>;

/// Multiplier plus the sequence of units traversed to derive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub multiplier: f64,
    /// Always has at least one element. Length 2 means a direct edge.
    pub path: UnitPath,
}

impl PathResult {
    /// `from == to`: multiplier 1, no edge traversed.
    pub fn identity(unit: impl Into<String>) -> Self {
        let mut path = UnitPath::new();
        path.push(unit.into());
        Self { multiplier: 1.0, path }
    }

    pub fn direct(from: impl Into<String>, to: impl Into<String>, factor: f64) -> Self {
        let mut path = UnitPath::new();
        path.push(from.into());
        path.push(to.into());
        Self { multiplier: factor, path }
    }

    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn is_direct(&self) -> bool {
        self.hops() == 1
    }

    pub fn start(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }

    pub fn end(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Extend the path by one edge, folding its weight into the multiplier.
    pub fn append(&mut self, unit: impl Into<String>, factor: f64) {
        self.path.push(unit.into());
        self.multiplier *= factor;
    }
}

impl std::fmt::Display for PathResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (x{})", self.path.join(" -> "), self.multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let p = PathResult::identity("m");
        assert_eq!(p.multiplier, 1.0);
        assert_eq!(p.hops(), 0);
        assert_eq!(p.start(), "m");
        assert_eq!(p.end(), "m");
    }

    #[test]
    fn test_append_composes() {
        let mut p = PathResult::direct("m", "ft", 2.0);
        assert!(p.is_direct());
        p.append("in", 12.0);
        assert_eq!(p.multiplier, 24.0);
        assert_eq!(p.hops(), 2);
        assert_eq!(p.to_string(), "m -> ft -> in (x24)");
    }
}
