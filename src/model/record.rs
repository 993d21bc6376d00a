//! ConversionRecord — one row of a property's conversion table.

use serde::{Deserialize, Serialize};

use super::edge::is_valid_factor;
use crate::{Error, Result};

/// Number of columns in a tabular conversion row.
pub const RECORD_COLUMNS: usize = 5;

/// A known conversion factor: `value_in_unit_to = value_in_unit_from * factor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub unit_from: String,
    #[serde(default)]
    pub label_from: String,
    pub unit_to: String,
    #[serde(default)]
    pub label_to: String,
    pub factor: f64,
}

impl ConversionRecord {
    pub fn new(
        unit_from: impl Into<String>,
        label_from: impl Into<String>,
        unit_to: impl Into<String>,
        label_to: impl Into<String>,
        factor: f64,
    ) -> Self {
        Self {
            unit_from: unit_from.into(),
            label_from: label_from.into(),
            unit_to: unit_to.into(),
            label_to: label_to.into(),
            factor,
        }
    }

    /// Parse a `(unit_from, label_from, unit_to, label_to, factor)` text row.
    ///
    /// Fields are trimmed. A factor that does not parse as a number fails
    /// with `InvalidFactor`, same as a zero, negative or non-finite one.
    pub fn from_row(row: &[&str]) -> Result<Self> {
        let [unit_from, label_from, unit_to, label_to, factor] = row else {
            return Err(Error::InvalidRecord(format!(
                "expected {RECORD_COLUMNS} columns, got {}",
                row.len()
            )));
        };
        let (unit_from, unit_to) = (unit_from.trim(), unit_to.trim());
        let factor = factor.trim();

        let parsed: f64 = factor.parse().map_err(|_| Error::InvalidFactor {
            from: unit_from.to_string(),
            to: unit_to.to_string(),
            factor: factor.to_string(),
        })?;

        let record = Self::new(unit_from, label_from.trim(), unit_to, label_to.trim(), parsed);
        record.validate()?;
        Ok(record)
    }

    /// Check the record can become an edge pair.
    ///
    /// The factor must be finite and strictly positive; zero, negative,
    /// NaN and infinite factors fail with `InvalidFactor`.
    pub fn validate(&self) -> Result<()> {
        if self.unit_from.trim().is_empty() || self.unit_to.trim().is_empty() {
            return Err(Error::InvalidRecord(format!(
                "empty unit name in record {} -> {}",
                self.unit_from, self.unit_to
            )));
        }
        if self.unit_from == self.unit_to {
            return Err(Error::InvalidRecord(format!(
                "record converts unit '{}' to itself",
                self.unit_from
            )));
        }
        if !is_valid_factor(self.factor) {
            return Err(Error::InvalidFactor {
                from: self.unit_from.clone(),
                to: self.unit_to.clone(),
                factor: self.factor.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row() {
        let r = ConversionRecord::from_row(&["m", "meter", " ft ", "foot", "3.28084"]).unwrap();
        assert_eq!(r.unit_from, "m");
        assert_eq!(r.unit_to, "ft");
        assert_eq!(r.label_to, "foot");
        assert_eq!(r.factor, 3.28084);
    }

    #[test]
    fn test_from_row_non_numeric_factor() {
        let err = ConversionRecord::from_row(&["m", "meter", "ft", "foot", "three"]).unwrap_err();
        assert!(matches!(err, Error::InvalidFactor { ref factor, .. } if factor == "three"));
    }

    #[test]
    fn test_from_row_wrong_width() {
        let err = ConversionRecord::from_row(&["m", "ft", "3.2"]).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord(_)));
    }

    #[test]
    fn test_validate_rejects_zero_and_nan() {
        let zero = ConversionRecord::new("m", "", "ft", "", 0.0);
        assert!(matches!(zero.validate(), Err(Error::InvalidFactor { .. })));
        let nan = ConversionRecord::new("m", "", "ft", "", f64::NAN);
        assert!(matches!(nan.validate(), Err(Error::InvalidFactor { .. })));
    }

    #[test]
    fn test_validate_rejects_negative() {
        let r = ConversionRecord::new("m", "", "ft", "", -3.28084);
        assert!(matches!(r.validate(), Err(Error::InvalidFactor { .. })));
        let row = ConversionRecord::from_row(&["m", "meter", "ft", "foot", "-3.28084"]);
        assert!(matches!(row, Err(Error::InvalidFactor { .. })));
    }

    #[test]
    fn test_validate_rejects_self_loop() {
        let r = ConversionRecord::new("m", "", "m", "", 1.0);
        assert!(matches!(r.validate(), Err(Error::InvalidRecord(_))));
    }
}
