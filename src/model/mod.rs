//! # Unit Graph Model
//!
//! Plain DTOs shared by the builder, resolver, optimizer, registry and the
//! export layer. These types cross every boundary: loader ↔ engine ↔ caller.
//!
//! Design rule: pure data — no I/O, no graph state.

pub mod unit;
pub mod edge;
pub mod path;
pub mod record;

use serde::{Deserialize, Serialize};

pub use unit::{Unit, UnitIx};
pub use edge::{Edge, is_valid_factor};
pub use path::{PathResult, UnitPath};
pub use record::{ConversionRecord, RECORD_COLUMNS};

/// One row of the cross-property unit table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitRow {
    pub name: String,
    pub full_name: Option<String>,
    pub property: String,
}
