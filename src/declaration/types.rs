// src/declaration/types.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of cells as emitted by the table detector.
/// Column 0 is the description, the rest are bracket-indicator columns.
pub type RawRow = Vec<String>;

/// Rows of one declaration table after page-continuation fragments were merged.
pub type LogicalTable = Vec<RawRow>;

/// A table as reported by the detector for a single page region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Cell text, in reading order.
    #[serde(default)]
    pub rows: Vec<RawRow>,
    /// Top edge of the first detected cell, in PDF points.
    /// `None` when the detector found no cells.
    #[serde(default)]
    pub top: Option<f64>,
}

impl RawTable {
    pub fn new(rows: Vec<RawRow>, top: Option<f64>) -> Self {
        Self { rows, top }
    }

    /// Top coordinate of the first cell, if the table has any rows at all.
    pub fn first_cell_top(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        self.top
    }
}

/// Inclusive income bounds in EUR, serialized as `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct IncomeRange {
    pub lower: i64,
    pub upper: i64,
}

impl IncomeRange {
    pub const fn new(lower: i64, upper: i64) -> Self {
        Self { lower, upper }
    }
}

impl From<[i64; 2]> for IncomeRange {
    fn from([lower, upper]: [i64; 2]) -> Self {
        Self { lower, upper }
    }
}

impl From<IncomeRange> for [i64; 2] {
    fn from(r: IncomeRange) -> Self {
        [r.lower, r.upper]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationEntry {
    pub description: String,
    pub income: IncomeRange,
}

/// Section key (e.g. `article_42a`) to its classified entries, in key order.
pub type Declaration = BTreeMap<String, Vec<DeclarationEntry>>;

/// A member of parliament as listed on the public index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legislator {
    pub id: String,
    pub full_name: String,
    pub group: String,
    pub country: String,
    pub party: String,
    pub declaration: Option<Declaration>,
}
