// src/declaration/merge.rs

use tracing::{debug, trace};

use super::types::{LogicalTable, RawTable};

/// Glue tables that the detector split at page breaks back together.
///
/// A table whose first cell sits at `page_top` continues the table right before
/// it, which by then already holds any earlier fragments. Chains therefore fold
/// left to right, one step at a time. Row order is never changed and the first
/// table is never treated as a fragment.
pub fn merge_continuations(tables: &[RawTable], page_top: f64) -> Vec<LogicalTable> {
    let mut merged: Vec<LogicalTable> = Vec::with_capacity(tables.len());

    for (index, table) in tables.iter().enumerate() {
        if index > 0 && starts_at_page_top(table, page_top) {
            if let Some(prev) = merged.last_mut() {
                trace!(index, rows = table.rows.len(), "continuation fragment");
                prev.extend(table.rows.iter().cloned());
                continue;
            }
        }
        merged.push(table.rows.clone());
    }

    debug!(
        detected = tables.len(),
        logical = merged.len(),
        "merged page continuations"
    );
    merged
}

fn starts_at_page_top(table: &RawTable, page_top: f64) -> bool {
    table
        .first_cell_top()
        .map(|top| top.trunc() == page_top.trunc())
        .unwrap_or(false)
}
