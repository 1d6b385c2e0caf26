// src/declaration/classify.rs

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::error::DeclarationError;
use super::template::RowLayout;
use super::types::{DeclarationEntry, IncomeRange, RawRow};

static NUM_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("numeric prefix pattern should compile"));
static BODY_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.").expect("body row pattern should compile"));

/// Highest bracket; its column carries the declared amount instead of a mark.
pub const TOP_CATEGORY: u8 = 5;
/// Amount at which the top bracket starts being amount-qualified.
const TOP_FLOOR: i64 = 10_000;

/// A row's bracket, with the declared amount for the top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub category: u8,
    pub amount: Option<i64>,
}

/// Remove a leading `"<digits>."` and the whitespace after it.
/// Numbering further into the text is left alone.
pub fn strip_num_prefix(description: &str) -> &str {
    match NUM_PREFIX.find(description) {
        Some(m) => &description[m.end()..],
        None => description,
    }
}

/// Numbered rows are declarations; everything else is header, title or footer.
pub fn is_body_row(row: &RawRow) -> bool {
    row.first().map_or(false, |d| BODY_ROW.is_match(d))
}

/// A numbered row with nothing written after the number.
pub fn is_blank_row(row: &RawRow) -> bool {
    row.first()
        .map_or(true, |d| strip_num_prefix(d).trim().is_empty())
}

/// Income bounds for a bracket. `None` if the combination is not defined.
pub fn bracket_range(category: u8, amount: Option<i64>) -> Option<IncomeRange> {
    match category {
        0 => Some(IncomeRange::new(0, 0)),
        1 => Some(IncomeRange::new(1, 499)),
        2 => Some(IncomeRange::new(500, 1000)),
        3 => Some(IncomeRange::new(1001, 5000)),
        4 => Some(IncomeRange::new(5001, 10000)),
        TOP_CATEGORY => match amount {
            None => Some(IncomeRange::new(10_001, 14_999)),
            Some(a) if a == TOP_FLOOR => Some(IncomeRange::new(10_001, 14_999)),
            Some(a) if a > TOP_FLOOR => Some(IncomeRange::new(a - 5000, a.checked_add(4999)?)),
            Some(_) => None,
        },
        _ => None,
    }
}

/// Read the bracket off the first populated indicator column.
pub fn bracket_for_row(row: &RawRow) -> Result<Bracket, DeclarationError> {
    let description = row.first().cloned().unwrap_or_default();
    let layout =
        RowLayout::from_width(row.len()).ok_or_else(|| DeclarationError::UnexpectedWidth {
            description: description.clone(),
            width: row.len(),
        })?;

    let (offset, cell) = row[1..]
        .iter()
        .enumerate()
        .find(|(_, v)| !v.trim().is_empty())
        .ok_or_else(|| DeclarationError::MalformedRow {
            description: description.clone(),
        })?;

    // offset < 6 for both layouts, so this fits and tops out at TOP_CATEGORY
    let category = layout.lowest_category() + offset as u8;
    if category != TOP_CATEGORY {
        return Ok(Bracket {
            category,
            amount: None,
        });
    }

    let raw = cell.trim();
    let amount = raw
        .parse::<i64>()
        .map_err(|_| DeclarationError::InvalidAmount {
            description,
            raw: raw.to_string(),
        })?;
    Ok(Bracket {
        category,
        amount: Some(amount),
    })
}

/// Turn one data row into an entry.
pub fn classify_row(row: &RawRow) -> Result<DeclarationEntry, DeclarationError> {
    let bracket = bracket_for_row(row)?;
    let description = strip_num_prefix(&row[0]).trim_end().to_string();
    let income = bracket_range(bracket.category, bracket.amount).ok_or_else(|| {
        DeclarationError::AmountOutOfRange {
            description: description.clone(),
            amount: bracket.amount.unwrap_or_default(),
        }
    })?;
    trace!(%description, category = bracket.category, "classified row");
    Ok(DeclarationEntry {
        description,
        income,
    })
}

/// Classify every declaration row of a merged table, in row order.
///
/// Header and blank numbered rows are dropped. Any other row that cannot be
/// classified fails the whole table.
pub fn classify(table: &[RawRow]) -> Result<Vec<DeclarationEntry>, DeclarationError> {
    let entries = table
        .iter()
        .filter(|row| is_body_row(row))
        .filter(|row| !is_blank_row(row))
        .map(classify_row)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(rows = table.len(), entries = entries.len(), "classified table");
    Ok(entries)
}
