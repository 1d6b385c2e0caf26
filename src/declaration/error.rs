// src/declaration/error.rs

use thiserror::Error;

/// Failures raised while turning detector output into declaration entries.
/// None of these are recovered from locally; a document either parses fully or not at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeclarationError {
    /// A data row carries no mark in any bracket column.
    #[error("row {description:?} has no bracket column populated")]
    MalformedRow { description: String },

    /// The top-bracket amount is not an integer.
    #[error("row {description:?} has unparseable amount {raw:?}")]
    InvalidAmount { description: String, raw: String },

    /// The top-bracket amount lies below the bracket floor.
    #[error("row {description:?} declares {amount}, below the top bracket floor")]
    AmountOutOfRange { description: String, amount: i64 },

    /// The row width matches no known bracket layout.
    #[error("row {description:?} has {width} columns, expected 6 or 7")]
    UnexpectedWidth { description: String, width: usize },

    /// The document yielded fewer tables than the template expects.
    #[error("section {key} expected at table #{index}, document has fewer tables")]
    MissingSection { key: String, index: usize },
}
