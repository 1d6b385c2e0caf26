// src/declaration/mod.rs
//! Reconstruction and classification of the tables found in a financial
//! declaration PDF. Everything here is pure: the detector output goes in,
//! classified sections come out.

pub mod classify;
pub mod error;
pub mod merge;
pub mod template;
pub mod types;

pub use classify::{bracket_range, classify, strip_num_prefix};
pub use error::DeclarationError;
pub use merge::merge_continuations;
pub use template::{DocumentTemplate, RowLayout, SectionSpec};
pub use types::{
    Declaration, DeclarationEntry, IncomeRange, Legislator, LogicalTable, RawRow, RawTable,
};

use tracing::{debug, instrument};

/// Merge page continuations, then classify every section the template names.
#[instrument(level = "debug", skip_all, fields(tables = tables.len()))]
pub fn parse_declaration(
    tables: &[RawTable],
    template: &DocumentTemplate,
) -> Result<Declaration, DeclarationError> {
    let merged = merge_continuations(tables, template.page_top);

    let mut declaration = Declaration::new();
    for section in &template.sections {
        let table = merged
            .get(section.index)
            .ok_or_else(|| DeclarationError::MissingSection {
                key: section.key.clone(),
                index: section.index,
            })?;
        let entries = classify(table)?;
        debug!(section = %section.key, entries = entries.len(), "section parsed");
        declaration.insert(section.key.clone(), entries);
    }

    for skipped in &template.skipped {
        debug!(section = %skipped.key, index = skipped.index, "section skipped");
    }

    Ok(declaration)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(cells: &[&[&str]]) -> Vec<RawRow> {
        cells
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn header() -> Vec<RawRow> {
        rows(&[&["Description", "unpaid", "1", "2", "3", "4", "5"]])
    }

    fn fixture() -> Vec<RawTable> {
        let mut a = header();
        a.extend(rows(&[&["1. Board member ABC AG", "", "", "X", "", "", ""]]));
        let a_cont = rows(&[&["2. Advisor XYZ GmbH", "", "", "", "", "", "20000"]]);
        let b = rows(&[&["1. Occasional lectures", "X", "", "", "", ""]]);
        let mut c = header();
        c.extend(rows(&[&["1.", "", "", "", "", "", ""]]));
        let d = rows(&[&["1. Club 1. Chapter", "X", "", "", "", "", ""]]);
        let e = rows(&[&["1. Shares", "", "", "", "", "X", ""]]);
        let f = rows(&[&["1. Holdings, free text"]]);

        vec![
            RawTable::new(a, Some(310.2)),
            RawTable::new(a_cont, Some(749.6)),
            RawTable::new(b, Some(500.0)),
            RawTable::new(c, Some(200.0)),
            RawTable::new(d, Some(640.0)),
            RawTable::new(e, Some(120.0)),
            RawTable::new(f, Some(400.0)),
        ]
    }

    #[test]
    fn sections_by_position_after_merge() {
        let decl = parse_declaration(&fixture(), &DocumentTemplate::europarl()).unwrap();

        let keys: Vec<_> = decl.keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["article_42a", "article_42c", "article_42d", "article_42e"]
        );
        assert_eq!(
            decl["article_42a"],
            vec![
                DeclarationEntry {
                    description: "Board member ABC AG".into(),
                    income: IncomeRange::new(500, 1000),
                },
                DeclarationEntry {
                    description: "Advisor XYZ GmbH".into(),
                    income: IncomeRange::new(15000, 24999),
                },
            ]
        );
        assert!(decl["article_42c"].is_empty());
        assert_eq!(decl["article_42d"][0].description, "Club 1. Chapter");
        assert_eq!(decl["article_42e"][0].income, IncomeRange::new(5001, 10000));
        assert!(!decl.contains_key("article_42f"));
    }

    #[test]
    fn missing_section_fails() {
        let mut tables = fixture();
        tables.truncate(5);
        assert_eq!(
            parse_declaration(&tables, &DocumentTemplate::europarl()),
            Err(DeclarationError::MissingSection {
                key: "article_42e".into(),
                index: 4
            })
        );
    }

    #[test]
    fn bad_row_fails_whole_document() {
        let mut tables = fixture();
        tables[5].rows[0][5] = String::new();
        assert!(matches!(
            parse_declaration(&tables, &DocumentTemplate::europarl()),
            Err(DeclarationError::MalformedRow { .. })
        ));
    }

    #[test]
    fn legislator_json_shape() {
        let mut decl = Declaration::new();
        decl.insert(
            "article_42a".into(),
            vec![DeclarationEntry {
                description: "Lorem Ipsum".into(),
                income: IncomeRange::new(0, 0),
            }],
        );
        let mep = Legislator {
            id: "124831".into(),
            full_name: "Jane Doe".into(),
            group: "Group X".into(),
            country: "Malta".into(),
            party: "Party Y".into(),
            declaration: Some(decl),
        };
        let v = serde_json::to_value(&mep).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "id": "124831",
                "fullName": "Jane Doe",
                "group": "Group X",
                "country": "Malta",
                "party": "Party Y",
                "declaration": {
                    "article_42a": [{"description": "Lorem Ipsum", "income": [0, 0]}]
                }
            })
        );
        let back: Legislator = serde_json::from_value(v).unwrap();
        assert_eq!(back, mep);
    }
}
