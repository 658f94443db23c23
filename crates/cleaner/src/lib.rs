//! # Pitch Sheet Cleaner
//!
//! Turns the raw pitch sheet into an immutable `Dataset` of typed records.
//!
//! ## Architectural Principles
//!
//! - **Pure stages:** every step consumes its input table and returns a new one
//!   plus a small report. Nothing is mutated once `clean` returns.
//! - **Lenient cells, strict schema:** a cell that cannot be parsed becomes
//!   missing, but a missing required column aborts with the column's name.
//!
//! ## Stages
//!
//! 1. `load_table` - read the CSV export (polars) or workbook (calamine), every cell as text.
//! 2. `normalize_columns` - canonical lowercase, underscore-separated headers.
//! 3. `drop_duplicates` - remove exact duplicate rows, first one wins.
//! 4. `coerce_numeric_columns` - strip `₹`, `,` and `%` from numeric-like columns.
//! 5. `resolve_deal_flag_source` / `derive_deal_flags` - the 0/1 deal indicator.
//! 6. `bind_records` - schema check and conversion to `PitchRecord`s.

pub mod coerce;
pub mod deal_flag;
pub mod error;
pub mod loader;
pub mod schema;
pub mod table;

use core_types::{Dataset, DealFlagSource};
use serde::Serialize;
use std::path::Path;

pub use coerce::{CoercionReport, ColumnCoercion, coerce_numeric_columns};
pub use deal_flag::{DealFlagConflict, DealFlags, derive_deal_flags, resolve_deal_flag_source};
pub use error::CleanerError;
pub use loader::{
    ColumnRename, canonical_name, drop_duplicates, load_csv, load_table, load_workbook,
    normalize_columns,
};
pub use schema::bind_records;
pub use table::{MissingCount, RawTable, TypedTable, missing_summary};

/// Everything the cleaning phase noticed on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    pub renamed_columns: Vec<ColumnRename>,
    pub rows_read: usize,
    pub duplicates_removed: usize,
    pub missing_values: Vec<MissingCount>,
    pub coercion: CoercionReport,
    pub deal_flag_source: DealFlagSource,
    pub deal_flag_conflicts: Vec<DealFlagConflict>,
}

/// Runs every cleaning stage over an already loaded table.
pub fn clean(raw: RawTable) -> Result<(Dataset, CleaningReport), CleanerError> {
    let (table, renamed_columns) = normalize_columns(raw);
    let rows_read = table.height();
    let (table, duplicates_removed) = drop_duplicates(table);
    let missing_values = missing_summary(&table);

    let (typed, coercion) = coerce_numeric_columns(table);
    if coercion.total_failed() > 0 {
        tracing::warn!(
            cells = coercion.total_failed(),
            "Some cells could not be read as numbers and are treated as missing."
        );
    }
    if typed.height() > 0 {
        for column in coercion.fully_missing() {
            tracing::warn!(column, "Column holds no numeric value after coercion.");
        }
    }

    let source = resolve_deal_flag_source(&typed);
    let deal_flags = derive_deal_flags(&typed, source)?;
    let deal_flag_source = deal_flags.source.clone();
    let deal_flag_conflicts = deal_flags.conflicts.clone();

    let dataset = bind_records(&typed, deal_flags)?;

    tracing::info!(
        rows_read,
        duplicates_removed,
        records = dataset.len(),
        "Cleaning complete."
    );

    Ok((
        dataset,
        CleaningReport {
            renamed_columns,
            rows_read,
            duplicates_removed,
            missing_values,
            coercion,
            deal_flag_source,
            deal_flag_conflicts,
        },
    ))
}

/// Loads the sheet at `path` and cleans it.
pub fn load_and_clean(path: &Path) -> Result<(Dataset, CleaningReport), CleanerError> {
    clean(load_table(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [&str; 13] = [
        "Episode Number",
        "Pitch Number",
        "Brand Name",
        "Pitcher Ask Amount",
        "Ask Valuation",
        "Ask Equity",
        "Deal",
        "Deal Amount",
        "Deal Valuation",
        "Deal Equity",
        "Amount Per Shark",
        "Ashneer Deal",
        "Peyush Deal",
    ];

    fn raw(rows: Vec<[&str; 13]>) -> RawTable {
        RawTable::new(
            HEADER.iter().map(|h| h.to_string()).collect(),
            rows.into_iter()
                .map(|r| {
                    r.iter()
                        .map(|c| (!c.is_empty()).then(|| c.to_string()))
                        .collect()
                })
                .collect(),
        )
    }

    #[test]
    fn yes_no_sheet_cleans_into_deal_flags() {
        let table = raw(vec![
            ["1", "1", "Acme", "₹10,00,000", "₹1,00,00,000", "10%", "Yes", "₹10,00,000", "₹1,00,00,000", "10%", "₹5,00,000", "1", "1"],
            ["1", "2", "Beta", "₹5,00,000", "₹50,00,000", "10%", "No", "", "", "", "", "0", "0"],
            ["1", "2", "Beta", "₹5,00,000", "₹50,00,000", "10%", "No", "", "", "", "", "0", "0"],
        ]);

        let (dataset, report) = clean(table).unwrap();

        assert_eq!(report.rows_read, 3);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(
            report.deal_flag_source,
            DealFlagSource::ExplicitColumn {
                column: "deal".into()
            }
        );
        assert!(report.deal_flag_conflicts.is_empty());
        assert!(report.renamed_columns.iter().any(|r| r.canonical == "pitcher_ask_amount"));

        let flags: Vec<bool> = dataset.records().iter().map(|r| r.deal_flag).collect();
        assert_eq!(flags, vec![true, false]);
        assert_eq!(dataset.records()[0].pitcher_ask_amount, Some(1_000_000.0));
        assert_eq!(dataset.records()[0].deal_equity, Some(10.0));
        assert_eq!(dataset.roster().names(), &["ashneer", "peyush"]);
    }

    #[test]
    fn cleaning_twice_removes_nothing_more() {
        let table = raw(vec![
            ["1", "1", "Acme", "100", "1000", "10", "1", "100", "1000", "10", "50", "1", "1"],
            ["1", "1", "Acme", "100", "1000", "10", "1", "100", "1000", "10", "50", "1", "1"],
        ]);
        let (normalized, _) = normalize_columns(table);
        let (once, removed) = drop_duplicates(normalized);
        let (twice, removed_again) = drop_duplicates(once.clone());
        assert_eq!((removed, removed_again), (1, 0));
        assert_eq!(once, twice);
    }
}
