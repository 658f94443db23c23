//! # Pitch Report Renderers
//!
//! Presentation of an `EdaReport`. Nothing here feeds back into the data:
//! every renderer only reads the aggregates the analytics engine produced.
//!
//! ## Public API
//!
//! - `render_cleaning` / `render_report`: human-readable console text.
//! - `render_json`: the cleaning summary and the full report as JSON.
//! - `render_charts`: SVG charts written with `plotters`.

pub mod charts;
pub mod console;
pub mod error;
pub mod format;

use analytics::EdaReport;
use cleaner::CleaningReport;
use serde::Serialize;

pub use charts::render_charts;
pub use console::{render_cleaning, render_report};
pub use error::ReporterError;

#[derive(Serialize)]
struct JsonOutput<'a> {
    cleaning: &'a CleaningReport,
    report: &'a EdaReport,
}

/// Pretty-printed JSON of both reports, for `--format json`.
pub fn render_json(cleaning: &CleaningReport, report: &EdaReport) -> Result<String, ReporterError> {
    Ok(serde_json::to_string_pretty(&JsonOutput { cleaning, report })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::DealFlagSource;

    #[test]
    fn json_holds_both_reports() {
        let cleaning = CleaningReport {
            renamed_columns: vec![],
            rows_read: 0,
            duplicates_removed: 0,
            missing_values: vec![],
            coercion: Default::default(),
            deal_flag_source: DealFlagSource::ExplicitColumn {
                column: "deal".into(),
            },
            deal_flag_conflicts: vec![],
        };
        let json = render_json(&cleaning, &EdaReport::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["cleaning"]["deal_flag_source"]["kind"], "explicit_column");
        assert_eq!(value["report"]["deals"]["total_pitches"], 0);
        assert!(value["report"]["deals"]["deal_percentage"].is_null());
    }
}
