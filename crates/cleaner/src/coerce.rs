use crate::table::{Column, ColumnValues, RawTable, TypedTable, is_blank};
use core_types::shark_name_from_column;
use serde::Serialize;

/// Substrings that mark a canonical column name as numeric-like.
pub const NUMERIC_MARKERS: [&str; 5] = ["amount", "valuation", "equity", "ask", "deal"];

/// Name of the explicit deal indicator column.
pub const DEAL_COLUMN: &str = "deal";

/// Decorations stripped before parsing: rupee sign, thousands commas, percent.
const DECORATIONS: [char; 3] = ['₹', ',', '%'];

/// Outcome of coercing one numeric-like column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCoercion {
    pub column: String,
    /// Cells that parsed to a number.
    pub parsed: usize,
    /// Non-blank cells that did not parse and became missing.
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoercionReport {
    pub columns: Vec<ColumnCoercion>,
}

impl CoercionReport {
    /// Columns that hold no number at all after coercion.
    pub fn fully_missing(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.parsed == 0)
            .map(|c| c.column.as_str())
    }

    pub fn total_failed(&self) -> usize {
        self.columns.iter().map(|c| c.failed).sum()
    }
}

/// Whether a canonical column name is selected for numeric coercion.
pub fn is_numeric_like(column: &str) -> bool {
    NUMERIC_MARKERS.iter().any(|marker| column.contains(marker))
}

/// Whether a column is a yes/no indicator: the deal column or a shark's participation column.
pub fn is_indicator(column: &str) -> bool {
    column == DEAL_COLUMN || shark_name_from_column(column).is_some()
}

/// Parses a decorated number such as `₹10,00,000` or `12.5%`.
///
/// Anything that is not a finite number after stripping is missing.
pub fn parse_decorated(raw: &str) -> Option<f64> {
    let stripped: String = raw.chars().filter(|c| !DECORATIONS.contains(c)).collect();
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an indicator cell, accepting yes/no words as well as numbers.
pub fn parse_indicator(raw: &str) -> Option<f64> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Some(1.0),
        "no" | "n" | "false" => Some(0.0),
        _ => parse_decorated(raw),
    }
}

/// Converts the row-major text table into typed columns.
///
/// Numeric-like columns become `Option<f64>`; a cell that cannot be parsed is
/// recorded as missing rather than rejected. Other columns stay text with
/// blank cells turned into missing.
pub fn coerce_numeric_columns(table: RawTable) -> (TypedTable, CoercionReport) {
    let height = table.height();
    let (names, rows) = table.into_parts();

    // Transpose into per-column cell vectors.
    let mut cells: Vec<Vec<Option<String>>> = names.iter().map(|_| Vec::with_capacity(height)).collect();
    for row in rows {
        for (idx, value) in row.into_iter().enumerate() {
            cells[idx].push(value);
        }
    }

    let mut report = CoercionReport::default();
    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| {
            if !is_numeric_like(&name) {
                let values = values
                    .into_iter()
                    .map(|v| v.filter(|s| !s.trim().is_empty()).map(|s| s.trim().to_string()))
                    .collect();
                return Column {
                    name,
                    values: ColumnValues::Text(values),
                };
            }

            let parse: fn(&str) -> Option<f64> = if is_indicator(&name) {
                parse_indicator
            } else {
                parse_decorated
            };

            let mut parsed = 0;
            let mut failed = 0;
            let numbers: Vec<Option<f64>> = values
                .iter()
                .map(|cell| {
                    let number = cell.as_deref().and_then(parse);
                    match (number, is_blank(cell.as_deref())) {
                        (Some(_), _) => parsed += 1,
                        (None, false) => failed += 1,
                        (None, true) => {}
                    }
                    number
                })
                .collect();

            if failed > 0 {
                tracing::debug!(column = %name, failed, "Cells could not be parsed and are now missing.");
            }
            report.columns.push(ColumnCoercion {
                column: name.clone(),
                parsed,
                failed,
            });

            Column {
                name,
                values: ColumnValues::Numeric(numbers),
            }
        })
        .collect();

    (TypedTable::new(columns, height), report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn selection_rule_matches_markers_anywhere_in_the_name() {
        for name in [
            "pitcher_ask_amount",
            "ask_valuation",
            "deal_equity",
            "deal",
            "ashneer_deal",
            "amount_per_shark",
        ] {
            assert!(is_numeric_like(name), "{name} should be numeric-like");
        }
        for name in ["episode_number", "pitch_number", "brand_name", "industry"] {
            assert!(!is_numeric_like(name), "{name} should stay text");
        }
    }

    #[test]
    fn decorations_are_stripped_before_parsing() {
        assert_eq!(parse_decorated("₹10,00,000"), Some(1_000_000.0));
        assert_eq!(parse_decorated(" 2.5% "), Some(2.5));
        assert_eq!(parse_decorated("₹ 75,000"), Some(75_000.0));
        assert_eq!(parse_decorated("-"), None);
        assert_eq!(parse_decorated("NA"), None);
        assert_eq!(parse_decorated("nan"), None);
        assert_eq!(parse_decorated(""), None);
    }

    #[test]
    fn indicators_accept_yes_no_words() {
        assert_eq!(parse_indicator("Yes"), Some(1.0));
        assert_eq!(parse_indicator(" no "), Some(0.0));
        assert_eq!(parse_indicator("1"), Some(1.0));
        assert_eq!(parse_indicator("maybe"), None);
        assert!(is_indicator("deal"));
        assert!(is_indicator("peyush_deal"));
        assert!(!is_indicator("deal_amount"));
    }

    #[test]
    fn numeric_like_columns_hold_numbers_or_missing_only() {
        let table = RawTable::new(
            vec!["brand_name".into(), "deal_amount".into(), "deal".into()],
            vec![
                vec![cell(" Acme "), cell("₹5,00,000"), cell("Yes")],
                vec![cell("Beta"), cell("not disclosed"), cell("No")],
                vec![cell(""), None, cell("??")],
            ],
        );
        let (typed, report) = coerce_numeric_columns(table);

        assert_eq!(
            typed.numeric("deal_amount").unwrap(),
            &[Some(500_000.0), None, None]
        );
        assert_eq!(typed.numeric("deal").unwrap(), &[Some(1.0), Some(0.0), None]);
        assert_eq!(
            typed.text_values("brand_name").unwrap(),
            vec![cell("Acme"), cell("Beta"), None]
        );

        let amount = &report.columns[0];
        assert_eq!((amount.parsed, amount.failed), (1, 1));
        assert_eq!(report.total_failed(), 2);
    }

    #[test]
    fn entirely_non_numeric_column_becomes_entirely_missing() {
        let table = RawTable::new(
            vec!["ask_valuation".into()],
            vec![vec![cell("TBD")], vec![cell("n/a")]],
        );
        let (typed, report) = coerce_numeric_columns(table);
        assert_eq!(typed.numeric("ask_valuation").unwrap(), &[None, None]);
        assert_eq!(report.fully_missing().collect::<Vec<_>>(), vec!["ask_valuation"]);
    }
}
