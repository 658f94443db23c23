use crate::coerce::DEAL_COLUMN;
use crate::error::CleanerError;
use crate::table::TypedTable;
use core_types::DealFlagSource;
use serde::Serialize;

pub const DEAL_AMOUNT_COLUMN: &str = "deal_amount";

/// A row where the explicit indicator and `deal_amount` disagree.
///
/// These are reported, never resolved: the indicator column wins.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DealFlagConflict {
    /// The indicator says no deal, yet a positive deal amount is recorded.
    NoDealWithAmount { row: usize, deal_amount: f64 },
    /// The indicator says deal, yet no deal amount is recorded.
    DealWithoutAmount { row: usize },
}

impl DealFlagConflict {
    /// Zero-based row index in the cleaned table.
    pub fn row(&self) -> usize {
        match self {
            DealFlagConflict::NoDealWithAmount { row, .. } => *row,
            DealFlagConflict::DealWithoutAmount { row } => *row,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DealFlags {
    pub source: DealFlagSource,
    pub flags: Vec<bool>,
    pub conflicts: Vec<DealFlagConflict>,
}

/// Decides once, from the schema alone, how `deal_flag` will be derived.
pub fn resolve_deal_flag_source(table: &TypedTable) -> DealFlagSource {
    if table.has_column(DEAL_COLUMN) {
        DealFlagSource::ExplicitColumn {
            column: DEAL_COLUMN.to_string(),
        }
    } else {
        DealFlagSource::DerivedFromAmount
    }
}

/// Computes the per-row deal flag for the resolved source.
///
/// Explicit indicators treat missing as 0 and truncate toward zero; any
/// non-zero integer part is a deal, so `0.5` is not.
/// Without an indicator, a row is a deal iff its deal amount is present.
pub fn derive_deal_flags(
    table: &TypedTable,
    source: DealFlagSource,
) -> Result<DealFlags, CleanerError> {
    let amounts = table.numeric(DEAL_AMOUNT_COLUMN);

    let (flags, conflicts) = match &source {
        DealFlagSource::ExplicitColumn { column } => {
            let indicator = table
                .numeric(column)
                .ok_or_else(|| CleanerError::NotNumeric(column.clone()))?;
            let flags: Vec<bool> = indicator
                .iter()
                .map(|v| v.unwrap_or(0.0).trunc() != 0.0)
                .collect();
            let conflicts = amounts
                .map(|amounts| find_conflicts(&flags, amounts))
                .unwrap_or_default();
            (flags, conflicts)
        }
        DealFlagSource::DerivedFromAmount => {
            let amounts = amounts.ok_or_else(|| {
                if table.has_column(DEAL_AMOUNT_COLUMN) {
                    CleanerError::NotNumeric(DEAL_AMOUNT_COLUMN.to_string())
                } else {
                    CleanerError::MissingColumn(DEAL_AMOUNT_COLUMN.to_string())
                }
            })?;
            (amounts.iter().map(Option::is_some).collect(), Vec::new())
        }
    };

    for conflict in &conflicts {
        tracing::warn!(?conflict, "Deal indicator disagrees with deal_amount; keeping the indicator.");
    }
    tracing::info!(
        source = %source,
        deals = flags.iter().filter(|&&f| f).count(),
        "Derived deal flags."
    );

    Ok(DealFlags {
        source,
        flags,
        conflicts,
    })
}

fn find_conflicts(flags: &[bool], amounts: &[Option<f64>]) -> Vec<DealFlagConflict> {
    flags
        .iter()
        .zip(amounts)
        .enumerate()
        .filter_map(|(row, (&flag, &amount))| match (flag, amount) {
            (false, Some(deal_amount)) if deal_amount > 0.0 => {
                Some(DealFlagConflict::NoDealWithAmount { row, deal_amount })
            }
            (true, None) => Some(DealFlagConflict::DealWithoutAmount { row }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnValues};

    fn numeric(name: &str, values: Vec<Option<f64>>) -> Column {
        Column {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    #[test]
    fn explicit_column_takes_precedence_and_missing_is_no_deal() {
        let table = TypedTable::new(
            vec![
                numeric("deal", vec![Some(1.0), Some(0.0), None]),
                numeric("deal_amount", vec![Some(10.0), None, None]),
            ],
            3,
        );
        let source = resolve_deal_flag_source(&table);
        assert_eq!(
            source,
            DealFlagSource::ExplicitColumn {
                column: "deal".into()
            }
        );

        let flags = derive_deal_flags(&table, source).unwrap();
        assert_eq!(flags.flags, vec![true, false, false]);
        assert!(flags.conflicts.is_empty());
    }

    #[test]
    fn fractional_indicators_truncate_toward_zero() {
        let table = TypedTable::new(
            vec![numeric("deal", vec![Some(0.5), Some(0.99), Some(1.5), Some(2.0)])],
            4,
        );
        let source = resolve_deal_flag_source(&table);
        let flags = derive_deal_flags(&table, source).unwrap();
        assert_eq!(flags.flags, vec![false, false, true, true]);
    }

    #[test]
    fn without_indicator_a_present_amount_means_deal() {
        let table = TypedTable::new(
            vec![numeric("deal_amount", vec![Some(0.0), None, Some(5.0)])],
            3,
        );
        let source = resolve_deal_flag_source(&table);
        assert_eq!(source, DealFlagSource::DerivedFromAmount);
        let flags = derive_deal_flags(&table, source).unwrap();
        assert_eq!(flags.flags, vec![true, false, true]);
    }

    #[test]
    fn disagreements_are_surfaced_not_resolved() {
        let table = TypedTable::new(
            vec![
                numeric("deal", vec![Some(0.0), Some(1.0), Some(1.0)]),
                numeric("deal_amount", vec![Some(50.0), None, Some(20.0)]),
            ],
            3,
        );
        let source = resolve_deal_flag_source(&table);
        let flags = derive_deal_flags(&table, source).unwrap();
        assert_eq!(flags.flags, vec![false, true, true]);
        assert_eq!(
            flags.conflicts,
            vec![
                DealFlagConflict::NoDealWithAmount {
                    row: 0,
                    deal_amount: 50.0
                },
                DealFlagConflict::DealWithoutAmount { row: 1 },
            ]
        );
    }

    #[test]
    fn derived_path_requires_deal_amount() {
        let table = TypedTable::new(vec![], 0);
        let err = derive_deal_flags(&table, DealFlagSource::DerivedFromAmount).unwrap_err();
        assert!(matches!(err, CleanerError::MissingColumn(ref c) if c == "deal_amount"));
    }
}
