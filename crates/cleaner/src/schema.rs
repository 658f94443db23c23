use crate::deal_flag::DealFlags;
use crate::error::CleanerError;
use crate::table::{ColumnValues, TypedTable, format_number};
use core_types::{Dataset, EpisodeKey, PitchRecord, SharkRoster};

pub const EPISODE_NUMBER: &str = "episode_number";
pub const PITCH_NUMBER: &str = "pitch_number";
pub const BRAND_NAME: &str = "brand_name";
pub const PITCHER_ASK_AMOUNT: &str = "pitcher_ask_amount";
pub const ASK_VALUATION: &str = "ask_valuation";
pub const ASK_EQUITY: &str = "ask_equity";
pub const DEAL_AMOUNT: &str = "deal_amount";
pub const DEAL_VALUATION: &str = "deal_valuation";
pub const DEAL_EQUITY: &str = "deal_equity";
pub const AMOUNT_PER_SHARK: &str = "amount_per_shark";

/// Numeric columns every analysis needs.
pub const REQUIRED_NUMERIC: [&str; 7] = [
    PITCHER_ASK_AMOUNT,
    ASK_VALUATION,
    ASK_EQUITY,
    DEAL_AMOUNT,
    DEAL_VALUATION,
    DEAL_EQUITY,
    AMOUNT_PER_SHARK,
];

/// Checks that every required column is present before any record is built.
pub fn validate_schema(table: &TypedTable) -> Result<(), CleanerError> {
    if !table.has_column(EPISODE_NUMBER) {
        return Err(CleanerError::MissingColumn(EPISODE_NUMBER.to_string()));
    }
    for name in REQUIRED_NUMERIC {
        match table.column(name).map(|c| &c.values) {
            None => return Err(CleanerError::MissingColumn(name.to_string())),
            Some(ColumnValues::Text(_)) => return Err(CleanerError::NotNumeric(name.to_string())),
            Some(ColumnValues::Numeric(_)) => {}
        }
    }
    Ok(())
}

/// Freezes the typed table into a `Dataset` of `PitchRecord`s.
pub fn bind_records(table: &TypedTable, deal_flags: DealFlags) -> Result<Dataset, CleanerError> {
    validate_schema(table)?;

    let height = table.height();
    let roster = SharkRoster::from_columns(table.column_names());

    let episodes = episode_keys(table);
    let pitch_numbers = table
        .text_values(PITCH_NUMBER)
        .unwrap_or_else(|| vec![None; height]);
    let brand_names = table
        .text_values(BRAND_NAME)
        .unwrap_or_else(|| vec![None; height]);

    let ask_amount = required(table, PITCHER_ASK_AMOUNT)?;
    let ask_valuation = required(table, ASK_VALUATION)?;
    let ask_equity = required(table, ASK_EQUITY)?;
    let deal_amount = required(table, DEAL_AMOUNT)?;
    let deal_valuation = required(table, DEAL_VALUATION)?;
    let deal_equity = required(table, DEAL_EQUITY)?;
    let amount_per_shark = required(table, AMOUNT_PER_SHARK)?;

    let shark_columns = roster
        .names()
        .iter()
        .map(|shark| {
            let column = SharkRoster::column_name(shark);
            table
                .numeric(&column)
                .ok_or(CleanerError::NotNumeric(column))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let records = (0..height)
        .map(|row| PitchRecord {
            episode: episodes[row].clone(),
            pitch_number: pitch_numbers[row].clone(),
            brand_name: brand_names[row].clone(),
            pitcher_ask_amount: ask_amount[row],
            ask_valuation: ask_valuation[row],
            ask_equity: ask_equity[row],
            deal_amount: deal_amount[row],
            deal_valuation: deal_valuation[row],
            deal_equity: deal_equity[row],
            amount_per_shark: amount_per_shark[row],
            shark_deals: shark_columns
                .iter()
                .map(|values| values[row].is_some_and(|v| v > 0.0))
                .collect(),
            deal_flag: deal_flags.flags[row],
        })
        .collect();

    tracing::info!(records = height, sharks = roster.len(), "Bound cleaned rows to pitch records.");
    Ok(Dataset::new(roster, records, deal_flags.source)?)
}

fn required<'a>(table: &'a TypedTable, name: &str) -> Result<&'a [Option<f64>], CleanerError> {
    table
        .numeric(name)
        .ok_or_else(|| CleanerError::NotNumeric(name.to_string()))
}

fn episode_keys(table: &TypedTable) -> Vec<Option<EpisodeKey>> {
    match table.column(EPISODE_NUMBER).map(|c| &c.values) {
        Some(ColumnValues::Text(values)) => values
            .iter()
            .map(|v| v.as_deref().and_then(EpisodeKey::parse))
            .collect(),
        Some(ColumnValues::Numeric(values)) => values
            .iter()
            .map(|v| v.and_then(|n| EpisodeKey::parse(&format_number(n))))
            .collect(),
        None => vec![None; table.height()],
    }
}
