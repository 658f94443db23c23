use crate::enums::{DealFlagSource, EpisodeKey};
use crate::error::CoreError;
use serde::Serialize;

/// Suffix that marks a per-shark participation column in the source sheet.
pub const SHARK_COLUMN_SUFFIX: &str = "_deal";

/// The ordered list of sharks present in a dataset.
///
/// Order follows the source column order and is the index space for
/// `PitchRecord::shark_deals`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SharkRoster {
    names: Vec<String>,
}

impl SharkRoster {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Builds a roster from canonical column names, keeping every `<shark>_deal` column.
    pub fn from_columns<'a, I>(columns: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names = columns
            .into_iter()
            .filter_map(shark_name_from_column)
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, shark: &str) -> Option<usize> {
        self.names.iter().position(|n| n == shark)
    }

    /// The source column that carries this shark's participation flag.
    pub fn column_name(shark: &str) -> String {
        format!("{shark}{SHARK_COLUMN_SUFFIX}")
    }
}

/// Returns the shark name for a participation column, e.g. `ashneer_deal` -> `ashneer`.
pub fn shark_name_from_column(column: &str) -> Option<&str> {
    column
        .strip_suffix(SHARK_COLUMN_SUFFIX)
        .filter(|name| !name.is_empty())
}

/// One cleaned pitch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchRecord {
    pub episode: Option<EpisodeKey>,
    pub pitch_number: Option<String>,
    pub brand_name: Option<String>,
    pub pitcher_ask_amount: Option<f64>,
    pub ask_valuation: Option<f64>,
    pub ask_equity: Option<f64>,
    pub deal_amount: Option<f64>,
    pub deal_valuation: Option<f64>,
    pub deal_equity: Option<f64>,
    pub amount_per_shark: Option<f64>,
    /// Participation flags, parallel to the dataset's `SharkRoster`.
    pub shark_deals: Vec<bool>,
    pub deal_flag: bool,
}

impl PitchRecord {
    /// Number of sharks that took part in this pitch's deal.
    ///
    /// Derived from `shark_deals`, so it can never exceed the roster size.
    pub fn sharks_invested_count(&self) -> usize {
        self.shark_deals.iter().filter(|&&joined| joined).count()
    }

    /// `deal_flag` as the 0/1 integer used in sums.
    pub fn deal_flag_value(&self) -> u32 {
        u32::from(self.deal_flag)
    }

    pub fn shark_joined(&self, shark_index: usize) -> bool {
        self.shark_deals.get(shark_index).copied().unwrap_or(false)
    }
}

/// The frozen output of the cleaning phase.
///
/// Every downstream computation borrows this immutably.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    roster: SharkRoster,
    records: Vec<PitchRecord>,
    deal_flag_source: DealFlagSource,
}

impl Dataset {
    pub fn new(
        roster: SharkRoster,
        records: Vec<PitchRecord>,
        deal_flag_source: DealFlagSource,
    ) -> Result<Self, CoreError> {
        if let Some((row, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.shark_deals.len() != roster.len())
        {
            return Err(CoreError::RosterMismatch {
                row,
                expected: roster.len(),
                found: record.shark_deals.len(),
            });
        }

        Ok(Self {
            roster,
            records,
            deal_flag_source,
        })
    }

    pub fn roster(&self) -> &SharkRoster {
        &self.roster
    }

    pub fn records(&self) -> &[PitchRecord] {
        &self.records
    }

    pub fn deal_flag_source(&self) -> &DealFlagSource {
        &self.deal_flag_source
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records with `deal_flag == 1`.
    pub fn deals(&self) -> impl Iterator<Item = &PitchRecord> {
        self.records.iter().filter(|r| r.deal_flag)
    }
}
