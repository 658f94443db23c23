use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an episode for group-by purposes.
///
/// Episode numbers usually arrive as integers, but a sheet may carry labels
/// such as "Special". Numbers sort before labels, numbers numerically and
/// labels lexically, so per-episode aggregates come out in broadcast order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EpisodeKey {
    Number(i64),
    Label(String),
}

impl EpisodeKey {
    /// Parses a raw cell into an episode key. Blank cells have no episode.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(EpisodeKey::Number(n));
        }
        // Spreadsheet exports often write integral numbers as "12.0".
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() && f.fract() == 0.0 {
                return Some(EpisodeKey::Number(f as i64));
            }
        }
        Some(EpisodeKey::Label(trimmed.to_string()))
    }
}

impl fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeKey::Number(n) => write!(f, "{n}"),
            EpisodeKey::Label(label) => f.write_str(label),
        }
    }
}

/// How `deal_flag` was derived for a dataset.
///
/// Resolved once from the source schema; the two paths never mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DealFlagSource {
    /// The source carries an explicit deal indicator column.
    ExplicitColumn { column: String },
    /// No indicator column; a non-missing `deal_amount` means a deal closed.
    DerivedFromAmount,
}

impl fmt::Display for DealFlagSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealFlagSource::ExplicitColumn { column } => write!(f, "explicit column '{column}'"),
            DealFlagSource::DerivedFromAmount => f.write_str("derived from deal_amount"),
        }
    }
}
