use crate::stats::Distribution;
use core_types::EpisodeKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Every metric of the exploratory analysis, in report order.
///
/// This struct is the final output of the `AnalyticsEngine` and the only
/// input of the console and chart renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdaReport {
    // I. Deal Outcomes
    pub deals: DealSummary,
    pub deal_amounts: DealAmountSummary,

    // II. Shark Activity
    pub shark_investments: Vec<SharkDealCount>,
    pub top_sharks: Vec<SharkDealCount>,

    // III. Equity and Valuation
    pub deal_equity: Distribution,
    pub valuation_correlation: Option<f64>,
    pub average_equity_given: Option<Decimal>,

    // IV. Episodes and Filters
    pub deals_by_episode: Vec<EpisodeDeals>,
    pub busiest_episode: Option<EpisodeDeals>,
    pub high_ask: HighAskSummary,
    pub multi_shark: MultiSharkSummary,
    pub named_shark_totals: Vec<NamedSharkTotal>,
    pub amount_per_shark: Distribution,
    pub over_ask_deals: Vec<OverAskDeal>,

    // V. Rankings and Trends
    pub shark_roi: Vec<SharkRoi>,
    pub equity_trend: Vec<EpisodeEquity>,
    pub ask_outcome: AskOutcomeSummary,
    pub deals_per_episode: Vec<EpisodeDeals>,
    pub equity_valuation: EquityValuationSummary,

    /// Metrics that could not be computed, one line each.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealSummary {
    pub total_pitches: usize,
    pub successful_deals: usize,
    /// `None` when there are no pitches at all.
    pub deal_percentage: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealAmountSummary {
    pub average: Option<f64>,
    pub median: Option<f64>,
    pub total_invested: f64,
}

/// Number of pitches a shark joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharkDealCount {
    pub shark: String,
    pub deals: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeDeals {
    pub episode: EpisodeKey,
    pub deals: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighAskSummary {
    pub threshold: f64,
    pub pitches: usize,
    pub with_deal: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiSharkSummary {
    pub pitches: usize,
    pub percentage: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSharkTotal {
    pub shark: String,
    pub total_invested: f64,
}

/// A deal that closed above what the founders asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverAskDeal {
    pub episode: Option<EpisodeKey>,
    pub pitch_number: Option<String>,
    pub brand_name: Option<String>,
    pub ask_amount: f64,
    pub deal_amount: f64,
}

/// Equity obtained per unit invested, across one shark's deals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharkRoi {
    pub shark: String,
    pub deals: usize,
    pub total_equity: f64,
    pub total_amount: f64,
    /// 0 when the shark invested nothing.
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEquity {
    pub episode: EpisodeKey,
    pub average_equity: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AskInsight {
    LowerAsksWinDeals,
    #[default]
    NoClearPattern,
}

impl AskInsight {
    pub fn message(&self) -> &'static str {
        match self {
            AskInsight::LowerAsksWinDeals => {
                "Startups asking for LOWER amounts tend to secure more deals."
            }
            AskInsight::NoClearPattern => {
                "Asking amount does NOT show a clear pattern toward deal success."
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AskOutcomeSummary {
    pub correlation: Option<f64>,
    pub mean_ask_with_deal: Option<f64>,
    pub mean_ask_without_deal: Option<f64>,
    pub insight: AskInsight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquityInsight {
    LowerEquityHigherValuation,
    #[default]
    NoInverseRelation,
}

impl EquityInsight {
    pub fn message(&self) -> &'static str {
        match self {
            EquityInsight::LowerEquityHigherValuation => {
                "Lower equity asks tend to result in HIGHER deal valuations."
            }
            EquityInsight::NoInverseRelation => {
                "Higher equity asks do NOT necessarily result in lower valuations."
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityValuationSummary {
    pub correlation: Option<f64>,
    /// Ask equity at or below this goes in the low group.
    pub split_pct: f64,
    pub mean_valuation_low_equity: Option<f64>,
    pub mean_valuation_high_equity: Option<f64>,
    pub insight: EquityInsight,
}
