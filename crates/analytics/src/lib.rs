//! # Pitch Analytics Engine
//!
//! This crate computes the exploratory metrics of the pitch sheet. It acts as
//! the single source of numbers for every renderer.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O. It depends only on `core-types` for the frozen
//!   `Dataset` and on `configuration` for the analysis thresholds.
//! - **Stateless Calculation:** the `AnalyticsEngine` takes a borrowed `Dataset`
//!   and produces an `EdaReport`. Each metric is computed independently; one
//!   that fails is recorded as a warning and does not stop the others.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: runs every metric in report order.
//! - `EdaReport`: the serializable struct that holds all metrics.
//! - `stats`: the descriptive statistics the metrics are built from.
//! - `AnalyticsError`: why a single metric could not be computed.

pub mod engine;
pub mod error;
pub mod report;
pub mod stats;

pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{
    AskInsight, AskOutcomeSummary, DealAmountSummary, DealSummary, EdaReport, EpisodeDeals,
    EpisodeEquity, EquityInsight, EquityValuationSummary, HighAskSummary, MultiSharkSummary,
    NamedSharkTotal, OverAskDeal, SharkDealCount, SharkRoi,
};
pub use stats::Distribution;
