use crate::error::AnalyticsError;
use crate::report::*;
use crate::stats::{self, describe, mean, pearson, percentage, round_dp};
use configuration::AnalysisSettings;
use core_types::{Dataset, EpisodeKey, PitchRecord};
use std::cmp::Ordering;
use std::collections::BTreeMap;

type MetricStep = fn(&AnalyticsEngine, &Dataset, &mut EdaReport) -> Result<(), AnalyticsError>;

/// A stateless calculator for deriving the exploratory metrics from a cleaned dataset.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    params: AnalysisSettings,
}

impl AnalyticsEngine {
    pub fn new(params: AnalysisSettings) -> Self {
        Self { params }
    }

    /// The main entry point for calculating every metric.
    ///
    /// Metrics run in report order. A metric that cannot be computed leaves
    /// its fields at their defaults and adds a line to `EdaReport::warnings`;
    /// the remaining metrics still run.
    pub fn calculate(&self, dataset: &Dataset) -> EdaReport {
        let steps: [(&str, MetricStep); 16] = [
            ("deal summary", Self::calculate_deal_summary),
            ("deal amounts", Self::calculate_deal_amounts),
            ("shark investments", Self::calculate_shark_investments),
            ("deal equity", Self::calculate_deal_equity),
            ("valuation correlation", Self::calculate_valuation_correlation),
            ("deals by episode", Self::calculate_deals_by_episode),
            ("high-ask pitches", Self::calculate_high_ask),
            ("multi-shark pitches", Self::calculate_multi_shark),
            ("named shark totals", Self::calculate_named_shark_totals),
            ("amount per shark", Self::calculate_amount_per_shark),
            ("over-ask deals", Self::calculate_over_ask_deals),
            ("shark ROI", Self::calculate_shark_roi),
            ("equity trend", Self::calculate_equity_trend),
            ("ask vs outcome", Self::calculate_ask_outcome),
            ("deals per episode", Self::calculate_deals_per_episode),
            ("equity vs valuation", Self::calculate_equity_valuation),
        ];

        let mut report = EdaReport::default();
        for (name, step) in steps {
            if let Err(e) = step(self, dataset, &mut report) {
                tracing::warn!(metric = name, error = %e, "Metric could not be computed.");
                report.warnings.push(format!("{name}: {e}"));
            }
        }
        report
    }

    /// Total pitches, successful deals and the deal percentage.
    fn calculate_deal_summary(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let total_pitches = dataset.len();
        let successful_deals = dataset
            .records()
            .iter()
            .map(|r| r.deal_flag_value() as usize)
            .sum();

        report.deals = DealSummary {
            total_pitches,
            successful_deals,
            deal_percentage: percentage(successful_deals, total_pitches),
        };

        if total_pitches == 0 {
            return Err(AnalyticsError::NotEnoughData("no pitches".to_string()));
        }
        Ok(())
    }

    /// Mean, median and sum of `deal_amount` over closed deals.
    fn calculate_deal_amounts(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let amounts: Vec<f64> = dataset.deals().filter_map(|r| r.deal_amount).collect();
        report.deal_amounts = DealAmountSummary {
            average: mean(&amounts),
            median: stats::median(&amounts),
            total_invested: amounts.iter().sum(),
        };
        Ok(())
    }

    /// Number of pitches each shark joined, ranked, plus the top N.
    fn calculate_shark_investments(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let roster = dataset.roster();
        if roster.is_empty() {
            return Err(AnalyticsError::NotEnoughData(
                "no <shark>_deal participation columns".to_string(),
            ));
        }

        let mut counts: Vec<SharkDealCount> = roster
            .names()
            .iter()
            .enumerate()
            .map(|(idx, shark)| SharkDealCount {
                shark: shark.clone(),
                deals: dataset
                    .records()
                    .iter()
                    .filter(|r| r.shark_joined(idx))
                    .count(),
            })
            .collect();
        // Stable sort: ties keep roster order.
        counts.sort_by(|a, b| b.deals.cmp(&a.deals));

        report.top_sharks = counts.iter().take(self.params.top_sharks).cloned().collect();
        report.shark_investments = counts;
        Ok(())
    }

    /// Distribution and rounded mean of `deal_equity` over closed deals.
    fn calculate_deal_equity(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let equity: Vec<f64> = dataset.deals().filter_map(|r| r.deal_equity).collect();
        report.deal_equity = describe(&equity);
        report.average_equity_given = report.deal_equity.mean.and_then(|m| round_dp(m, 2));
        Ok(())
    }

    fn calculate_valuation_correlation(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        report.valuation_correlation = pearson(
            dataset
                .records()
                .iter()
                .map(|r| (r.deal_valuation, r.ask_valuation)),
        );
        Ok(())
    }

    /// Closed deals per episode and the episode with the most of them.
    fn calculate_deals_by_episode(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let counts = count_by_episode(dataset.deals(), |_| 1);
        report.deals_by_episode = episode_deals(counts);

        // First episode in broadcast order wins a tie.
        report.busiest_episode = report
            .deals_by_episode
            .iter()
            .fold(None::<&EpisodeDeals>, |best, e| match best {
                Some(b) if b.deals >= e.deals => Some(b),
                _ => Some(e),
            })
            .cloned();

        if report.busiest_episode.is_none() {
            return Err(AnalyticsError::NotEnoughData(
                "no closed deals with an episode number".to_string(),
            ));
        }
        Ok(())
    }

    /// Pitches asking for more than the threshold, and how many of them closed.
    fn calculate_high_ask(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let threshold = self.params.high_ask_threshold;
        let high_ask: Vec<&PitchRecord> = dataset
            .records()
            .iter()
            .filter(|r| r.pitcher_ask_amount.is_some_and(|ask| ask > threshold))
            .collect();

        report.high_ask = HighAskSummary {
            threshold,
            pitches: high_ask.len(),
            with_deal: high_ask.iter().filter(|r| r.deal_flag).count(),
        };
        Ok(())
    }

    fn calculate_multi_shark(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let pitches = dataset
            .records()
            .iter()
            .filter(|r| r.sharks_invested_count() > 1)
            .count();
        report.multi_shark = MultiSharkSummary {
            pitches,
            percentage: percentage(pitches, dataset.len()),
        };
        Ok(())
    }

    /// Sum of participation flag x deal amount for each configured shark.
    ///
    /// Known sharks are reported even when some configured names are unknown.
    fn calculate_named_shark_totals(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let mut unknown = Vec::new();

        for shark in &self.params.named_sharks {
            let Some(idx) = dataset.roster().index_of(shark) else {
                unknown.push(shark.clone());
                continue;
            };
            let total_invested = dataset
                .records()
                .iter()
                .filter(|r| r.shark_joined(idx))
                .filter_map(|r| r.deal_amount)
                .sum();
            report.named_shark_totals.push(NamedSharkTotal {
                shark: shark.clone(),
                total_invested,
            });
        }

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(AnalyticsError::UnknownSharks(unknown))
        }
    }

    fn calculate_amount_per_shark(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let amounts: Vec<f64> = dataset
            .records()
            .iter()
            .filter_map(|r| r.amount_per_shark)
            .collect();
        report.amount_per_shark = describe(&amounts);
        Ok(())
    }

    /// Rows whose deal amount strictly exceeds the ask.
    fn calculate_over_ask_deals(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        report.over_ask_deals = dataset
            .records()
            .iter()
            .filter_map(|r| match (r.pitcher_ask_amount, r.deal_amount) {
                (Some(ask_amount), Some(deal_amount)) if deal_amount > ask_amount => {
                    Some(OverAskDeal {
                        episode: r.episode.clone(),
                        pitch_number: r.pitch_number.clone(),
                        brand_name: r.brand_name.clone(),
                        ask_amount,
                        deal_amount,
                    })
                }
                _ => None,
            })
            .collect();
        Ok(())
    }

    /// Equity obtained per unit invested for every shark that joined a deal, best first.
    fn calculate_shark_roi(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let roster = dataset.roster();
        if roster.is_empty() {
            return Err(AnalyticsError::NotEnoughData(
                "no <shark>_deal participation columns".to_string(),
            ));
        }

        let mut rankings: Vec<SharkRoi> = roster
            .names()
            .iter()
            .enumerate()
            .filter_map(|(idx, shark)| {
                let joined: Vec<&PitchRecord> = dataset
                    .records()
                    .iter()
                    .filter(|r| r.shark_joined(idx))
                    .collect();
                if joined.is_empty() {
                    return None;
                }
                let total_equity: f64 = joined.iter().filter_map(|r| r.deal_equity).sum();
                let total_amount: f64 = joined.iter().filter_map(|r| r.deal_amount).sum();
                let roi = if total_amount > 0.0 {
                    total_equity / total_amount
                } else {
                    0.0
                };
                Some(SharkRoi {
                    shark: shark.clone(),
                    deals: joined.len(),
                    total_equity,
                    total_amount,
                    roi,
                })
            })
            .collect();
        rankings.sort_by(|a, b| b.roi.partial_cmp(&a.roi).unwrap_or(Ordering::Equal));

        report.shark_roi = rankings;
        Ok(())
    }

    /// Average deal equity per episode over closed deals.
    fn calculate_equity_trend(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let mut by_episode: BTreeMap<EpisodeKey, Vec<f64>> = BTreeMap::new();
        for record in dataset.deals() {
            if let Some(episode) = &record.episode {
                let equities = by_episode.entry(episode.clone()).or_default();
                equities.extend(record.deal_equity);
            }
        }

        report.equity_trend = by_episode
            .into_iter()
            .map(|(episode, equities)| EpisodeEquity {
                episode,
                average_equity: mean(&equities),
            })
            .collect();
        Ok(())
    }

    /// Whether smaller asks close more often.
    fn calculate_ask_outcome(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let records = dataset.records();
        let mean_ask = |closed: bool| {
            let asks: Vec<f64> = records
                .iter()
                .filter(|r| r.deal_flag == closed)
                .filter_map(|r| r.pitcher_ask_amount)
                .collect();
            mean(&asks)
        };

        let mean_ask_with_deal = mean_ask(true);
        let mean_ask_without_deal = mean_ask(false);
        let insight = match (mean_ask_with_deal, mean_ask_without_deal) {
            (Some(with), Some(without)) if with < without => AskInsight::LowerAsksWinDeals,
            _ => AskInsight::NoClearPattern,
        };

        report.ask_outcome = AskOutcomeSummary {
            correlation: pearson(records.iter().map(|r| (r.pitcher_ask_amount, r.deal_amount))),
            mean_ask_with_deal,
            mean_ask_without_deal,
            insight,
        };
        Ok(())
    }

    /// Sum of `deal_flag` per episode, including episodes without deals.
    fn calculate_deals_per_episode(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let counts = count_by_episode(dataset.records().iter(), |r| r.deal_flag_value() as usize);
        report.deals_per_episode = episode_deals(counts);
        Ok(())
    }

    /// Whether asking for less equity goes with a higher deal valuation.
    fn calculate_equity_valuation(
        &self,
        dataset: &Dataset,
        report: &mut EdaReport,
    ) -> Result<(), AnalyticsError> {
        let split = self.params.equity_split_pct;
        let records = dataset.records();
        let mean_valuation = |in_group: &dyn Fn(f64) -> bool| {
            let valuations: Vec<f64> = records
                .iter()
                .filter(|r| r.ask_equity.is_some_and(in_group))
                .filter_map(|r| r.deal_valuation)
                .collect();
            mean(&valuations)
        };

        let low = mean_valuation(&|equity: f64| equity <= split);
        let high = mean_valuation(&|equity: f64| equity > split);
        let insight = match (low, high) {
            (Some(low), Some(high)) if low > high => EquityInsight::LowerEquityHigherValuation,
            _ => EquityInsight::NoInverseRelation,
        };

        report.equity_valuation = EquityValuationSummary {
            correlation: pearson(records.iter().map(|r| (r.ask_equity, r.deal_valuation))),
            split_pct: split,
            mean_valuation_low_equity: low,
            mean_valuation_high_equity: high,
            insight,
        };
        Ok(())
    }
}

/// Sums `weight` per episode in episode order; rows without an episode are skipped.
fn count_by_episode<'a, I, F>(records: I, weight: F) -> BTreeMap<EpisodeKey, usize>
where
    I: Iterator<Item = &'a PitchRecord>,
    F: Fn(&PitchRecord) -> usize,
{
    let mut counts = BTreeMap::new();
    for record in records {
        if let Some(episode) = &record.episode {
            *counts.entry(episode.clone()).or_insert(0) += weight(record);
        }
    }
    counts
}

fn episode_deals(counts: BTreeMap<EpisodeKey, usize>) -> Vec<EpisodeDeals> {
    counts
        .into_iter()
        .map(|(episode, deals)| EpisodeDeals { episode, deals })
        .collect()
}
