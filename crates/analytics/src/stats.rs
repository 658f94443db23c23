//! Descriptive statistics over slices with missing values already removed.
//!
//! Conventions follow the usual dataframe defaults: sample standard deviation
//! (n - 1), quartiles by linear interpolation, Pearson correlation over
//! pairwise-complete observations.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// count / mean / std / min / quartiles / max of a sample.
///
/// Everything but `count` is `None` when the sample is too small.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

pub fn describe(values: &[f64]) -> Distribution {
    let sorted = sorted(values);
    Distribution {
        count: values.len(),
        mean: mean(values),
        std: sample_std(values),
        min: sorted.first().copied(),
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile_sorted(&sorted(values), 0.5)
}

/// Sample standard deviation; needs at least two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Quantile `q` of an ascending slice, interpolating linearly between ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Pearson correlation over the pairs where both sides are present.
///
/// `None` with fewer than two complete pairs or when either side is constant.
pub fn pearson<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    let (xs, ys): (Vec<f64>, Vec<f64>) = pairs
        .into_iter()
        .filter_map(|(x, y)| Some((x?, y?)))
        .unzip();
    if xs.len() < 2 {
        return None;
    }

    let mean_x = mean(&xs)?;
    let mean_y = mean(&ys)?;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(&ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// `part / total * 100` rounded half-to-even to two decimals; `None` for an empty total.
pub fn percentage(part: usize, total: usize) -> Option<Decimal> {
    if total == 0 {
        return None;
    }
    Some((Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(2))
}

/// Rounds a float to `dp` decimals for display.
///
/// Rounds the exact binary value, so `2.675` (stored just below) becomes `2.67`.
pub fn round_dp(value: f64, dp: u32) -> Option<Decimal> {
    Decimal::from_f64_retain(value).map(|d| d.round_dp(dp))
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn describe_matches_dataframe_conventions() {
        let d = describe(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(d.count, 4);
        assert_eq!(d.mean, Some(2.5));
        assert!(close(d.std.unwrap(), 1.2909944487358056));
        assert_eq!(d.min, Some(1.0));
        assert_eq!(d.q1, Some(1.75));
        assert_eq!(d.median, Some(2.5));
        assert_eq!(d.q3, Some(3.25));
        assert_eq!(d.max, Some(4.0));
    }

    #[test]
    fn small_samples_leave_undefined_statistics_empty() {
        assert_eq!(describe(&[]), Distribution::default());
        let single = describe(&[7.0]);
        assert_eq!(single.median, Some(7.0));
        assert_eq!(single.std, None);
    }

    #[test]
    fn median_of_odd_and_even_samples() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median(&[5.0, 1.0, 3.0, 10.0]), Some(4.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn pearson_uses_pairwise_complete_observations() {
        let r = pearson(vec![
            (Some(1.0), Some(2.0)),
            (Some(2.0), None),
            (Some(3.0), Some(6.0)),
            (None, Some(1.0)),
            (Some(5.0), Some(10.0)),
        ]);
        assert!(close(r.unwrap(), 1.0));

        let negative = pearson(vec![(Some(1.0), Some(3.0)), (Some(2.0), Some(2.0)), (Some(3.0), Some(1.0))]);
        assert!(close(negative.unwrap(), -1.0));
    }

    #[test]
    fn pearson_is_undefined_for_constant_or_tiny_samples() {
        assert_eq!(pearson(vec![(Some(1.0), Some(2.0))]), None);
        assert_eq!(
            pearson(vec![(Some(1.0), Some(2.0)), (Some(1.0), Some(3.0))]),
            None
        );
    }

    #[test]
    fn percentages_round_to_two_decimals() {
        assert_eq!(percentage(1, 2), Some(dec!(50.00)));
        assert_eq!(percentage(1, 3), Some(dec!(33.33)));
        assert_eq!(percentage(2, 3), Some(dec!(66.67)));
        assert_eq!(percentage(0, 0), None);
        assert_eq!(round_dp(12.3456, 2), Some(dec!(12.35)));
    }

    #[test]
    fn rounding_uses_the_stored_binary_value() {
        assert_eq!(round_dp(2.675, 2), Some(dec!(2.67)));
        assert_eq!(round_dp(1.005, 2), Some(dec!(1.00)));
        assert_eq!(round_dp(0.125, 2), Some(dec!(0.12)));
        assert_eq!(round_dp(f64::NAN, 2), None);
    }
}
