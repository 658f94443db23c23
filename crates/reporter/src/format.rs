//! Text formatting shared by the console tables and chart labels.

use rust_decimal::Decimal;

const MISSING: &str = "n/a";

/// `12000000.5` -> `12,000,000.50`.
pub fn amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (integral, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integral.len() + integral.len() / 3);
    for (i, digit) in integral.chars().enumerate() {
        if i > 0 && (integral.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

pub fn opt_amount(value: Option<f64>) -> String {
    value.map(amount).unwrap_or_else(|| MISSING.to_string())
}

/// Correlations and ratios, four decimals.
pub fn ratio(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.4}"))
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn percent(value: Option<Decimal>) -> String {
    value
        .map(|v| format!("{v:.2}%"))
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn text(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_string()
}
