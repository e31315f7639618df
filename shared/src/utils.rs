// Text helpers shared by the signal narrative and the backtest report.

/// `Some(v)` rendered with two decimals, `None` as "N/A".
pub fn format_optional_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

/// Percentage change of `value` relative to `base`, e.g. `(sma50 - sma200) / sma200 * 100`.
pub fn percent_diff(value: f64, base: f64) -> f64 {
    (value - base) / base * 100.0
}
