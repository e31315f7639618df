// Relative Strength Index (RSI) indicator implementation
use super::IndicatorCalculator;
use crate::models::RecentFirst;
use serde_json::Value;

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl IndicatorCalculator for Rsi {
    type Output = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    /// Plain averages over the latest `period` changes, no Wilder smoothing.
    /// Needs `period + 1` candles.
    fn calculate(&self, candles: RecentFirst<'_>) -> Option<f64> {
        if self.period == 0 {
            return None;
        }
        let window = candles.window(self.period.saturating_add(1))?;

        let mut gains = 0.0;
        let mut losses = 0.0;
        for pair in window.windows(2) {
            let change = pair[0].close - pair[1].close;
            if change > 0.0 {
                gains += change;
            } else if change < 0.0 {
                losses -= change; // losses are positive values
            }
        }

        let avg_gain = gains / self.period as f64;
        let avg_loss = losses / self.period as f64;

        if avg_loss == 0.0 {
            return Some(100.0); // Avoid division by zero; if no losses, RSI is 100
        }
        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candle::test_support::{series_from_closes, zigzag_closes};

    #[test]
    fn test_rsi_insufficient_data() {
        let series = series_from_closes(&[1.0; 14]); // 14 data points, 15 needed
        assert_eq!(Rsi::new(14).calculate(series.view()), None);
    }

    #[test]
    fn test_rsi_huge_period_is_undefined() {
        let series = series_from_closes(&[1.0; 20]);
        assert_eq!(Rsi::new(usize::MAX).calculate(series.view()), None);
    }

    #[test]
    fn test_rsi_all_gains() {
        let closes = (1..=20).map(|i| i as f64).collect::<Vec<_>>();
        let series = series_from_closes(&closes);
        assert_eq!(Rsi::new(14).calculate(series.view()), Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses() {
        let closes = (1..=20).map(|i| 30.0 - i as f64).collect::<Vec<_>>();
        let series = series_from_closes(&closes);
        // avg_gain is 0, so RS is 0 and RSI is 100 - 100 / 1 = 0
        assert_eq!(Rsi::new(14).calculate(series.view()), Some(0.0));
    }

    #[test]
    fn test_rsi_flat_series_saturates() {
        let series = series_from_closes(&[50.0; 20]);
        assert_eq!(Rsi::new(14).calculate(series.view()), Some(100.0));
    }

    #[test]
    fn test_rsi_zigzag_value() {
        // Changes alternate +0.54 / -0.46: gains 7 * 0.54, losses 7 * 0.46 over 14.
        let series = series_from_closes(&zigzag_closes(40, 100.0, 0.04, 0.5));
        let rsi = Rsi::default().calculate(series.view()).unwrap();
        let expected = 100.0 - 100.0 / (1.0 + 0.54 / 0.46);
        assert!((rsi - expected).abs() < 1e-9, "rsi = {}", rsi);
    }

    #[test]
    fn test_rsi_bounded() {
        let closes = [44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03, 45.61, 46.28, 46.28, 46.00];
        let series = series_from_closes(&closes);
        let rsi = Rsi::new(14).calculate(series.view()).unwrap();
        assert!((0.0..=100.0).contains(&rsi));
    }
}
