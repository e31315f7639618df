// Simple Moving Average (SMA) indicator implementation
use super::IndicatorCalculator;
use crate::models::RecentFirst;
use serde_json::Value;

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    type Output = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    /// Mean close of the `period` most recent candles.
    fn calculate(&self, candles: RecentFirst<'_>) -> Option<f64> {
        if self.period == 0 {
            return None;
        }
        let window = candles.window(self.period)?;
        let sum: f64 = window.iter().map(|c| c.close).sum();
        Some(sum / self.period as f64)
    }
}
