// Exponential Moving Average (EMA) indicator implementation
use super::IndicatorCalculator;
use crate::models::RecentFirst;
use serde_json::Value;

pub struct Ema {
    name: String,
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Ema {
    type Output = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    /// Seeds with the oldest close inside the window (index `period - 1`) and walks
    /// forward in time to the latest bar. No SMA seed: only `period` bars are read.
    fn calculate(&self, candles: RecentFirst<'_>) -> Option<f64> {
        if self.period == 0 {
            return None;
        }
        let window = candles.window(self.period)?;
        let multiplier = 2.0 / (self.period as f64 + 1.0);

        let mut ema = window[self.period - 1].close;
        for candle in window[..self.period - 1].iter().rev() {
            ema = (candle.close - ema) * multiplier + ema;
        }
        Some(ema)
    }
}
