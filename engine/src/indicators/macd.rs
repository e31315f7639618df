// Moving Average Convergence Divergence (MACD)
//
// The signal line is NOT an EMA of the MACD series. It is the plain mean of the MACD line
// recomputed on `signal_period` views shifted 0, 1, .. bars back in time. Histogram-based
// decisions depend on this exact value, so it must not be swapped for the textbook form.
use super::{Ema, IndicatorCalculator};
use crate::models::RecentFirst;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdValue {
    pub line: f64,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

pub struct Macd {
    name: String,
    fast: Ema,
    slow: Ema,
    slow_period: usize,
    fast_period: usize,
    signal_period: usize,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            name: format!("MACD({},{},{})", fast_period, slow_period, signal_period),
            fast: Ema::new(fast_period),
            slow: Ema::new(slow_period),
            fast_period,
            slow_period,
            signal_period,
        }
    }

    fn line(&self, candles: RecentFirst<'_>) -> Option<f64> {
        let fast = self.fast.calculate(candles)?;
        let slow = self.slow.calculate(candles)?;
        Some(fast - slow)
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl IndicatorCalculator for Macd {
    type Output = MacdValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "fast": self.fast_period,
            "slow": self.slow_period,
            "signal": self.signal_period,
        })
    }

    fn calculate(&self, candles: RecentFirst<'_>) -> Option<MacdValue> {
        if candles.len() < self.slow_period.saturating_add(self.signal_period) {
            return None;
        }
        let line = self.line(candles)?;

        let shifted: Vec<f64> = (0..self.signal_period)
            .filter_map(|offset| self.line(candles.skip(offset)))
            .collect();
        let signal = if shifted.is_empty() {
            None
        } else {
            Some(shifted.iter().sum::<f64>() / shifted.len() as f64)
        };

        Some(MacdValue {
            line,
            signal,
            histogram: signal.map(|s| line - s),
        })
    }
}
