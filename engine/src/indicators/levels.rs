// Support and resistance from the recent trading range
use super::IndicatorCalculator;
use crate::models::RecentFirst;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Levels {
    pub support: f64,
    pub resistance: f64,
}

pub struct SupportResistance {
    name: String,
    lookback: usize,
}

impl SupportResistance {
    pub fn new(lookback: usize) -> Self {
        Self {
            name: format!("SupportResistance({})", lookback),
            lookback,
        }
    }
}

impl Default for SupportResistance {
    fn default() -> Self {
        Self::new(20)
    }
}

impl IndicatorCalculator for SupportResistance {
    type Output = Levels;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "lookback": self.lookback })
    }

    /// Lowest low and highest high of the `lookback` most recent candles.
    fn calculate(&self, candles: RecentFirst<'_>) -> Option<Levels> {
        if self.lookback == 0 {
            return None;
        }
        let window = candles.window(self.lookback)?;
        let support = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let resistance = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        Some(Levels { support, resistance })
    }
}
