// Volume moving average
use super::IndicatorCalculator;
use crate::models::RecentFirst;
use serde_json::Value;

pub struct VolumeMa {
    name: String,
    period: usize,
}

impl VolumeMa {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("VolumeMA({})", period),
            period,
        }
    }
}

impl Default for VolumeMa {
    fn default() -> Self {
        Self::new(20)
    }
}

impl IndicatorCalculator for VolumeMa {
    type Output = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    /// Undefined when the latest bar reports no volume (missing or zero). Older bars
    /// without volume count as zero.
    fn calculate(&self, candles: RecentFirst<'_>) -> Option<f64> {
        if self.period == 0 {
            return None;
        }
        let window = candles.window(self.period)?;
        match window[0].volume {
            Some(v) if v > 0.0 => {}
            _ => return None,
        }
        let sum: f64 = window.iter().map(|c| c.volume.unwrap_or(0.0)).sum();
        Some(sum / self.period as f64)
    }
}
