// Engine settings, loaded from a JSON file or taken from defaults.
use serde::Deserialize;
use shared::models::TimeframeConfig;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Directory holding one `<interval>.csv` per timeframe.
    pub data_dir: PathBuf,
    pub timeframes: Vec<TimeframeConfig>,
    pub lookback_days: usize,
    pub output: OutputFormat,
    /// Candles requested per timeframe when generating signals.
    pub signal_history: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            data_dir: PathBuf::from("data"),
            timeframes: vec![
                TimeframeConfig::new("15min", "15m"),
                TimeframeConfig::new("1h", "1H"),
                TimeframeConfig::new("4h", "4H"),
            ],
            lookback_days: 30,
            output: OutputFormat::Text,
            signal_history: 200,
        }
    }
}

impl EngineSettings {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings =
            serde_json::from_str(json).map_err(|e| EngineError::ConfigError(format!("invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        info!(path = %path.display(), timeframes = settings.timeframes.len(), "Loaded engine settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.timeframes.is_empty() {
            return Err(EngineError::ConfigError("at least one timeframe is required".to_string()));
        }
        if let Some(tf) = self.timeframes.iter().find(|tf| tf.interval.trim().is_empty() || tf.label.trim().is_empty()) {
            return Err(EngineError::ConfigError(format!("timeframe {:?} needs an interval and a label", tf)));
        }
        if self.lookback_days == 0 {
            return Err(EngineError::ConfigError("lookback_days must be positive".to_string()));
        }
        if self.signal_history == 0 {
            return Err(EngineError::ConfigError("signal_history must be positive".to_string()));
        }
        Ok(())
    }
}
