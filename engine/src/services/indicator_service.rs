// Single-indicator evaluation on demand, driven by a kind name and JSON parameters.
use serde::Serialize;
use serde_json::Value;

use crate::error::EngineError;
use crate::indicators::{Ema, IndicatorCalculator, Macd, Rsi, Sma, SupportResistance, VolumeMa};
use crate::models::RecentFirst;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    VolumeMa,
    Levels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorReading {
    pub indicator: String,
    pub parameters: Value,
    pub value: Value,
}

fn usize_param(params: &Value, key: &str, default: usize) -> Result<usize, EngineError> {
    let value = match params.get(key) {
        None | Some(Value::Null) => default,
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| EngineError::IndicatorError(format!("Parameter '{}' must be a non-negative integer that fits in usize", key)))?,
    };
    if value == 0 {
        return Err(EngineError::IndicatorError(format!("Indicator {} cannot be 0", key)));
    }
    Ok(value)
}

fn required_history(base: usize, extra: usize) -> Result<usize, EngineError> {
    base.checked_add(extra)
        .ok_or_else(|| EngineError::IndicatorError(format!("Indicator period {} is too large", base)))
}

fn evaluate<C>(calculator: C, needed: usize, candles: RecentFirst<'_>) -> Result<IndicatorReading, EngineError>
where
    C: IndicatorCalculator,
    C::Output: Serialize,
{
    if candles.len() < needed {
        return Err(EngineError::InsufficientHistory { needed, available: candles.len() });
    }
    let output = calculator
        .calculate(candles)
        .ok_or_else(|| EngineError::IndicatorError(format!("{} is undefined for the latest candle", calculator.name())))?;
    let value = serde_json::to_value(output).map_err(|e| EngineError::IndicatorError(e.to_string()))?;

    Ok(IndicatorReading {
        indicator: calculator.name().to_string(),
        parameters: calculator.parameters(),
        value,
    })
}

/// Builds the calculator for `kind` from `params` and evaluates it on the latest bar.
/// Missing parameters fall back to the defaults the signal engine uses.
pub fn calculate_indicator(kind: IndicatorKind, params: &Value, candles: RecentFirst<'_>) -> Result<IndicatorReading, EngineError> {
    if !(params.is_object() || params.is_null()) {
        return Err(EngineError::IndicatorError("Indicator parameters must be a JSON object".to_string()));
    }
    tracing::debug!(?kind, %params, available = candles.len(), "Calculating indicator");

    match kind {
        IndicatorKind::Sma => {
            let period = usize_param(params, "period", 20)?;
            evaluate(Sma::new(period), period, candles)
        }
        IndicatorKind::Ema => {
            let period = usize_param(params, "period", 20)?;
            evaluate(Ema::new(period), period, candles)
        }
        IndicatorKind::Rsi => {
            let period = usize_param(params, "period", 14)?;
            evaluate(Rsi::new(period), required_history(period, 1)?, candles)
        }
        IndicatorKind::Macd => {
            let fast = usize_param(params, "fast", 12)?;
            let slow = usize_param(params, "slow", 26)?;
            let signal = usize_param(params, "signal", 9)?;
            if fast >= slow {
                return Err(EngineError::IndicatorError(format!(
                    "MACD fast period ({}) must be shorter than slow period ({})",
                    fast, slow
                )));
            }
            evaluate(Macd::new(fast, slow, signal), required_history(slow, signal)?, candles)
        }
        IndicatorKind::VolumeMa => {
            let period = usize_param(params, "period", 20)?;
            evaluate(VolumeMa::new(period), period, candles)
        }
        IndicatorKind::Levels => {
            let lookback = usize_param(params, "lookback", 20)?;
            evaluate(SupportResistance::new(lookback), lookback, candles)
        }
    }
}
