// Signal engine: turns a most-recent-first candle view into one `Signal`.
//
// Submodules hold the scoring rule and the rationale text; this file wires the indicators
// together and owns the multi-timeframe batch.

pub mod narrative;
pub mod scoring;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::data::source::CandleSource;
use crate::error::EngineError;
use crate::indicators::{
    calculate_buy_sl_tp, calculate_sell_sl_tp, determine_trend, IndicatorCalculator, Macd, Rsi, Sma,
    SupportResistance, VolumeMa,
};
use crate::models::RecentFirst;
use scoring::MarketReading;
use shared::models::{Action, IndicatorSnapshot, Signal, SignalStatus, TimeframeConfig, Trend};
use shared::utils::percent_diff;

/// Bars needed before any signal can be produced (the SMA200 window).
pub const MIN_HISTORY: usize = 200;
/// Bars requested per timeframe by the batch.
pub const DEFAULT_HISTORY_SIZE: usize = 200;
pub const RISK_PERCENT: f64 = 1.0;
pub const REWARD_PERCENT: f64 = 2.5;

pub struct SignalService {
    sma50: Sma,
    sma200: Sma,
    rsi: Rsi,
    macd: Macd,
    volume_ma: VolumeMa,
    levels: SupportResistance,
    history_size: usize,
}

impl SignalService {
    pub fn new() -> Self {
        Self {
            sma50: Sma::new(50),
            sma200: Sma::new(MIN_HISTORY),
            rsi: Rsi::new(14),
            macd: Macd::new(12, 26, 9),
            volume_ma: VolumeMa::new(20),
            levels: SupportResistance::new(20),
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }

    /// Number of candles the batch asks the source for.
    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    pub fn generate_signal(&self, candles: RecentFirst<'_>, timeframe_label: &str) -> Result<Signal, EngineError> {
        let latest = candles.latest().ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "cannot generate a {} signal from an empty candle sequence",
                timeframe_label
            ))
        })?;

        let sma50 = self.sma50.calculate(candles);
        let sma200 = self.sma200.calculate(candles);
        let (Some(sma50_value), Some(sma200_value)) = (sma50, sma200) else {
            debug!(timeframe = timeframe_label, available = candles.len(), "Not enough history for a signal");
            return Ok(Signal {
                timeframe_label: timeframe_label.to_string(),
                time: latest.timestamp,
                price: latest.close,
                trend: Trend::Sideway,
                action: Action::Wait,
                sl: None,
                tp: None,
                pattern_text: "Not enough data for analysis".to_string(),
                sma50,
                sma200,
                status: SignalStatus::NoSignal,
                reason: Some(format!("Need at least {} candles for SMA200", MIN_HISTORY)),
                indicators: None,
                confidence: None,
                risk_level: None,
                entry_reason: None,
                exit_strategy: None,
            });
        };

        let rsi = self.rsi.calculate(candles);
        let macd = self.macd.calculate(candles);
        let volume_ma = self.volume_ma.calculate(candles);
        let volume_ratio = match (latest.volume, volume_ma) {
            (Some(volume), Some(average)) if volume > 0.0 && average > 0.0 => Some(volume / average),
            _ => None,
        };
        let levels = self.levels.calculate(candles);
        let trend = determine_trend(sma50, sma200);
        let price = latest.close;

        let reading = MarketReading {
            trend,
            rsi,
            macd_line: macd.map(|m| m.line),
            macd_histogram: macd.and_then(|m| m.histogram),
            volume_ratio,
            price_deviation: percent_diff(price, sma50_value),
        };

        let mut action = Action::Wait;
        let mut stops = None;
        let pattern_text = match scoring::score_entry(&reading) {
            Some(score) if scoring::entry_allowed(&reading, &score) => {
                let levels_for_entry = if trend == Trend::Uptrend {
                    action = Action::Buy;
                    calculate_buy_sl_tp(price, RISK_PERCENT, REWARD_PERCENT)
                } else {
                    action = Action::Sell;
                    calculate_sell_sl_tp(price, RISK_PERCENT, REWARD_PERCENT)
                };
                stops = Some(levels_for_entry);
                narrative::entry_pattern(action, price, sma50_value, sma200_value, levels, &score)
            }
            Some(score) => narrative::pending_entry_pattern(trend, reading.price_deviation, &score),
            None => narrative::sideways_pattern(sma50_value, sma200_value),
        };

        let (confidence, risk_level, entry_reason, exit_strategy) = match stops {
            Some(stops) => {
                let confidence = scoring::confidence(&reading);
                (
                    confidence,
                    Some(scoring::risk_level(confidence)),
                    Some(narrative::entry_reason(action, &reading)),
                    Some(narrative::exit_strategy(action, stops, price)),
                )
            }
            None => (0, None, None, None),
        };

        debug!(
            timeframe = timeframe_label,
            trend = trend.as_str(),
            action = action.as_str(),
            price,
            price_deviation = reading.price_deviation,
            confidence,
            "Signal evaluated"
        );

        Ok(Signal {
            timeframe_label: timeframe_label.to_string(),
            time: latest.timestamp,
            price,
            trend,
            action,
            sl: stops.map(|s| s.sl),
            tp: stops.map(|s| s.tp),
            pattern_text,
            sma50,
            sma200,
            status: SignalStatus::Ok,
            reason: None,
            indicators: Some(IndicatorSnapshot {
                rsi,
                macd: reading.macd_line,
                macd_signal: macd.and_then(|m| m.signal),
                macd_histogram: reading.macd_histogram,
                volume: latest.volume.filter(|v| *v > 0.0),
                volume_ma,
                support_level: levels.map(|l| l.support),
                resistance_level: levels.map(|l| l.resistance),
            }),
            confidence: Some(confidence),
            risk_level,
            entry_reason,
            exit_strategy,
        })
    }

    /// Evaluates every timeframe in configuration order. A timeframe whose candles cannot be
    /// fetched yields a NO_SIGNAL error signal; the rest of the batch still runs.
    pub async fn generate_signals_for_timeframes<S>(&self, source: &S, timeframes: &[TimeframeConfig]) -> Vec<Signal>
    where
        S: CandleSource + ?Sized,
    {
        let mut signals = Vec::with_capacity(timeframes.len());

        for timeframe in timeframes {
            let evaluated = source
                .fetch_candles(&timeframe.interval, self.history_size)
                .await
                .and_then(|series| {
                    if series.is_empty() {
                        return Err(EngineError::UpstreamFetch(format!(
                            "no candles returned for interval '{}'",
                            timeframe.interval
                        )));
                    }
                    self.generate_signal(series.view(), &timeframe.label)
                });

            match evaluated {
                Ok(signal) => {
                    info!(
                        timeframe = %timeframe.label,
                        action = signal.action.as_str(),
                        price = signal.price,
                        "Generated signal"
                    );
                    signals.push(signal);
                }
                Err(err) => {
                    warn!(timeframe = %timeframe.label, interval = %timeframe.interval, error = %err, "Failed to generate signal");
                    signals.push(fetch_failure_signal(&timeframe.label, &err));
                }
            }
        }

        signals
    }
}

impl Default for SignalService {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch_failure_signal(timeframe_label: &str, err: &EngineError) -> Signal {
    Signal {
        timeframe_label: timeframe_label.to_string(),
        time: Utc::now(),
        price: 0.0,
        trend: Trend::Sideway,
        action: Action::Wait,
        sl: None,
        tp: None,
        pattern_text: format!("Error: {}", err),
        sma50: None,
        sma200: None,
        status: SignalStatus::NoSignal,
        reason: Some("Failed to fetch data".to_string()),
        indicators: None,
        confidence: None,
        risk_level: None,
        entry_reason: None,
        exit_strategy: None,
    }
}
