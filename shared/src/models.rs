use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar. `volume` is absent for sources that do not report it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

/// A timeframe to evaluate: `interval` is the key handed to the candle source,
/// `label` is the tag carried by the resulting signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeConfig {
    pub interval: String,
    pub label: String,
}

impl TimeframeConfig {
    pub fn new(interval: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            interval: interval.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideway,
}

impl Trend {
    pub fn is_directional(self) -> bool {
        !matches!(self, Trend::Sideway)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Uptrend => "UPTREND",
            Trend::Downtrend => "DOWNTREND",
            Trend::Sideway => "SIDEWAY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Wait,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Wait => "WAIT",
        }
    }
}

/// Derived from confidence: a higher confidence maps to a lower risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStatus {
    Ok,
    NoSignal,
}

/// Indicator values observed when the signal was generated.
/// Every field is independently optional: each indicator has its own history requirement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub volume: Option<f64>,
    #[serde(rename = "volumeMA")]
    pub volume_ma: Option<f64>,
    pub support_level: Option<f64>,
    pub resistance_level: Option<f64>,
}

/// Entry and exit levels of an actionable signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradePlan {
    pub action: Action,
    pub entry: f64,
    pub sl: f64,
    pub tp: f64,
}

/// The engine's verdict for one timeframe at one evaluation instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub timeframe_label: String,
    pub time: DateTime<Utc>,
    pub price: f64,
    pub trend: Trend,
    pub action: Action,
    pub sl: Option<f64>,
    pub tp: Option<f64>,
    pub pattern_text: String,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub status: SignalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_strategy: Option<String>,
}

impl Signal {
    /// The trade this signal calls for, if any. WAIT signals and signals
    /// missing either level have no plan.
    pub fn trade_plan(&self) -> Option<TradePlan> {
        if self.action == Action::Wait {
            return None;
        }
        match (self.sl, self.tp) {
            (Some(sl), Some(tp)) => Some(TradePlan {
                action: self.action,
                entry: self.price,
                sl,
                tp,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeResult {
    Win,
    Loss,
    Open,
}

/// One evaluation point of a backtest. Only actionable entries carry trade fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestEntry {
    pub date: DateTime<Utc>,
    pub action: Action,
    pub entry_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TradeResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    pub total_signals: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub wait_signals: usize,
    pub win_rate: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub total_profit: f64,
    pub average_profit: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub signals: Vec<BacktestEntry>,
    /// Cumulative realized profit after each closed trade.
    pub equity_curve: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_signal() -> Signal {
        Signal {
            timeframe_label: "1H".to_string(),
            time: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            price: 100.0,
            trend: Trend::Sideway,
            action: Action::Wait,
            sl: None,
            tp: None,
            pattern_text: String::new(),
            sma50: None,
            sma200: None,
            status: SignalStatus::NoSignal,
            reason: Some("Need at least 200 candles for SMA200".to_string()),
            indicators: None,
            confidence: None,
            risk_level: None,
            entry_reason: None,
            exit_strategy: None,
        }
    }

    #[test]
    fn test_trade_plan_requires_action_and_levels() {
        let mut signal = wait_signal();
        assert!(signal.trade_plan().is_none());

        signal.action = Action::Buy;
        signal.sl = Some(99.0);
        assert!(signal.trade_plan().is_none(), "tp missing");

        signal.tp = Some(102.5);
        let plan = signal.trade_plan().unwrap();
        assert_eq!(plan.action, Action::Buy);
        assert_eq!(plan.entry, 100.0);
        assert_eq!(plan.sl, 99.0);
        assert_eq!(plan.tp, 102.5);
    }

    #[test]
    fn test_signal_serializes_with_wire_names() {
        let json = serde_json::to_value(wait_signal()).unwrap();
        assert_eq!(json["timeframeLabel"], "1H");
        assert_eq!(json["status"], "NO_SIGNAL");
        assert_eq!(json["action"], "WAIT");
        assert_eq!(json["trend"], "SIDEWAY");
        assert!(json["sl"].is_null());
        assert!(json.get("confidence").is_none());
    }

    #[test]
    fn test_indicator_snapshot_volume_ma_name() {
        let snapshot = IndicatorSnapshot { volume_ma: Some(12.0), ..Default::default() };
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["volumeMA"], 12.0);
        assert!(json["macdHistogram"].is_null());
    }
}
