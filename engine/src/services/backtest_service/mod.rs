// Backtest simulator: replays the signal engine over sliding windows of one candle history.
pub mod metrics;
pub mod report;
pub mod simulate_trade;

use tracing::{debug, info, warn};

use crate::data::source::CandleSource;
use crate::error::EngineError;
use crate::models::CandleSeries;
use crate::services::signal_service::{SignalService, MIN_HISTORY};
use metrics::EquityTracker;
use shared::models::{Action, BacktestEntry, BacktestResult, TimeframeConfig, TradeResult};
use simulate_trade::simulate_trade;

pub use report::format_backtest_result;

/// Upper bound on candles fetched for one run.
pub const MAX_BACKTEST_CANDLES: usize = 500;
pub const WINDOW_STEP: usize = 10;
/// Windows are not started within this many bars of the end of the series.
pub const TAIL_MARGIN: usize = 10;
const HOURS_PER_DAY: usize = 24;

pub struct BacktestService<S> {
    source: S,
    signal_service: SignalService,
}

impl<S: CandleSource> BacktestService<S> {
    pub fn new(source: S, signal_service: SignalService) -> Self {
        Self { source, signal_service }
    }

    pub async fn run_backtest(
        &self,
        interval: &str,
        timeframe_label: &str,
        lookback_days: usize,
    ) -> Result<BacktestResult, EngineError> {
        let outputsize = lookback_days.saturating_mul(HOURS_PER_DAY).min(MAX_BACKTEST_CANDLES);
        info!(interval, timeframe = timeframe_label, lookback_days, outputsize, "Starting backtest");

        let candles = self.source.fetch_candles(interval, outputsize).await?;
        let result = backtest_series(&self.signal_service, &candles, timeframe_label)?;

        info!(
            timeframe = timeframe_label,
            total_signals = result.total_signals,
            total_trades = result.total_trades,
            total_profit = result.total_profit,
            "Backtest finished"
        );
        Ok(result)
    }

    /// Backtests every timeframe in order. A timeframe that fails is logged and left out;
    /// the remaining timeframes still run.
    pub async fn run_backtests_for_timeframes(
        &self,
        timeframes: &[TimeframeConfig],
        lookback_days: usize,
    ) -> Vec<(TimeframeConfig, BacktestResult)> {
        let mut results = Vec::with_capacity(timeframes.len());
        for timeframe in timeframes {
            match self.run_backtest(&timeframe.interval, &timeframe.label, lookback_days).await {
                Ok(result) => results.push((timeframe.clone(), result)),
                Err(err) => {
                    warn!(timeframe = %timeframe.label, interval = %timeframe.interval, error = %err, "Backtest failed")
                }
            }
        }
        results
    }
}

/// Pure simulation over an already fetched series. Windows start at index 200 and advance by
/// 10 while at least 10 bars remain after the start.
pub fn backtest_series(
    signal_service: &SignalService,
    candles: &CandleSeries,
    timeframe_label: &str,
) -> Result<BacktestResult, EngineError> {
    let view = candles.view();
    let mut entries = Vec::new();
    let mut equity = EquityTracker::new();
    let mut profits = Vec::new();
    let (mut wins, mut losses) = (0usize, 0usize);

    let mut start = MIN_HISTORY;
    while start + TAIL_MARGIN < view.len() {
        let signal = signal_service.generate_signal(view.skip(start), timeframe_label)?;

        let entry = match signal.trade_plan() {
            Some(plan) => match simulate_trade(&plan, view, start) {
                Some(outcome) => {
                    equity.record(outcome.profit);
                    profits.push(outcome.profit);
                    match outcome.result {
                        TradeResult::Win => wins += 1,
                        _ => losses += 1,
                    }
                    debug!(start, action = plan.action.as_str(), profit = outcome.profit, "Backtest trade closed");
                    BacktestEntry {
                        date: signal.time,
                        action: plan.action,
                        entry_price: plan.entry,
                        exit_price: Some(outcome.exit_price),
                        sl: Some(plan.sl),
                        tp: Some(plan.tp),
                        profit: Some(outcome.profit),
                        profit_percent: Some(outcome.profit_percent),
                        result: Some(outcome.result),
                    }
                }
                None => BacktestEntry {
                    date: signal.time,
                    action: plan.action,
                    entry_price: plan.entry,
                    exit_price: None,
                    sl: Some(plan.sl),
                    tp: Some(plan.tp),
                    profit: None,
                    profit_percent: None,
                    result: Some(TradeResult::Open),
                },
            },
            None => BacktestEntry {
                date: signal.time,
                action: signal.action,
                entry_price: signal.price,
                exit_price: None,
                sl: None,
                tp: None,
                profit: None,
                profit_percent: None,
                result: None,
            },
        };
        entries.push(entry);
        start += WINDOW_STEP;
    }

    let count = |action: Action| entries.iter().filter(|e| e.action == action).count();
    let buy_signals = count(Action::Buy);
    let sell_signals = count(Action::Sell);
    let wait_signals = count(Action::Wait);

    Ok(BacktestResult {
        total_signals: entries.len(),
        buy_signals,
        sell_signals,
        wait_signals,
        win_rate: metrics::win_rate(wins, losses),
        total_trades: wins + losses,
        winning_trades: wins,
        losing_trades: losses,
        total_profit: equity.total(),
        average_profit: metrics::mean(&profits),
        max_drawdown: equity.max_drawdown(),
        sharpe_ratio: metrics::sharpe_ratio(&profits),
        signals: entries,
        equity_curve: equity.into_curve(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::market_data::MarketDataStore;
    use crate::models::candle::test_support::{series_from_closes, zigzag_closes};

    fn rising_history() -> CandleSeries {
        series_from_closes(&zigzag_closes(500, 100.0, 0.04, 0.5))
    }

    #[test]
    fn test_rising_history_backtest() {
        let result = backtest_series(&SignalService::new(), &rising_history(), "1H").unwrap();

        // windows at 200, 210, ..., 480; from 310 on fewer than 200 bars remain
        assert_eq!(result.total_signals, 29);
        assert_eq!(result.buy_signals, 11);
        assert_eq!(result.sell_signals, 0);
        assert_eq!(result.wait_signals, 18);

        // older bars sit lower, so every long is stopped out one percent down
        assert_eq!(result.total_trades, 11);
        assert_eq!(result.winning_trades, 0);
        assert_eq!(result.losing_trades, 11);
        assert_eq!(result.win_rate, 0.0);
        assert!((result.total_profit + 12.1506).abs() < 1e-6, "total = {}", result.total_profit);
        assert!((result.max_drawdown - 12.1506).abs() < 1e-6);
        assert!(result.sharpe_ratio < 0.0);

        for entry in result.signals.iter().filter(|e| e.action == Action::Buy) {
            assert_eq!(entry.result, Some(TradeResult::Loss));
            assert_eq!(entry.exit_price, entry.sl);
            assert!((entry.profit_percent.unwrap() + 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_backtest_is_idempotent() {
        let candles = rising_history();
        let service = SignalService::new();
        let first = backtest_series(&service, &candles, "1H").unwrap();
        let second = backtest_series(&service, &candles, "1H").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_drawdown_follows_equity_curve() {
        let result = backtest_series(&SignalService::new(), &rising_history(), "1H").unwrap();
        assert_eq!(result.equity_curve.len(), result.total_trades);

        let mut peak: f64 = 0.0;
        let mut worst: f64 = 0.0;
        for &total in &result.equity_curve {
            peak = peak.max(total);
            assert!(peak - total >= 0.0);
            worst = worst.max(peak - total);
        }
        assert_eq!(result.max_drawdown, worst);
        assert!(result.max_drawdown >= 0.0);
    }

    #[test]
    fn test_flat_history_only_waits() {
        let result = backtest_series(&SignalService::new(), &series_from_closes(&vec![100.0; 250]), "1H").unwrap();
        assert_eq!(result.total_signals, 4);
        assert_eq!(result.wait_signals, 4);
        assert_eq!(result.total_trades, 0);
        assert_eq!(result.win_rate, 0.0);
        assert_eq!(result.average_profit, 0.0);
        assert_eq!(result.sharpe_ratio, 0.0);
        assert!(result.signals.iter().all(|e| e.result.is_none() && e.sl.is_none()));
    }

    #[test]
    fn test_short_history_has_no_windows() {
        let result = backtest_series(&SignalService::new(), &series_from_closes(&vec![100.0; 210]), "1H").unwrap();
        assert_eq!(result.total_signals, 0);
        assert!(result.equity_curve.is_empty());
    }

    #[tokio::test]
    async fn test_run_backtest_caps_fetch_size() {
        let mut store = MarketDataStore::new();
        store.insert("1h", series_from_closes(&zigzag_closes(600, 100.0, 0.04, 0.5)));
        let service = BacktestService::new(store, SignalService::new());

        // 30 days of hourly bars is capped at 500
        let capped = service.run_backtest("1h", "1H", 30).await.unwrap();
        assert_eq!(capped.total_signals, 29);

        // 10 days is 240 bars: windows at 200, 210, 220
        let short = service.run_backtest("1h", "1H", 10).await.unwrap();
        assert_eq!(short.total_signals, 3);
    }

    #[tokio::test]
    async fn test_timeframe_backtests_skip_failures() {
        let mut store = MarketDataStore::new();
        store.insert("1h", series_from_closes(&zigzag_closes(500, 100.0, 0.04, 0.5)));
        store.insert("4h", series_from_closes(&vec![100.0; 250]));
        let service = BacktestService::new(store, SignalService::new());

        let timeframes = vec![
            TimeframeConfig::new("15min", "15m"),
            TimeframeConfig::new("1h", "1H"),
            TimeframeConfig::new("4h", "4H"),
        ];
        let results = service.run_backtests_for_timeframes(&timeframes, 30).await;

        let labels: Vec<&str> = results.iter().map(|(tf, _)| tf.label.as_str()).collect();
        assert_eq!(labels, vec!["1H", "4H"]);
        assert_eq!(results[0].1.total_signals, 29);
        assert_eq!(results[1].1.wait_signals, 4);
    }

    #[tokio::test]
    async fn test_run_backtest_propagates_fetch_failure() {
        let service = BacktestService::new(MarketDataStore::new(), SignalService::new());
        let err = service.run_backtest("1h", "1H", 30).await.unwrap_err();
        assert!(err.is_upstream());
    }
}
