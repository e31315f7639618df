// End-to-end runs over CSV files: source -> signal engine -> backtest -> JSON.
use chrono::{Duration, TimeZone, Utc};
use std::fmt::Write as _;
use std::fs;
use tempfile::TempDir;

use engine::config::EngineSettings;
use engine::data::{CandleSource, CsvCandleSource};
use engine::services::{backtest_series, BacktestService, SignalService};
use shared::models::{Action, SignalStatus, TimeframeConfig, Trend};

/// Hourly bars in file order (oldest first) following `close(t)`.
fn write_history(dir: &TempDir, interval: &str, len: usize, close: impl Fn(usize) -> f64) {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut csv = String::from("datetime,open,high,low,close,volume\n");
    let mut previous = close(0);
    for t in 0..len {
        let c = close(t);
        let ts = start + Duration::hours(t as i64);
        writeln!(
            csv,
            "{},{},{},{},{},1000",
            ts.format("%Y-%m-%d %H:%M:%S"),
            previous,
            previous.max(c) + 0.1,
            previous.min(c) - 0.1,
            c
        )
        .unwrap();
        previous = c;
    }
    fs::write(dir.path().join(format!("{}.csv", interval)), csv).unwrap();
}

fn rising_with_pullbacks(t: usize) -> f64 {
    100.0 + 0.04 * t as f64 + if t % 2 == 1 { 0.5 } else { 0.0 }
}

#[tokio::test]
async fn signals_for_configured_timeframes() {
    let dir = TempDir::new().unwrap();
    write_history(&dir, "1h", 300, rising_with_pullbacks);
    write_history(&dir, "4h", 120, |_| 100.0);

    let settings = EngineSettings::from_json(&format!(
        r#"{{ "data_dir": {:?}, "timeframes": [
            {{ "interval": "15min", "label": "15m" }},
            {{ "interval": "1h", "label": "1H" }},
            {{ "interval": "4h", "label": "4H" }}
        ] }}"#,
        dir.path().display().to_string()
    ))
    .unwrap();
    let source = CsvCandleSource::new(settings.data_dir.clone());

    let signals = SignalService::new()
        .with_history_size(settings.signal_history)
        .generate_signals_for_timeframes(&source, &settings.timeframes)
        .await;

    assert_eq!(signals.len(), 3);

    // no 15min.csv
    assert_eq!(signals[0].timeframe_label, "15m");
    assert_eq!(signals[0].status, SignalStatus::NoSignal);
    assert_eq!(signals[0].reason.as_deref(), Some("Failed to fetch data"));

    assert_eq!(signals[1].timeframe_label, "1H");
    assert_eq!(signals[1].trend, Trend::Uptrend);
    assert_eq!(signals[1].action, Action::Buy);
    let plan = signals[1].trade_plan().unwrap();
    assert!(plan.sl < plan.entry && plan.entry < plan.tp);

    // 120 bars is not enough for SMA200
    assert_eq!(signals[2].status, SignalStatus::NoSignal);
    assert_eq!(signals[2].action, Action::Wait);
    assert_eq!(signals[2].reason.as_deref(), Some("Need at least 200 candles for SMA200"));

    let json = serde_json::to_value(&signals).unwrap();
    assert_eq!(json[0]["status"], "NO_SIGNAL");
    assert_eq!(json[1]["action"], "BUY");
    assert_eq!(json[1]["trend"], "UPTREND");
    assert!(json[1]["timeframeLabel"].is_string());
    assert!(json[1]["indicators"]["volumeMA"].is_number());
    assert!(json[1]["patternText"].as_str().unwrap().starts_with("STRONG BUY SIGNAL"));
}

#[tokio::test]
async fn backtest_over_csv_matches_in_memory_run() {
    let dir = TempDir::new().unwrap();
    write_history(&dir, "1h", 520, rising_with_pullbacks);
    let source = CsvCandleSource::new(dir.path());

    let service = BacktestService::new(source.clone(), SignalService::new());
    let result = service.run_backtest("1h", "1H", 30).await.unwrap();

    // 30 days of hourly bars is capped at 500 candles: windows 200..=480
    assert_eq!(result.total_signals, 29);
    assert_eq!(result.total_trades, result.winning_trades + result.losing_trades);
    assert_eq!(result.equity_curve.len(), result.total_trades);
    assert!(result.max_drawdown >= 0.0);

    let candles = source.fetch_candles("1h", 500).await.unwrap();
    let direct = backtest_series(&SignalService::new(), &candles, "1H").unwrap();
    assert_eq!(result, direct);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["totalSignals"], 29);
    assert!(json["equityCurve"].is_array());
    assert!(json["signals"][0]["entryPrice"].is_number());
}

#[tokio::test]
async fn unknown_interval_fails_backtest() {
    let dir = TempDir::new().unwrap();
    let service = BacktestService::new(CsvCandleSource::new(dir.path()), SignalService::new());
    let err = service.run_backtest("1day", "1D", 30).await.unwrap_err();
    assert!(err.is_upstream());
}

#[tokio::test]
async fn backtest_all_timeframes_skips_missing_csv() {
    let dir = TempDir::new().unwrap();
    write_history(&dir, "1h", 520, rising_with_pullbacks);
    write_history(&dir, "4h", 250, |_| 100.0);
    let timeframes = vec![
        TimeframeConfig::new("15min", "15m"),
        TimeframeConfig::new("1h", "1H"),
        TimeframeConfig::new("4h", "4H"),
    ];

    let service = BacktestService::new(CsvCandleSource::new(dir.path()), SignalService::new());
    let runs = service.run_backtests_for_timeframes(&timeframes, 30).await;

    // no 15min.csv: skipped, the other two still run
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].0, timeframes[1]);
    assert_eq!(runs[0].1.total_signals, 29);
    assert_eq!(runs[1].0, timeframes[2]);
    assert_eq!(runs[1].1.total_signals, 4);
    assert_eq!(runs[1].1.total_trades, 0);
}

#[test]
fn timeframe_config_from_settings_json() {
    let settings = EngineSettings::from_json(r#"{ "timeframes": [{ "interval": "1day", "label": "1D" }] }"#).unwrap();
    assert_eq!(settings.timeframes, vec![TimeframeConfig::new("1day", "1D")]);
}
