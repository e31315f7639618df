// Engine command-line entry point
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use engine::config::{EngineSettings, OutputFormat};
use engine::data::{CandleSource, CsvCandleSource};
use engine::services::{calculate_indicator, format_backtest_result, BacktestService, IndicatorKind, SignalService};
use shared::models::{Signal, TimeframeConfig};
use shared::utils::format_optional_price;

#[derive(Parser, Debug)]
#[command(name = "engine", version, about = "Trend signals and backtests over CSV candle histories")]
struct Cli {
    /// JSON settings file; defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory with one <interval>.csv per timeframe (overrides the settings file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one signal per configured timeframe
    Signal,
    /// Replay the signal engine over recent history
    Backtest {
        #[arg(long)]
        interval: Option<String>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        lookback_days: Option<usize>,
    },
    /// Evaluate a single indicator on the latest candle
    Indicator {
        #[arg(long)]
        interval: String,
        #[arg(long, value_enum)]
        kind: IndicatorKind,
        /// Indicator parameters as JSON, e.g. '{"period": 50}'
        #[arg(long, default_value = "{}")]
        params: String,
        /// Candles to load before evaluating
        #[arg(long, default_value_t = 500)]
        count: usize,
    },
}

fn load_settings(cli: &Cli) -> Result<EngineSettings> {
    let mut settings = match &cli.config {
        Some(path) => EngineSettings::load(path).with_context(|| format!("loading settings from {}", path.display()))?,
        None => EngineSettings::default(),
    };
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(output) = cli.output {
        settings.output = output;
    }
    Ok(settings)
}

fn print_signal(signal: &Signal) {
    println!(
        "[{}] {} {} @ {:.2} ({})",
        signal.timeframe_label,
        signal.action.as_str(),
        signal.trend.as_str(),
        signal.price,
        signal.time.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(reason) = &signal.reason {
        println!("  {}", reason);
    }
    if signal.trade_plan().is_some() {
        println!("  SL: {}  TP: {}", format_optional_price(signal.sl), format_optional_price(signal.tp));
    }
    if let (Some(confidence), Some(risk)) = (signal.confidence, signal.risk_level) {
        println!("  Confidence: {}% ({:?} risk)", confidence, risk);
    }
    for line in signal.pattern_text.lines() {
        println!("  {}", line);
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let source = CsvCandleSource::new(settings.data_dir.clone());
    info!(data_dir = %settings.data_dir.display(), "Starting engine");

    match cli.command {
        Command::Signal => {
            let service = SignalService::new().with_history_size(settings.signal_history);
            let signals = service.generate_signals_for_timeframes(&source, &settings.timeframes).await;
            match settings.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&signals)?),
                OutputFormat::Text => signals.iter().for_each(print_signal),
            }
        }
        Command::Backtest { interval, label, lookback_days } => {
            let lookback_days = lookback_days.unwrap_or(settings.lookback_days);
            let service = BacktestService::new(source, SignalService::new());

            let runs = match interval {
                Some(interval) => {
                    let label = label.unwrap_or_else(|| {
                        settings
                            .timeframes
                            .iter()
                            .find(|tf| tf.interval == interval)
                            .map(|tf| tf.label.clone())
                            .unwrap_or_else(|| interval.clone())
                    });
                    let result = service
                        .run_backtest(&interval, &label, lookback_days)
                        .await
                        .with_context(|| format!("backtest on interval '{}'", interval))?;
                    vec![(TimeframeConfig::new(interval, label), result)]
                }
                None => service.run_backtests_for_timeframes(&settings.timeframes, lookback_days).await,
            };

            match settings.output {
                OutputFormat::Json => {
                    let reports: Vec<serde_json::Value> = runs
                        .iter()
                        .map(|(timeframe, result)| {
                            serde_json::json!({ "timeframe": timeframe, "lookbackDays": lookback_days, "result": result })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                }
                OutputFormat::Text => {
                    for (timeframe, result) in &runs {
                        println!("{}\n", format_backtest_result(result, &timeframe.label, lookback_days));
                    }
                }
            }
        }
        Command::Indicator { interval, kind, params, count } => {
            let params: serde_json::Value =
                serde_json::from_str(&params).with_context(|| format!("invalid JSON parameters: {}", params))?;
            let candles = source.fetch_candles(&interval, count).await?;
            let reading = calculate_indicator(kind, &params, candles.view())?;
            match settings.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reading)?),
                OutputFormat::Text => println!("{} {} = {}", reading.indicator, reading.parameters, reading.value),
            }
        }
    }

    Ok(())
}
