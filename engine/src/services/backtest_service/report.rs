// Plain-text rendering of a backtest run.
use std::fmt::{self, Write};

use shared::models::{BacktestEntry, BacktestResult, TradeResult};
use shared::utils::format_optional_price;

const RECENT_TRADES: usize = 5;
const RULE: &str = "------------------------------";

fn recent_closed_trades(result: &BacktestResult) -> Vec<&BacktestEntry> {
    let closed: Vec<&BacktestEntry> = result
        .signals
        .iter()
        .filter(|entry| matches!(entry.result, Some(TradeResult::Win | TradeResult::Loss)))
        .collect();
    closed.into_iter().rev().take(RECENT_TRADES).collect()
}

pub fn format_backtest_result(result: &BacktestResult, timeframe_label: &str, lookback_days: usize) -> String {
    let mut out = String::new();
    // String sinks never return fmt::Error.
    let _ = write_report(&mut out, result, timeframe_label, lookback_days);
    out
}

fn write_report(out: &mut impl Write, result: &BacktestResult, timeframe_label: &str, lookback_days: usize) -> fmt::Result {
    writeln!(out, "BACKTEST RESULTS")?;
    writeln!(out, "Timeframe: {}", timeframe_label)?;
    writeln!(out, "Period: Last {} days", lookback_days)?;
    writeln!(out)?;

    writeln!(out, "PERFORMANCE METRICS")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Total Signals: {}", result.total_signals)?;
    writeln!(out, "  BUY: {}", result.buy_signals)?;
    writeln!(out, "  SELL: {}", result.sell_signals)?;
    writeln!(out, "  WAIT: {}", result.wait_signals)?;
    writeln!(out)?;
    writeln!(out, "Total Trades: {}", result.total_trades)?;
    writeln!(out, "  Wins: {}", result.winning_trades)?;
    writeln!(out, "  Losses: {}", result.losing_trades)?;
    writeln!(out, "  Win Rate: {:.2}%", result.win_rate)?;
    writeln!(out)?;

    writeln!(out, "PROFIT ANALYSIS")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Total Profit: ${:.2}", result.total_profit)?;
    writeln!(out, "Average Profit/Trade: ${:.2}", result.average_profit)?;
    writeln!(out, "Max Drawdown: ${:.2}", result.max_drawdown)?;
    writeln!(out, "Sharpe Ratio: {:.2}", result.sharpe_ratio)?;
    writeln!(out)?;

    let recent = recent_closed_trades(result);
    if !recent.is_empty() {
        writeln!(out, "RECENT TRADES (Last {})", RECENT_TRADES)?;
        writeln!(out, "{}", RULE)?;
        for trade in recent {
            let tag = if trade.result == Some(TradeResult::Win) { "WIN " } else { "LOSS" };
            writeln!(
                out,
                "[{}] {}: {} @ ${:.2}",
                tag,
                trade.date.format("%Y-%m-%d %H:%M"),
                trade.action.as_str(),
                trade.entry_price
            )?;
            if trade.exit_price.is_some() {
                writeln!(
                    out,
                    "       Exit: ${} ({:.2}%)",
                    format_optional_price(trade.exit_price),
                    trade.profit_percent.unwrap_or_default()
                )?;
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "Note: Backtest results are for reference only.")?;
    write!(out, "Past performance does not guarantee future results.")
}
