// Exit simulation for one backtested entry.
//
// Bars are scanned by increasing index from the entry bar, which in a most-recent-first
// series means older bars.
use crate::models::RecentFirst;
use shared::models::{Action, TradePlan, TradeResult};

/// Bars examined for a stop or target hit (entry bar excluded).
pub const LOOKAHEAD_BARS: usize = 50;
/// Offset of the bar whose close is used when neither level is hit.
pub const FORCED_EXIT_BARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeOutcome {
    pub exit_price: f64,
    pub result: TradeResult,
    pub profit: f64,
    pub profit_percent: f64,
}

impl TradeOutcome {
    fn close(plan: &TradePlan, exit_price: f64, result: TradeResult) -> Self {
        let profit = match plan.action {
            Action::Sell => plan.entry - exit_price,
            _ => exit_price - plan.entry,
        };
        Self {
            exit_price,
            result,
            profit,
            profit_percent: profit / plan.entry * 100.0,
        }
    }
}

/// Returns `None` for a WAIT plan or when `start` is not inside the series.
pub fn simulate_trade(plan: &TradePlan, candles: RecentFirst<'_>, start: usize) -> Option<TradeOutcome> {
    if plan.action == Action::Wait || start >= candles.len() {
        return None;
    }

    let end = (start + LOOKAHEAD_BARS).min(candles.len());
    for index in start + 1..end {
        let candle = candles.get(index)?;
        // stop first: a bar touching both levels is a loss
        let (stopped, target_hit) = match plan.action {
            Action::Buy => (candle.low <= plan.sl, candle.high >= plan.tp),
            _ => (candle.high >= plan.sl, candle.low <= plan.tp),
        };
        if stopped {
            return Some(TradeOutcome::close(plan, plan.sl, TradeResult::Loss));
        }
        if target_hit {
            return Some(TradeOutcome::close(plan, plan.tp, TradeResult::Win));
        }
    }

    let forced = candles.get((start + FORCED_EXIT_BARS).min(candles.len() - 1))?;
    let mut outcome = TradeOutcome::close(plan, forced.close, TradeResult::Loss);
    if outcome.profit > 0.0 {
        outcome.result = TradeResult::Win;
    }
    Some(outcome)
}
