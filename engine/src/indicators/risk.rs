// Stop-loss / take-profit sizing as a percentage of the entry price.
// Scaling by (100 +/- pct) / 100 keeps round inputs exact: 100 at 2.5% gives 102.5, not 102.49999999999999.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StopLevels {
    pub sl: f64,
    pub tp: f64,
}

/// Long position: stop below the entry, target above it.
pub fn calculate_buy_sl_tp(entry_price: f64, risk_percent: f64, reward_percent: f64) -> StopLevels {
    StopLevels {
        sl: entry_price * (100.0 - risk_percent) / 100.0,
        tp: entry_price * (100.0 + reward_percent) / 100.0,
    }
}

/// Short position: stop above the entry, target below it.
pub fn calculate_sell_sl_tp(entry_price: f64, risk_percent: f64, reward_percent: f64) -> StopLevels {
    StopLevels {
        sl: entry_price * (100.0 + risk_percent) / 100.0,
        tp: entry_price * (100.0 - reward_percent) / 100.0,
    }
}
