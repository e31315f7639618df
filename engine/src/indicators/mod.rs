// Technical indicators module
//
// All calculators read a most-recent-first view and return the value for the latest bar,
// or `None` when the view is too short.
pub mod ema;
pub mod levels;
pub mod macd;
pub mod risk;
pub mod rsi;
pub mod sma;
pub mod trend;
pub mod volume;

pub use ema::Ema;
pub use levels::{Levels, SupportResistance};
pub use macd::{Macd, MacdValue};
pub use risk::{calculate_buy_sl_tp, calculate_sell_sl_tp, StopLevels};
pub use rsi::Rsi;
pub use sma::Sma;
pub use trend::determine_trend;
pub use volume::VolumeMa;

use crate::models::RecentFirst;
use serde_json::Value;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    type Output;

    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, candles: RecentFirst<'_>) -> Option<Self::Output>;
}
