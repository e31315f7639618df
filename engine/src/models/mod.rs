// Engine-specific extensions of the shared models.
// The plain `Candle` lives in `shared::models`; this module adds the ordered sequence types.
pub mod candle;

pub use candle::{CandleSeries, RecentFirst};
