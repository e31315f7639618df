// The candle fetcher seam between the engine and whatever provides market data.
use async_trait::async_trait;

use crate::error::EngineError;
use crate::models::CandleSeries;

#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Returns at most `outputsize` candles for `interval`, most recent first.
    async fn fetch_candles(&self, interval: &str, outputsize: usize) -> Result<CandleSeries, EngineError>;
}
