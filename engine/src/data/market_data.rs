// In-memory candle source keyed by interval. Used by tests and by callers that already hold data.
use async_trait::async_trait;
use std::collections::HashMap;

use crate::data::source::CandleSource;
use crate::error::EngineError;
use crate::models::CandleSeries;

#[derive(Debug, Clone, Default)]
pub struct MarketDataStore {
    data: HashMap<String, CandleSeries>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever was stored for `interval`.
    pub fn insert(&mut self, interval: impl Into<String>, candles: CandleSeries) {
        self.data.insert(interval.into(), candles);
    }
}

#[async_trait]
impl CandleSource for MarketDataStore {
    async fn fetch_candles(&self, interval: &str, outputsize: usize) -> Result<CandleSeries, EngineError> {
        let mut candles = self
            .data
            .get(interval)
            .cloned()
            .ok_or_else(|| EngineError::UpstreamFetch(format!("no market data stored for interval '{}'", interval)))?;
        candles.truncate_to_recent(outputsize);
        Ok(candles)
    }
}
