// Most-recent-first candle sequences.
//
// Every lookback in the indicator library means "the latest `period` bars", which only
// holds if index 0 is the newest candle. `CandleSeries` owns a validated sequence in that
// order and `RecentFirst` is the borrowed view the indicators and the signal engine read.
// A chronological vector has to go through `CandleSeries::from_chronological`, so the
// two orders cannot be mixed up silently.

use crate::error::EngineError;
use shared::models::Candle;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Wraps candles that are already ordered newest first.
    pub fn from_recent_first(candles: Vec<Candle>) -> Result<Self, EngineError> {
        validate(&candles)?;
        Ok(Self { candles })
    }

    /// Wraps candles ordered oldest first (the natural order of most files and feeds).
    pub fn from_chronological(mut candles: Vec<Candle>) -> Result<Self, EngineError> {
        candles.reverse();
        Self::from_recent_first(candles)
    }

    pub fn view(&self) -> RecentFirst<'_> {
        RecentFirst { candles: &self.candles }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Keeps only the `count` most recent candles.
    pub fn truncate_to_recent(&mut self, count: usize) {
        self.candles.truncate(count);
    }
}

/// Read-only, copyable view over a most-recent-first slice. Sub-views alias the
/// parent storage, so overlapping backtest windows never copy candles.
#[derive(Debug, Clone, Copy)]
pub struct RecentFirst<'a> {
    candles: &'a [Candle],
}

impl<'a> RecentFirst<'a> {
    pub fn latest(&self) -> Option<&'a Candle> {
        self.candles.first()
    }

    pub fn get(&self, index: usize) -> Option<&'a Candle> {
        self.candles.get(index)
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// View starting `offset` bars back in time. Past the end the view is empty.
    pub fn skip(&self, offset: usize) -> RecentFirst<'a> {
        let start = offset.min(self.candles.len());
        RecentFirst { candles: &self.candles[start..] }
    }

    /// The `period` most recent candles, or `None` when the history is shorter.
    pub fn window(&self, period: usize) -> Option<&'a [Candle]> {
        self.candles.get(..period)
    }

    pub fn as_slice(&self) -> &'a [Candle] {
        self.candles
    }
}

fn validate(candles: &[Candle]) -> Result<(), EngineError> {
    for (idx, candle) in candles.iter().enumerate() {
        let prices = [candle.open, candle.high, candle.low, candle.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(EngineError::InvalidInput(format!(
                "candle {} at {} has a non-positive or non-finite price",
                idx, candle.timestamp
            )));
        }
        let body_low = candle.open.min(candle.close);
        let body_high = candle.open.max(candle.close);
        if candle.low > body_low || candle.high < body_high {
            return Err(EngineError::InvalidInput(format!(
                "candle {} at {} violates low <= open/close <= high",
                idx, candle.timestamp
            )));
        }
        if let Some(volume) = candle.volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "candle {} at {} has a negative volume",
                    idx, candle.timestamp
                )));
            }
        }
    }

    if let Some(pos) = candles
        .windows(2)
        .position(|pair| pair[0].timestamp <= pair[1].timestamp)
    {
        return Err(EngineError::InvalidInput(format!(
            "candles are not most-recent-first: {} at index {} is not after {} at index {}",
            candles[pos].timestamp,
            pos,
            candles[pos + 1].timestamp,
            pos + 1
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::CandleSeries;
    use chrono::{DateTime, Duration, Utc};
    use shared::models::Candle;

    pub fn base_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    /// Hourly candles from oldest-first closes; each bar opens at the previous close
    /// and its range extends 0.1 beyond the body.
    pub fn series_from_closes(closes: &[f64]) -> CandleSeries {
        series_with_volumes(closes, &vec![Some(1000.0); closes.len()])
    }

    pub fn series_with_volumes(closes: &[f64], volumes: &[Option<f64>]) -> CandleSeries {
        let mut candles = Vec::with_capacity(closes.len());
        let mut previous = closes.first().copied().unwrap_or_default();
        for (t, (&close, &volume)) in closes.iter().zip(volumes).enumerate() {
            let open = previous;
            candles.push(Candle {
                timestamp: base_time() + Duration::hours(t as i64),
                open,
                high: open.max(close) + 0.1,
                low: open.min(close) - 0.1,
                close,
                volume,
            });
            previous = close;
        }
        CandleSeries::from_chronological(candles).unwrap()
    }

    /// Rising closes with a zigzag: every odd bar sits `zigzag` above the trend line.
    pub fn zigzag_closes(len: usize, start: f64, slope: f64, zigzag: f64) -> Vec<f64> {
        (0..len)
            .map(|t| start + slope * t as f64 + if t % 2 == 1 { zigzag } else { 0.0 })
            .collect()
    }
}
