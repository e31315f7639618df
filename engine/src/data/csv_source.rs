// Candle source backed by one `<interval>.csv` file per interval in a data directory.
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::data::csv_parser::CandleCsvParser;
use crate::data::source::CandleSource;
use crate::error::EngineError;
use crate::models::CandleSeries;

#[derive(Debug, Clone)]
pub struct CsvCandleSource {
    data_dir: PathBuf,
}

impl CsvCandleSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn file_for(&self, interval: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", interval))
    }
}

#[async_trait]
impl CandleSource for CsvCandleSource {
    async fn fetch_candles(&self, interval: &str, outputsize: usize) -> Result<CandleSeries, EngineError> {
        if interval.is_empty() || interval.contains(['/', '\\']) || interval.contains("..") {
            return Err(EngineError::InvalidInput(format!("invalid interval name '{}'", interval)));
        }

        let path = self.file_for(interval);
        let bytes = tokio::fs::read(&path).await?;
        let mut candles = CandleCsvParser::parse_candles(bytes.as_slice()).map_err(|e| match e.downcast::<csv::Error>() {
            Ok(source) => EngineError::CsvSystemError { source },
            Err(e) => EngineError::CsvDataFormatError(format!("{}: {}", path.display(), e)),
        })?;

        // Files may list rows in any order.
        candles.sort_by_key(|c| c.timestamp);
        let mut series = CandleSeries::from_chronological(candles)?;
        series.truncate_to_recent(outputsize);

        debug!(interval, path = %path.display(), count = series.len(), "Loaded candles from CSV");
        Ok(series)
    }
}
