use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::Candle;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// Timestamp formats accepted in the `datetime` column, all read as UTC.
pub mod timestamp_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    /// RFC 3339 with an offset, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or a bare
    /// `YYYY-MM-DD` (midnight).
    pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(naive.and_utc());
            }
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| anyhow!("Failed to parse datetime '{}': {}", s, e))?;
        date.and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| anyhow!("Failed to parse datetime '{}'", s))
    }

}

pub struct CandleCsvParser;

impl CandleCsvParser {
    // CSV Header: datetime,open,high,low,close[,volume]
    // Example Row: 2024-01-02 10:00:00,42250.5,42310.0,42180.2,42290.7,1532.4
    pub fn load_candles_from_csv(file_path: &Path) -> Result<Vec<Candle>> {
        let file = File::open(file_path).map_err(|e| anyhow!("Failed to open CSV file '{}': {}", file_path.display(), e))?;
        Self::parse_candles(BufReader::new(file))
    }

    /// Rows are returned in file order; ordering and validation belong to `CandleSeries`.
    pub fn parse_candles<R: Read>(reader: R) -> Result<Vec<Candle>> {
        let mut rdr = ReaderBuilder::new().has_headers(true).trim(Trim::All).from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut candles = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result.with_context(|| format!("Error reading CSV record at line {}", line))?;

            let datetime_str = Self::required_field(&record, &headers, "datetime", line)?;
            let timestamp = timestamp_format::parse_timestamp(datetime_str)
                .map_err(|e| anyhow!("Error parsing datetime at line {}: {}", line, e))?;

            let open = Self::parse_price(&record, &headers, "open", line)?;
            let high = Self::parse_price(&record, &headers, "high", line)?;
            let low = Self::parse_price(&record, &headers, "low", line)?;
            let close = Self::parse_price(&record, &headers, "close", line)?;

            let volume = match Self::get_field(&record, &headers, "volume") {
                Some(v) if !v.is_empty() => Some(
                    v.parse::<f64>()
                        .map_err(|e| anyhow!("Error parsing 'volume' at line {}: {}", line, e))?,
                ),
                _ => None,
            };

            candles.push(Candle { timestamp, open, high, low, close, volume });
        }
        Ok(candles)
    }

    fn parse_price(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64> {
        Self::required_field(record, headers, name, line)?
            .parse::<f64>()
            .map_err(|e| anyhow!("Error parsing '{}' at line {}: {}", name, line, e))
    }

    fn required_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str> {
        match Self::get_field(record, headers, name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(anyhow!("Missing '{}' field in CSV record at line {}", name, line)),
        }
    }

    // Header lookup is case-insensitive so exports with `Datetime,Open,...` load as well.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
    }
}
