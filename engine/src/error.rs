use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Empty or malformed candle sequence. A caller contract violation, never recovered inside the engine.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient history: need {needed} candles, have {available}")]
    InsufficientHistory { needed: usize, available: usize },

    #[error("Upstream fetch failure: {0}")]
    UpstreamFetch(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Indicator calculation error: {0}")]
    IndicatorError(String),

    // Catch-all for anyhow errors when direct conversion is suitable
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// True for failures that originate in the candle source rather than in the engine.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            EngineError::UpstreamFetch(_)
                | EngineError::IoError { .. }
                | EngineError::CsvSystemError { .. }
                | EngineError::CsvDataFormatError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::InsufficientHistory { needed: 200, available: 12 };
        assert_eq!(err.to_string(), "Insufficient history: need 200 candles, have 12");

        let err = EngineError::UpstreamFetch("timeout".to_string());
        assert_eq!(err.to_string(), "Upstream fetch failure: timeout");
        assert!(err.is_upstream());
        assert!(!EngineError::InvalidInput("empty".to_string()).is_upstream());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err: EngineError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
        assert!(err.is_upstream());
    }

    #[test]
    fn test_anyhow_error_is_transparent() {
        let err: EngineError = anyhow::anyhow!("row 7 has no close").into();
        assert_eq!(err.to_string(), "row 7 has no close");
        assert!(!err.is_upstream());
    }
}
