// Candle sources: the fetcher trait plus CSV and in-memory implementations.
pub mod csv_parser;
pub mod csv_source;
pub mod market_data;
pub mod source;

pub use csv_source::CsvCandleSource;
pub use market_data::MarketDataStore;
pub use source::CandleSource;
