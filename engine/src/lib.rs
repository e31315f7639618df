// Engine library root: indicators, signal engine, backtest simulator and candle sources.

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod services;

pub use error::EngineError;
