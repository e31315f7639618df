pub mod backtest_service;
pub mod indicator_service;
pub mod signal_service;

pub use backtest_service::{backtest_series, format_backtest_result, BacktestService};
pub use indicator_service::{calculate_indicator, IndicatorKind, IndicatorReading};
pub use signal_service::SignalService;
