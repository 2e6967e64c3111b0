//! Quote provider adapters.

mod alphavantage;

pub use alphavantage::{parse_daily_series, AlphaVantageAdapter, AlphaVantageFactory};
