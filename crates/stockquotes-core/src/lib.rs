//! # Stockquotes Core
//!
//! Daily OHLCV retrieval from Alpha Vantage with an in-memory series cache.
//!
//! ## Overview
//!
//! - **Domain types** for symbols, trading dates, bars and series
//! - **Quote source adapter** for the Alpha Vantage `TIME_SERIES_DAILY` endpoint
//! - **Series cache** keyed by `(symbol, resolution)` with per-key single flight
//! - **Query engine** for date lookups and min/max over trailing windows
//! - **Client facade** that binds an engine to one API credential
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Alpha Vantage adapter and response parser |
//! | [`cache`] | Series cache and freshness policies |
//! | [`client`] | Credential-bound [`QuoteClient`] |
//! | [`config`] | Environment-backed [`ClientConfig`] |
//! | [`domain`] | Domain models |
//! | [`engine`] | [`QueryEngine`] |
//! | [`error`] | Validation, configuration and query errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`query`] | Query result types |
//! | [`source`] | Quote source contract |
//! | [`throttling`] | Client-side request budget |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockquotes_core::QuoteClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads ALPHA_VANTAGE_API_KEY as the default credential.
//!     let client = QuoteClient::from_env()?;
//!
//!     let bar = client.lookup("aapl", "2025-03-28", None).await?;
//!     println!("{} closed at {:.2}", bar.symbol, bar.close);
//!
//!     let low = client.minimum_over_window("AAPL", 30, None).await?;
//!     println!("{}: {:.2} on {}", low.period(), low.price, low.date);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   QuoteClient   │  credential binding
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │   QueryEngine   │────▶│   SeriesCache    │
//! └────────┬────────┘     └──────────────────┘
//!          │ miss
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  QuoteSource    │────▶│  RequestBudget   │
//! │ (Alpha Vantage) │     └──────────────────┘
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   HttpClient    │
//! └─────────────────┘
//! ```

pub mod adapters;
pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod http_client;
pub mod query;
pub mod source;
pub mod throttling;

pub use adapters::{parse_daily_series, AlphaVantageAdapter, AlphaVantageFactory};
pub use cache::{CacheOutcome, CachePolicy, MaxAge, NeverExpire, SeriesCache};
pub use client::QuoteClient;
pub use config::ClientConfig;
pub use domain::{Bar, Resolution, Series, Symbol, TradingDate, RECENT_WINDOW};
pub use engine::QueryEngine;
pub use error::{ConfigError, QueryError, ValidationError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use query::{BarResult, Extremum, ExtremumResult};
pub use source::{QuoteSource, SeriesFuture, SourceError, SourceErrorKind, SourceFactory};
pub use throttling::{QuotaPolicy, RequestBudget};
