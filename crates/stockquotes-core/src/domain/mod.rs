//! # Domain Models
//!
//! Canonical types for daily quote data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Upper-cased ticker symbol |
//! | [`TradingDate`] | `YYYY-MM-DD` session date |
//! | [`Bar`] | One day's OHLCV record |
//! | [`Series`] | Bars for a symbol/resolution, most recent first |
//! | [`Resolution`] | Recent window or full history |
//!
//! Every type validates its invariants at construction time, so a
//! [`Series`] handed out by an adapter is always sorted and free of
//! duplicate dates.

mod date;
mod models;
mod resolution;
mod symbol;

pub use date::TradingDate;
pub use models::{Bar, Series};
pub use resolution::{Resolution, RECENT_WINDOW};
pub use symbol::Symbol;
