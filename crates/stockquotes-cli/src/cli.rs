//! CLI argument definitions for stockquotes.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `lookup` | Daily bar for a symbol on one date |
//! | `min` | Lowest low over the last N trading days |
//! | `max` | Highest high over the last N trading days |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--api-key` | `$ALPHA_VANTAGE_API_KEY` | Alpha Vantage credential |
//! | `--timeout-ms` | `10000` | Request timeout in ms |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--log-format` | `text` | Log output on stderr (text, json) |
//!
//! # Examples
//!
//! ```bash
//! stockquotes lookup AAPL 2025-03-28
//! stockquotes min MSFT 30 --pretty
//! STOCKQUOTES_LOG=info stockquotes max TSCO.LON 250
//! ALPHA_VANTAGE_QUOTA=5/60 stockquotes lookup 600104.SHH 2025-03-28
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Daily stock quotes from Alpha Vantage.
#[derive(Debug, Parser)]
#[command(
    name = "stockquotes",
    author,
    version,
    about = "Daily stock quotes and window extremes from Alpha Vantage"
)]
pub struct Cli {
    /// Alpha Vantage API key.
    #[arg(long, global = true, env = "ALPHA_VANTAGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in milliseconds; overrides ALPHA_VANTAGE_TIMEOUT_MS.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log line format. The filter is read from STOCKQUOTES_LOG.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the daily bar for a symbol on a date.
    ///
    ///   stockquotes lookup AAPL 2025-03-28
    Lookup(LookupArgs),

    /// Lowest low over the most recent trading days.
    ///
    ///   stockquotes min AAPL 30
    Min(WindowArgs),

    /// Highest high over the most recent trading days.
    ///
    ///   stockquotes max AAPL 30
    Max(WindowArgs),
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Ticker symbol (case-insensitive).
    pub symbol: String,

    /// Trading date as YYYY-MM-DD.
    pub date: String,
}

#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Ticker symbol (case-insensitive).
    pub symbol: String,

    /// Number of trailing trading days.
    pub days: usize,
}
