use thiserror::Error;

use crate::source::SourceError;

/// Validation errors raised while constructing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("invalid resolution '{value}', expected one of recent, full")]
    InvalidResolution { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be positive")]
    NonPositiveValue { field: &'static str },
    #[error("bar high must be >= low")]
    InvalidBarRange,

    #[error("series contains more than one bar dated {date}")]
    DuplicateDate { date: String },

    #[error("window size must be greater than zero")]
    EmptyWindow,
}

/// Configuration errors raised before any request is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "Alpha Vantage API key is required; pass one explicitly or set ALPHA_VANTAGE_API_KEY"
    )]
    MissingCredential,

    #[error("environment variable {name} has invalid value '{value}': {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Top-level error returned by the query operations.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("error fetching data for {symbol}: {source}")]
    Source {
        symbol: String,
        #[source]
        source: SourceError,
    },

    #[error("no data available for {symbol} on {date}")]
    DateNotFound { symbol: String, date: String },

    #[error("no bars available for {symbol}")]
    EmptySeries { symbol: String },

    #[error(transparent)]
    InvalidArgument(#[from] ValidationError),
}

impl QueryError {
    /// True for the "data does not exist" outcomes, as opposed to transport failures.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::DateNotFound { .. } | Self::EmptySeries { .. })
    }

    pub const fn source_error(&self) -> Option<&SourceError> {
        match self {
            Self::Source { source, .. } => Some(source),
            _ => None,
        }
    }
}
