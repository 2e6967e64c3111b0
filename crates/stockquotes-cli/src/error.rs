use stockquotes_core::{ConfigError, QueryError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Query(QueryError::InvalidArgument(_)) => 2,
            Self::Query(error) if error.is_not_found() => 3,
            Self::Query(QueryError::Source { .. }) => 4,
            Self::Query(_) | Self::Config(_) | Self::Logging(_) => 5,
            Self::Serialization(_) => 6,
        }
    }
}
