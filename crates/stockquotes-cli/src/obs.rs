use crate::cli::LogFormat;
use crate::error::CliError;

const LOG_ENV: &str = "STOCKQUOTES_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Logs go to stderr so stdout stays JSON.
pub fn init_tracing(format: LogFormat) -> Result<(), CliError> {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| CliError::Logging(format!("invalid {LOG_ENV} filter: {err}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|err| CliError::Logging(err.to_string()))
}
