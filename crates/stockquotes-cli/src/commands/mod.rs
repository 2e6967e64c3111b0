mod lookup;
mod window;

use serde_json::Value;
use stockquotes_core::{AlphaVantageFactory, ClientConfig, Extremum, QuoteClient};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub(crate) type Client = QuoteClient<AlphaVantageFactory>;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let client: Client = QuoteClient::from_config(client_config(cli)?);
    let credential = cli.api_key.as_deref();

    match &cli.command {
        Command::Lookup(args) => lookup::run(&client, args, credential).await,
        Command::Min(args) => window::run(&client, args, Extremum::Minimum, credential).await,
        Command::Max(args) => window::run(&client, args, Extremum::Maximum, credential).await,
    }
}

fn client_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    Ok(config)
}
