use serde_json::Value;

use crate::cli::LookupArgs;
use crate::error::CliError;

use super::Client;

pub async fn run(
    client: &Client,
    args: &LookupArgs,
    credential: Option<&str>,
) -> Result<Value, CliError> {
    let bar = client.lookup(&args.symbol, &args.date, credential).await?;
    Ok(serde_json::to_value(bar)?)
}
