use serde_json::Value;
use stockquotes_core::Extremum;

use crate::cli::WindowArgs;
use crate::error::CliError;

use super::Client;

pub async fn run(
    client: &Client,
    args: &WindowArgs,
    extremum: Extremum,
    credential: Option<&str>,
) -> Result<Value, CliError> {
    let result = match extremum {
        Extremum::Minimum => {
            client
                .minimum_over_window(&args.symbol, args.days, credential)
                .await?
        }
        Extremum::Maximum => {
            client
                .maximum_over_window(&args.symbol, args.days, credential)
                .await?
        }
    };

    if result.considered < result.requested {
        tracing::info!(
            symbol = %result.symbol,
            requested = result.requested,
            considered = result.considered,
            "series shorter than requested window"
        );
    }
    Ok(serde_json::to_value(result)?)
}
