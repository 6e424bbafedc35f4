use serde_json::Value;
use tsheets_core::{Resource, TsheetsClient, Verb};

use crate::cli::{DeleteArgs, WriteArgs};
use crate::error::CliError;

use super::{parse_data, parse_params, CommandResult};

/// `add` and `update`: the parsed `--data` object is the body.
pub async fn run_body(
    verb: Verb,
    args: &WriteArgs,
    client: &TsheetsClient,
) -> Result<CommandResult, CliError> {
    let resource = args.resource.parse::<Resource>()?;
    let body = parse_data(&args.data)?;

    let page = client.dispatch(resource, verb, body).await?;
    Ok(CommandResult::from_page(page))
}

pub async fn run_delete(args: &DeleteArgs, client: &TsheetsClient) -> Result<CommandResult, CliError> {
    let resource = args.resource.parse::<Resource>()?;
    let params = parse_params(&args.params)?;

    let page = client
        .dispatch(resource, Verb::Delete, Value::Object(params))
        .await?;
    Ok(CommandResult::from_page(page))
}
