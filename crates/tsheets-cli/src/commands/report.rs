use serde_json::Value;
use tsheets_core::{Report, TsheetsClient};

use crate::cli::ReportArgs;
use crate::error::CliError;

use super::{parse_data, CommandResult};

pub async fn run(args: &ReportArgs, client: &TsheetsClient) -> Result<CommandResult, CliError> {
    let report = args.kind.parse::<Report>()?;
    let body = match &args.data {
        Some(raw) => parse_data(raw)?,
        None => Value::Null,
    };

    let page = client.report(report, body).await?;
    Ok(CommandResult::from_page(page))
}
