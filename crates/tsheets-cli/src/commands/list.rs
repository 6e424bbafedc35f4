use serde_json::Value;
use tracing::info;
use tsheets_core::{Resource, TsheetsClient};

use crate::cli::ListArgs;
use crate::error::CliError;

use super::{parse_params, CommandResult};

pub async fn run(args: &ListArgs, client: &TsheetsClient) -> Result<CommandResult, CliError> {
    let resource = args.resource.parse::<Resource>()?;
    if args.max_pages == Some(0) {
        return Err(CliError::Usage(String::from(
            "--max-pages must be greater than zero",
        )));
    }

    let mut params = parse_params(&args.params)?;
    if let Some(page) = args.page {
        params.insert(String::from("page"), Value::from(page));
    }

    let mut page = client.resource(resource).list(Value::Object(params)).await?;
    let mut result = CommandResult::default();

    loop {
        let (data, supplemental_data, next) = page.into_parts();
        info!(resource = %resource, entities = data.len(), "page received");
        result.absorb(data, supplemental_data);

        let Some(next) = next else {
            result.more = false;
            break;
        };

        let budget_left = args.max_pages.map_or(true, |max| result.pages < max);
        if !args.all || !budget_left {
            result.more = true;
            break;
        }

        page = next.fetch().await?;
    }

    Ok(result)
}
