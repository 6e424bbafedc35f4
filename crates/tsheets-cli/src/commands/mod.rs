mod list;
mod report;
mod resources;
mod write;

use serde::Serialize;
use serde_json::{Map, Value};
use tsheets_core::{ClientConfig, Page, Params, Throttle, TsheetsClient, Verb};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Machine-readable output of a data command.
#[derive(Debug, Default, Serialize)]
pub struct CommandResult {
    pub data: Vec<Value>,
    pub supplemental_data: Option<Map<String, Value>>,
    pub pages: usize,
    pub more: bool,
}

impl CommandResult {
    pub fn from_page(page: Page) -> Self {
        let mut result = Self::default();
        let more = page.has_more();
        let (data, supplemental_data, _) = page.into_parts();
        result.absorb(data, supplemental_data);
        result.more = more;
        result
    }

    /// Appends one page; supplemental mappings are merged key by key.
    pub fn absorb(&mut self, data: Vec<Value>, supplemental_data: Option<Map<String, Value>>) {
        self.pages += 1;
        self.data.extend(data);

        let Some(incoming) = supplemental_data else {
            return;
        };
        let merged = self.supplemental_data.get_or_insert_with(Map::new);
        for (key, value) in incoming {
            match (merged.get_mut(&key), value) {
                (Some(Value::Object(existing)), Value::Object(extra)) => existing.extend(extra),
                (_, value) => {
                    merged.insert(key, value);
                }
            }
        }
    }
}

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let result = match &cli.command {
        Command::Resources => return resources::run(),
        Command::List(args) => list::run(args, &build_client(cli)?).await?,
        Command::Add(args) => write::run_body(Verb::Add, args, &build_client(cli)?).await?,
        Command::Update(args) => {
            write::run_body(Verb::Update, args, &build_client(cli)?).await?
        }
        Command::Delete(args) => write::run_delete(args, &build_client(cli)?).await?,
        Command::Report(args) => report::run(args, &build_client(cli)?).await?,
    };

    Ok(serde_json::to_value(result)?)
}

fn build_client(cli: &Cli) -> Result<TsheetsClient, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str())?;
    }
    if let Some(api_version) = &cli.api_version {
        config = config.with_api_version(api_version.as_str())?;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms)?;
    }

    let mut builder = TsheetsClient::builder(config);
    if let Some(limit) = cli.requests_per_minute {
        if limit == 0 {
            return Err(CliError::Usage(String::from(
                "--requests-per-minute must be greater than zero",
            )));
        }
        builder = builder.with_throttle(Throttle::per_minute(limit));
    }

    Ok(builder.build())
}

/// Parses repeated `key=value` arguments, keeping their order.
pub(crate) fn parse_params(pairs: &[String]) -> Result<Params, CliError> {
    let mut params = Params::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(CliError::Usage(format!(
                "parameter '{pair}' must look like key=value"
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::Usage(format!("parameter '{pair}' has an empty key")));
        }
        params.insert(key.to_owned(), Value::String(value.to_owned()));
    }
    Ok(params)
}

/// Parses a `--data` argument, which must be a JSON object.
pub(crate) fn parse_data(raw: &str) -> Result<Value, CliError> {
    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(CliError::Usage(String::from("--data must be a JSON object")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_keep_order_and_raw_values() {
        let params = parse_params(&[
            String::from("start_date=2024-01-01"),
            String::from("ids=1,2,3"),
            String::from("name=a=b"),
        ])
        .expect("valid pairs");

        let keys = params.keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, vec!["start_date", "ids", "name"]);
        assert_eq!(params["ids"], json!("1,2,3"));
        assert_eq!(params["name"], json!("a=b"));
    }

    #[test]
    fn params_without_separator_are_rejected() {
        let error = parse_params(&[String::from("active")]).expect_err("no '='");

        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn data_must_be_an_object() {
        assert!(parse_data(r#"{"data":[]}"#).is_ok());
        assert!(matches!(parse_data("[1]"), Err(CliError::Usage(_))));
        assert!(matches!(parse_data("{"), Err(CliError::Serialization(_))));
    }

    #[test]
    fn absorb_merges_supplemental_data_across_pages() {
        let mut result = CommandResult::default();
        let first = json!({ "users": { "1": { "id": 1 } } });
        let second = json!({ "users": { "2": { "id": 2 } }, "jobcodes": { "9": { "id": 9 } } });

        result.absorb(vec![json!({ "id": 10 })], first.as_object().cloned());
        result.absorb(vec![json!({ "id": 11 })], second.as_object().cloned());

        assert_eq!(result.pages, 2);
        assert_eq!(result.data.len(), 2);
        let supplemental = result.supplemental_data.expect("merged");
        assert_eq!(supplemental["users"].as_object().map(Map::len), Some(2));
        assert_eq!(supplemental["jobcodes"]["9"]["id"], json!(9));
    }
}
