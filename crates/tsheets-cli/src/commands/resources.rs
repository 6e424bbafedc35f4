use serde::Serialize;
use serde_json::Value;
use tsheets_core::{Report, Resource, ResourceDescriptor};

use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ReportRow {
    name: &'static str,
    path: &'static str,
    response_key: &'static str,
}

#[derive(Debug, Serialize)]
struct RoutingTable {
    resources: Vec<ResourceDescriptor>,
    reports: Vec<ReportRow>,
}

pub fn run() -> Result<Value, CliError> {
    let table = RoutingTable {
        resources: Resource::ALL.iter().map(|resource| resource.descriptor()).collect(),
        reports: Report::ALL
            .iter()
            .map(|report| ReportRow {
                name: report.as_str(),
                path: report.path(),
                response_key: report.response_key(),
            })
            .collect(),
    };

    Ok(serde_json::to_value(table)?)
}
