//! Logical requests against one resource.
//!
//! GET/DELETE parameters become query pairs:
//!
//! | Value | Query form |
//! |-------|------------|
//! | string | as-is |
//! | number, bool | JSON text (`50`, `true`) |
//! | array | comma-joined items (`ids=4,5,6`) |
//! | object | compact JSON (`filter={"a":1}`) |
//! | `null` | omitted |
//!
//! This is not the bracketed form of `qs`-style form encoders: arrays are
//! never sent as `ids[0]=4&ids[1]=5` and objects never as `a[b]=c`. The
//! comma-joined list is the id-list form the TSheets API documents.

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http_client::HttpMethod;
use crate::resource::{Report, Resource, Verb};

/// Request parameters, kept in caller order.
pub type Params = Map<String, Value>;

/// Converts a caller-supplied JSON value into request parameters.
///
/// `null` means "no parameters"; any other non-object value is rejected.
pub fn params_from_value(value: Value) -> Result<Params, ApiError> {
    match value {
        Value::Null => Ok(Params::new()),
        Value::Object(map) => Ok(map),
        other => Err(ApiError::invalid_request(format!(
            "parameters must be a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// One (resource, verb, parameters) triple.
///
/// Values are never mutated once built; page advancement derives a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    path: String,
    method: HttpMethod,
    response_key: Option<String>,
    params: Params,
}

impl ResourceRequest {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Result<Self, ApiError> {
        let path = path.into();
        let path = path.trim().trim_matches('/');
        if path.is_empty() {
            return Err(ApiError::invalid_request("resource path cannot be empty"));
        }

        Ok(Self {
            path: path.to_owned(),
            method,
            response_key: None,
            params: Params::new(),
        })
    }

    /// Builds the request for `verb` on `resource`, refusing verbs the resource lacks.
    pub fn for_verb(resource: Resource, verb: Verb, params: Params) -> Result<Self, ApiError> {
        let descriptor = resource.descriptor();
        if !descriptor.supports(verb) {
            return Err(ApiError::UnsupportedVerb {
                resource: resource.to_string(),
                verb,
            });
        }

        Ok(Self::new(descriptor.path, verb.method())?
            .with_response_key(descriptor.response_key)
            .with_params(params))
    }

    pub fn for_report(report: Report, params: Params) -> Self {
        Self {
            path: report.path().to_owned(),
            method: HttpMethod::Post,
            response_key: Some(report.response_key().to_owned()),
            params,
        }
    }

    pub fn with_response_key(mut self, response_key: impl Into<String>) -> Self {
        self.response_key = Some(response_key.into());
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Key under `results` holding this request's entities. Defaults to the path.
    pub fn response_key(&self) -> &str {
        self.response_key.as_deref().unwrap_or(&self.path)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Query pairs for GET/DELETE. `null` values are left out.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter_map(|(name, value)| query_value(value).map(|value| (name.clone(), value)))
            .collect()
    }

    /// JSON body for POST/PUT.
    pub fn json_body(&self) -> Result<String, ApiError> {
        Ok(serde_json::to_string(&self.params)?)
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => Some(value.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(query_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
