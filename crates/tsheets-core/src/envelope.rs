//! Response envelope parsing and normalization.
//!
//! Every call returns an object shaped like:
//!
//! ```json
//! {
//!   "results": { "users": { "1": { "id": 1 }, "2": { "id": 2 } } },
//!   "more": false,
//!   "supplemental_data": { "jobcodes": { "17": { "id": 17 } } }
//! }
//! ```
//!
//! or, on failure, `{ "error": { "code": 417, "message": "..." } }`.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http_client::HttpResponse;

/// Deserialized body of one HTTP round trip. All fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEnvelope {
    #[serde(default)]
    pub results: Option<Map<String, Value>>,
    #[serde(default)]
    pub supplemental_data: Option<Value>,
    #[serde(default)]
    pub more: Option<Value>,
    #[serde(default)]
    pub error: Option<RemoteErrorBody>,
}

/// `error` object declared by the remote API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<Value>,
}

/// Result of normalizing one envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPage {
    pub entities: Vec<Value>,
    pub supplemental_data: Option<Map<String, Value>>,
    pub has_more: bool,
}

impl RawEnvelope {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// Parses an HTTP response into an envelope, turning HTTP-level failures into remote errors.
pub fn parse_response(response: &HttpResponse) -> Result<RawEnvelope, ApiError> {
    let envelope = match RawEnvelope::from_json(&response.body) {
        Ok(envelope) => envelope,
        Err(_) if !response.is_success() => {
            return Err(ApiError::remote(
                format!("HTTP {}", response.status),
                response.status,
            ));
        }
        Err(error) => {
            return Err(ApiError::malformed(format!(
                "response body is not a JSON envelope: {error}"
            )));
        }
    };

    if let Some(error) = &envelope.error {
        return Err(remote_error(error, response.status));
    }

    if !response.is_success() {
        return Err(ApiError::remote(
            format!("HTTP {}", response.status),
            response.status,
        ));
    }

    Ok(envelope)
}

/// Extracts entities, supplemental data and the "more" flag for `response_key`.
///
/// An `error` member short-circuits before any other field is read. An empty
/// result set never reports more pages.
pub fn normalize(envelope: &RawEnvelope, response_key: &str) -> Result<NormalizedPage, ApiError> {
    if let Some(error) = &envelope.error {
        return Err(remote_error(error, 0));
    }

    let results = envelope
        .results
        .as_ref()
        .ok_or_else(|| ApiError::malformed("response has no 'results' member"))?;

    let raw = results.get(response_key).ok_or_else(|| {
        ApiError::malformed(format!("response has no 'results.{response_key}' member"))
    })?;

    let entities = match raw {
        Value::Object(entries) => entries.values().cloned().collect::<Vec<_>>(),
        Value::Array(entries) => entries.clone(),
        other => {
            return Err(ApiError::malformed(format!(
                "'results.{response_key}' must be a mapping, got {other}"
            )));
        }
    };

    let supplemental_data = match &envelope.supplemental_data {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(Value::Array(items)) if items.is_empty() => Some(Map::new()),
        Some(other) => {
            return Err(ApiError::malformed(format!(
                "'supplemental_data' must be a mapping, got {other}"
            )));
        }
    };

    let has_more = !entities.is_empty() && envelope.more.as_ref().is_some_and(is_truthy);

    Ok(NormalizedPage {
        entities,
        supplemental_data,
        has_more,
    })
}

fn remote_error(error: &RemoteErrorBody, fallback_code: u16) -> ApiError {
    let code = error
        .code
        .as_ref()
        .and_then(code_from_value)
        .unwrap_or(fallback_code);
    let message = error
        .message
        .clone()
        .unwrap_or_else(|| String::from("unspecified remote error"));

    ApiError::remote(message, code)
}

fn code_from_value(value: &Value) -> Option<u16> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|code| u16::try_from(code).ok()),
        Value::String(text) => text.trim().parse::<u16>().ok(),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !matches!(text.trim(), "" | "0" | "false"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> RawEnvelope {
        serde_json::from_value(value).expect("valid envelope")
    }

    #[test]
    fn keyed_results_keep_wire_order() {
        let raw = envelope(json!({
            "results": { "users": { "2": { "id": 2 }, "1": { "id": 1 }, "10": { "id": 10 } } },
            "more": false
        }));

        let page = normalize(&raw, "users").expect("normalizes");

        assert_eq!(page.entities, vec![json!({"id": 2}), json!({"id": 1}), json!({"id": 10})]);
        assert!(!page.has_more);
        assert_eq!(page.supplemental_data, None);
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = envelope(json!({
            "results": { "users": { "1": { "id": 1 }, "2": { "id": 2 } } }
        }));

        let first = normalize(&raw, "users").expect("normalizes");
        let second = normalize(&raw, "users").expect("normalizes");

        assert_eq!(first, second);
        assert_eq!(first.entities, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn error_member_wins_over_results() {
        let raw = envelope(json!({
            "results": { "users": { "1": { "id": 1 } } },
            "error": { "code": 417, "message": "Expectation Failed" }
        }));

        let error = normalize(&raw, "users").expect_err("error member present");

        assert_eq!(error.remote_code(), Some(417));
        assert_eq!(error.to_string(), "[Code 417] Expectation Failed");
    }

    #[test]
    fn missing_key_is_malformed() {
        let raw = envelope(json!({ "results": { "jobcodes": {} } }));

        let error = normalize(&raw, "users").expect_err("key absent");

        assert_eq!(error.code(), "api.malformed_response");
        assert!(error.to_string().contains("results.users"));
    }

    #[test]
    fn missing_results_is_malformed() {
        let error = normalize(&RawEnvelope::default(), "users").expect_err("no results");

        assert_eq!(error.code(), "api.malformed_response");
    }

    #[test]
    fn empty_page_never_has_more() {
        let raw = envelope(json!({ "results": { "users": {} }, "more": true }));

        let page = normalize(&raw, "users").expect("normalizes");

        assert!(page.entities.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn empty_array_results_are_accepted() {
        let raw = envelope(json!({ "results": { "users": [] }, "supplemental_data": [] }));

        let page = normalize(&raw, "users").expect("normalizes");

        assert!(page.entities.is_empty());
        assert_eq!(page.supplemental_data, Some(Map::new()));
    }

    #[test]
    fn supplemental_data_is_passed_through() {
        let raw = envelope(json!({
            "results": { "timesheets": { "9": { "id": 9, "jobcode_id": 17 } } },
            "more": true,
            "supplemental_data": { "jobcodes": { "17": { "id": 17, "name": "Build" } } }
        }));

        let page = normalize(&raw, "timesheets").expect("normalizes");

        assert!(page.has_more);
        let supplemental = page.supplemental_data.expect("present");
        assert_eq!(supplemental["jobcodes"]["17"]["name"], json!("Build"));
    }

    #[test]
    fn truthiness_of_more_flag() {
        for (more, expected) in [
            (json!(true), true),
            (json!(1), true),
            (json!("true"), true),
            (json!(false), false),
            (json!(0), false),
            (json!(""), false),
            (json!("false"), false),
            (json!(null), false),
        ] {
            let raw = envelope(json!({ "results": { "users": { "1": {} } }, "more": more }));
            let page = normalize(&raw, "users").expect("normalizes");
            assert_eq!(page.has_more, expected, "more = {more}");
        }
    }

    #[test]
    fn parse_response_surfaces_error_with_string_code() {
        let response = HttpResponse::new(
            429,
            r#"{"error":{"code":"429","message":"Too Many Requests"}}"#,
        );

        let error = parse_response(&response).expect_err("rate limited");

        assert!(error.is_rate_limited());
    }

    #[test]
    fn parse_response_maps_non_json_failure_to_status() {
        let response = HttpResponse::new(503, "<html>Service Unavailable</html>");

        let error = parse_response(&response).expect_err("unavailable");

        assert_eq!(error.remote_code(), Some(503));
    }

    #[test]
    fn parse_response_rejects_non_json_success() {
        let response = HttpResponse::ok_json("not json");

        let error = parse_response(&response).expect_err("garbage body");

        assert_eq!(error.code(), "api.malformed_response");
    }

    #[test]
    fn error_without_code_uses_http_status() {
        let response = HttpResponse::new(401, r#"{"error":{"message":"Unauthorized"}}"#);

        let error = parse_response(&response).expect_err("unauthorized");

        assert_eq!(error.remote_code(), Some(401));
        assert_eq!(error.to_string(), "[Code 401] Unauthorized");
    }

    #[test]
    fn failed_status_without_error_member_is_remote_error() {
        let response = HttpResponse::new(500, r#"{"results":{}}"#);

        let error = parse_response(&response).expect_err("server error");

        assert_eq!(error.remote_code(), Some(500));
    }
}
