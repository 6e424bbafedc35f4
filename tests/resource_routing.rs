//! Behavior tests for the resource routing table and the client's verb surface.

use std::sync::Arc;

use serde_json::{json, Value};
use tsheets_core::mock::{RecordingSleeper, ScriptedHttpClient};
use tsheets_core::{
    ApiError, ClientConfig, HttpMethod, Report, Resource, TsheetsClient, Verb,
};

fn client_with(transport: Arc<ScriptedHttpClient>) -> TsheetsClient {
    let config = ClientConfig::new("routing-token")
        .and_then(|config| config.with_base_url("https://sandbox.example.test/api"))
        .expect("valid config");
    TsheetsClient::builder(config)
        .with_http_client(transport)
        .with_sleeper(Arc::new(RecordingSleeper::new()))
        .build()
}

#[tokio::test]
async fn every_listable_resource_routes_to_its_path() {
    for resource in Resource::ALL {
        // Given: a server that answers under the resource's response key
        let descriptor = resource.descriptor();
        let transport = Arc::new(ScriptedHttpClient::new().with_json(
            200,
            json!({ "results": { descriptor.response_key: { "1": { "id": 1 } } } }),
        ));
        let client = client_with(transport.clone());

        // When: the caller lists it
        let page = client
            .resource(resource)
            .list(Value::Null)
            .await
            .unwrap_or_else(|error| panic!("{resource} list failed: {error}"));

        // Then: the URL is built from the configured root and the resource path
        assert_eq!(page.data, vec![json!({ "id": 1 })]);
        let request = &transport.recorded_requests()[0];
        assert_eq!(
            request.url,
            format!("https://sandbox.example.test/api/v1/{}", descriptor.path)
        );
        assert_eq!(request.method, HttpMethod::Get);
    }
}

#[tokio::test]
async fn unsupported_verbs_fail_before_any_request() {
    for resource in Resource::ALL {
        for verb in Verb::ALL {
            if resource.descriptor().supports(verb) {
                continue;
            }

            let transport = Arc::new(ScriptedHttpClient::new());
            let client = client_with(transport.clone());

            let error = client
                .dispatch(resource, verb, Value::Null)
                .await
                .expect_err("verb should be refused");

            assert!(
                matches!(error, ApiError::UnsupportedVerb { verb: refused, .. } if refused == verb),
                "{resource}.{verb}: {error}"
            );
            assert!(transport.recorded_requests().is_empty());
        }
    }
}

#[tokio::test]
async fn deleting_timesheets_sends_ids_on_the_query_string() {
    // Given: the server confirms deletion
    let transport = Arc::new(ScriptedHttpClient::new().with_json(
        200,
        json!({ "results": { "timesheets": { "135": { "_status_code": 200, "_status_message": "OK, deleted" } } } }),
    ));
    let client = client_with(transport.clone());

    // When: the caller deletes two timesheets
    let page = client
        .timesheets()
        .delete(json!({ "ids": [135, 136] }))
        .await
        .expect("deleted");

    // Then: ids are comma-joined on the query string and no body is sent
    assert_eq!(page.data.len(), 1);
    let request = &transport.recorded_requests()[0];
    assert_eq!(request.method, HttpMethod::Delete);
    assert_eq!(request.query_param("ids"), Some("135,136"));
    assert_eq!(request.query_param("page"), Some("1"));
    assert!(request.body.is_none());
    assert_eq!(
        request.target_url(),
        "https://sandbox.example.test/api/v1/timesheets?ids=135%2C136&page=1"
    );
}

#[tokio::test]
async fn reports_read_entities_from_their_alias_key() {
    for report in Report::ALL {
        let transport = Arc::new(ScriptedHttpClient::new().with_json(
            200,
            json!({ "results": { report.response_key(): { "totals": { "hours": 8 } } } }),
        ));
        let client = client_with(transport.clone());

        let page = client
            .report(report, json!({ "data": { "start_date": "2024-01-01", "end_date": "2024-01-31" } }))
            .await
            .unwrap_or_else(|error| panic!("{report} failed: {error}"));

        assert_eq!(page.data, vec![json!({ "hours": 8 })]);
        assert!(page.next.is_none());
        let request = &transport.recorded_requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.ends_with(report.path()));
    }
}

#[tokio::test]
async fn report_with_path_key_instead_of_alias_is_malformed() {
    let transport = Arc::new(ScriptedHttpClient::new().with_json(
        200,
        json!({ "results": { "reports/payroll": { "1": {} } } }),
    ));
    let client = client_with(transport);

    let error = client
        .report(Report::Payroll, Value::Null)
        .await
        .expect_err("alias key missing");

    assert!(error.to_string().contains("payroll_report"));
}

#[test]
fn missing_bearer_token_fails_construction() {
    let error = ClientConfig::new("").expect_err("token required");

    assert_eq!(error.to_string(), "a bearer token is required");
}

#[test]
fn names_parse_from_wire_form() {
    assert_eq!("jobcode_assignments".parse::<Resource>(), Ok(Resource::JobcodeAssignments));
    assert_eq!("UPDATE".parse::<Verb>(), Ok(Verb::Update));
    assert_eq!("project".parse::<Report>(), Ok(Report::Project));
    assert!("reports".parse::<Resource>().is_err());
}
