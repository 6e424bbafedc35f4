//! Page cursor for GET/DELETE traversals.

use serde_json::Value;

use crate::error::ApiError;
use crate::request::ResourceRequest;

pub const PAGE_PARAM: &str = "page";
pub const FIRST_PAGE: u64 = 1;

/// Reads the `page` parameter. Absent means the first page.
pub fn current_page(request: &ResourceRequest) -> Result<u64, ApiError> {
    let Some(value) = request.param(PAGE_PARAM) else {
        return Ok(FIRST_PAGE);
    };

    let page = match value {
        Value::Null => Some(FIRST_PAGE),
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };

    match page {
        Some(page) if page >= FIRST_PAGE => Ok(page),
        _ => Err(ApiError::invalid_request(format!(
            "page must be a positive integer, got {value}"
        ))),
    }
}

/// Returns `request` with an explicit page for query-style methods.
///
/// POST/PUT requests are returned untouched.
pub fn with_first_page(request: ResourceRequest) -> Result<ResourceRequest, ApiError> {
    if !request.method().uses_query() {
        return Ok(request);
    }

    let page = current_page(&request)?;
    Ok(request.with_param(PAGE_PARAM, page))
}

/// Derives the request for the next page; every other parameter is copied unchanged.
pub fn advance(request: &ResourceRequest) -> Result<ResourceRequest, ApiError> {
    let page = current_page(request)?;
    let next = page
        .checked_add(1)
        .ok_or_else(|| ApiError::invalid_request("page cursor overflow"))?;

    Ok(request.clone().with_param(PAGE_PARAM, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::HttpMethod;
    use serde_json::json;

    fn get(path: &str) -> ResourceRequest {
        ResourceRequest::new(path, HttpMethod::Get).expect("valid path")
    }

    #[test]
    fn missing_page_defaults_to_first() {
        let request = with_first_page(get("users")).expect("defaults");

        assert_eq!(request.param(PAGE_PARAM), Some(&json!(1)));
    }

    #[test]
    fn explicit_page_is_kept() {
        let request = with_first_page(get("users").with_param("page", 7)).expect("kept");

        assert_eq!(current_page(&request).expect("numeric"), 7);
    }

    #[test]
    fn delete_gets_a_page_too() {
        let request = ResourceRequest::new("timesheets", HttpMethod::Delete).expect("valid path");

        let request = with_first_page(request).expect("defaults");
        assert_eq!(request.param(PAGE_PARAM), Some(&json!(1)));
    }

    #[test]
    fn body_methods_are_untouched() {
        let request = ResourceRequest::new("users", HttpMethod::Post).expect("valid path");

        let request = with_first_page(request).expect("untouched");
        assert_eq!(request.param(PAGE_PARAM), None);
    }

    #[test]
    fn advance_increments_only_the_page() {
        let request = get("timesheets")
            .with_param("start_date", "2024-01-01")
            .with_param("page", 2);

        let next = advance(&request).expect("advances");

        assert_eq!(next.param(PAGE_PARAM), Some(&json!(3)));
        assert_eq!(next.param("start_date"), request.param("start_date"));
        assert_eq!(next.params().len(), request.params().len());
        assert_eq!(request.param(PAGE_PARAM), Some(&json!(2)));
    }

    #[test]
    fn string_pages_are_accepted() {
        let request = get("users").with_param("page", "4");

        assert_eq!(current_page(&request).expect("numeric string"), 4);
    }

    #[test]
    fn zero_and_garbage_pages_are_rejected() {
        for value in [json!(0), json!(-1), json!("abc"), json!(1.5), json!([1])] {
            let request = get("users").with_param("page", value.clone());
            let error = current_page(&request).expect_err("invalid page");
            assert_eq!(error.code(), "api.invalid_request", "value {value}");
        }
    }
}
