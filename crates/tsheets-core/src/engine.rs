//! Request execution and pagination.
//!
//! [`RequestEngine::execute`] performs exactly one logical page fetch: it
//! builds the HTTP call, retries the identical call while the retry policy
//! asks for it, normalizes the envelope and, when the server reports more
//! data for a GET, hands back a [`Continuation`] for the next page.
//! Continuations are inert until [`Continuation::fetch`] is awaited, so the
//! caller decides how far a traversal goes.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::clock::{Sleeper, TokioSleeper};
use crate::config::ClientConfig;
use crate::envelope::{self, NormalizedPage};
use crate::error::ApiError;
use crate::http_client::{HttpAuth, HttpClient, HttpMethod, HttpRequest};
use crate::pagination;
use crate::request::ResourceRequest;
use crate::retry::RetryPolicy;
use crate::throttling::Throttle;

/// Executes resource requests against one account. Clones share transport,
/// clock, retry policy and throttle.
#[derive(Clone)]
pub struct RequestEngine {
    endpoint_root: Arc<str>,
    auth: HttpAuth,
    timeout_ms: u64,
    http_client: Arc<dyn HttpClient>,
    sleeper: Arc<dyn Sleeper>,
    retry: Arc<RetryPolicy>,
    throttle: Option<Throttle>,
}

impl RequestEngine {
    pub fn new(config: &ClientConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            endpoint_root: Arc::from(config.endpoint_root()),
            auth: HttpAuth::BearerToken(config.bearer_token().to_owned()),
            timeout_ms: config.timeout_ms(),
            http_client,
            sleeper: Arc::new(TokioSleeper),
            retry: Arc::new(RetryPolicy::default()),
            throttle: None,
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Arc::new(retry);
        self
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Fetches one page for `request`.
    ///
    /// GET and DELETE requests without a `page` parameter start at page 1.
    /// A throttle set with [`with_throttle`](Self::with_throttle) waits on its
    /// own sleeper, so build it with the same one given here.
    pub async fn execute(&self, request: ResourceRequest) -> Result<Page, ApiError> {
        let request = pagination::with_first_page(request)?;
        let mut attempt = 0_u32;

        loop {
            match self.round_trip(&request).await {
                Ok(normalized) => return self.assemble_page(request, normalized),
                Err(error) if self.retry.should_retry(&error, attempt) => {
                    let delay = self.retry.backoff_duration(&error, attempt);
                    warn!(
                        resource = request.path(),
                        page = ?pagination::current_page(&request).ok(),
                        attempt,
                        delay_secs = delay.as_secs(),
                        error = %error,
                        "remote API asked us to back off; retrying the same request after the delay"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt = attempt.saturating_add(1);
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Renders the HTTP call for `request` without sending it.
    pub fn build_http_request(&self, request: &ResourceRequest) -> Result<HttpRequest, ApiError> {
        let url = format!("{}/{}", self.endpoint_root, request.path());
        let http_request = HttpRequest::new(request.method(), url)
            .with_auth(&self.auth)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        if request.method().uses_query() {
            Ok(http_request.with_query(request.query_pairs()))
        } else {
            Ok(http_request.with_json_body(request.json_body()?))
        }
    }

    async fn round_trip(&self, request: &ResourceRequest) -> Result<NormalizedPage, ApiError> {
        self.wait_for_budget().await;

        let http_request = self.build_http_request(request)?;
        debug!(
            method = %http_request.method,
            resource = request.path(),
            page = ?http_request.query_param(pagination::PAGE_PARAM),
            "sending request"
        );

        let response = self.http_client.execute(http_request).await?;
        debug!(status = response.status, resource = request.path(), "received response");

        let raw = envelope::parse_response(&response)?;
        envelope::normalize(&raw, request.response_key())
    }

    async fn wait_for_budget(&self) {
        if let Some(throttle) = &self.throttle {
            throttle.until_ready().await;
        }
    }

    fn assemble_page(
        &self,
        request: ResourceRequest,
        normalized: NormalizedPage,
    ) -> Result<Page, ApiError> {
        let NormalizedPage {
            entities,
            supplemental_data,
            has_more,
        } = normalized;

        let next = if has_more && request.method() == HttpMethod::Get {
            Some(Continuation {
                engine: self.clone(),
                request: pagination::advance(&request)?,
            })
        } else {
            None
        };

        Ok(Page {
            data: entities,
            supplemental_data,
            next,
        })
    }
}

impl Debug for RequestEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestEngine")
            .field("endpoint_root", &self.endpoint_root)
            .field("timeout_ms", &self.timeout_ms)
            .field("retry", &self.retry)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

/// One page of normalized results.
#[derive(Debug)]
pub struct Page {
    /// Entities in the order the server listed them.
    pub data: Vec<Value>,
    /// Related reference data; `None` when the server sent none.
    pub supplemental_data: Option<Map<String, Value>>,
    /// Deferred fetch of the following page, present only when more data exists.
    pub next: Option<Continuation>,
}

impl Page {
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    pub fn into_parts(self) -> (Vec<Value>, Option<Map<String, Value>>, Option<Continuation>) {
        (self.data, self.supplemental_data, self.next)
    }
}

/// Unevaluated request for the next page of a traversal.
pub struct Continuation {
    engine: RequestEngine,
    request: ResourceRequest,
}

impl Continuation {
    /// The request that [`fetch`](Self::fetch) will send.
    pub fn request(&self) -> &ResourceRequest {
        &self.request
    }

    pub fn page(&self) -> u64 {
        pagination::current_page(&self.request).unwrap_or(pagination::FIRST_PAGE)
    }

    /// Performs the next page's request. Consumes the continuation, so each
    /// one yields at most one page.
    pub async fn fetch(self) -> Result<Page, ApiError> {
        self.engine.execute(self.request).await
    }
}

impl Debug for Continuation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Continuation")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}
