use std::sync::Arc;

use serde_json::Value;

use crate::clock::Sleeper;
use crate::config::ClientConfig;
use crate::engine::{Page, RequestEngine};
use crate::error::{ApiError, ConfigError};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::request::{params_from_value, ResourceRequest};
use crate::resource::{Report, Resource, ResourceDescriptor, Verb};
use crate::retry::RetryPolicy;
use crate::throttling::Throttle;

/// Entry point: one authenticated account, every resource reachable from it.
#[derive(Debug, Clone)]
pub struct TsheetsClient {
    engine: RequestEngine,
}

impl TsheetsClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    pub fn resource(&self, resource: Resource) -> ResourceHandle<'_> {
        ResourceHandle {
            engine: &self.engine,
            resource,
        }
    }

    /// Table-driven equivalent of `client.resource(resource).<verb>(params)`.
    pub async fn dispatch(
        &self,
        resource: Resource,
        verb: Verb,
        params: Value,
    ) -> Result<Page, ApiError> {
        self.resource(resource).call(verb, params).await
    }

    /// Runs a report. Entities are read from the report's alias key.
    pub async fn report(&self, report: Report, params: Value) -> Result<Page, ApiError> {
        let request = ResourceRequest::for_report(report, params_from_value(params)?);
        self.engine.execute(request).await
    }

    pub fn users(&self) -> ResourceHandle<'_> {
        self.resource(Resource::Users)
    }

    pub fn groups(&self) -> ResourceHandle<'_> {
        self.resource(Resource::Groups)
    }

    pub fn jobcodes(&self) -> ResourceHandle<'_> {
        self.resource(Resource::Jobcodes)
    }

    pub fn jobcode_assignments(&self) -> ResourceHandle<'_> {
        self.resource(Resource::JobcodeAssignments)
    }

    pub fn timesheets(&self) -> ResourceHandle<'_> {
        self.resource(Resource::Timesheets)
    }

    pub fn timesheets_deleted(&self) -> ResourceHandle<'_> {
        self.resource(Resource::TimesheetsDeleted)
    }

    pub fn geolocations(&self) -> ResourceHandle<'_> {
        self.resource(Resource::Geolocations)
    }

    pub fn last_modified_timestamps(&self) -> ResourceHandle<'_> {
        self.resource(Resource::LastModifiedTimestamps)
    }

    pub fn notifications(&self) -> ResourceHandle<'_> {
        self.resource(Resource::Notifications)
    }

    pub fn reminders(&self) -> ResourceHandle<'_> {
        self.resource(Resource::Reminders)
    }

    pub fn schedule_calendars(&self) -> ResourceHandle<'_> {
        self.resource(Resource::ScheduleCalendars)
    }

    pub fn schedule_events(&self) -> ResourceHandle<'_> {
        self.resource(Resource::ScheduleEvents)
    }

    pub fn managed_clients(&self) -> ResourceHandle<'_> {
        self.resource(Resource::ManagedClients)
    }

    pub fn current_user(&self) -> ResourceHandle<'_> {
        self.resource(Resource::CurrentUser)
    }
}

/// Verb surface of one resource.
#[derive(Debug, Clone, Copy)]
pub struct ResourceHandle<'a> {
    engine: &'a RequestEngine,
    resource: Resource,
}

impl ResourceHandle<'_> {
    pub const fn resource(&self) -> Resource {
        self.resource
    }

    pub const fn descriptor(&self) -> ResourceDescriptor {
        self.resource.descriptor()
    }

    /// GET; returns the first requested page and a continuation when more exist.
    pub async fn list(&self, params: Value) -> Result<Page, ApiError> {
        self.call(Verb::List, params).await
    }

    /// POST; `params` becomes the JSON body.
    pub async fn add(&self, params: Value) -> Result<Page, ApiError> {
        self.call(Verb::Add, params).await
    }

    /// PUT; `params` becomes the JSON body.
    pub async fn update(&self, params: Value) -> Result<Page, ApiError> {
        self.call(Verb::Update, params).await
    }

    /// DELETE; `params` travel on the query string.
    pub async fn delete(&self, params: Value) -> Result<Page, ApiError> {
        self.call(Verb::Delete, params).await
    }

    pub async fn call(&self, verb: Verb, params: Value) -> Result<Page, ApiError> {
        let request = ResourceRequest::for_verb(self.resource, verb, params_from_value(params)?)?;
        self.engine.execute(request).await
    }
}

/// Assembles a [`TsheetsClient`] with optional transport, clock, retry and throttle overrides.
pub struct ClientBuilder {
    config: ClientConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    sleeper: Option<Arc<dyn Sleeper>>,
    retry: Option<RetryPolicy>,
    throttle: Option<Throttle>,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http_client: None,
            sleeper: None,
            retry: None,
            throttle: None,
        }
    }

    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = Some(throttle);
        self
    }

    pub fn build(self) -> TsheetsClient {
        let http_client = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
        let mut engine = RequestEngine::new(&self.config, http_client);

        if let Some(sleeper) = self.sleeper {
            engine = engine.with_sleeper(sleeper);
        }
        if let Some(retry) = self.retry {
            engine = engine.with_retry_policy(retry);
        }
        if let Some(throttle) = self.throttle {
            engine = engine.with_throttle(throttle);
        }

        TsheetsClient { engine }
    }
}
