//! # TSheets Core
//!
//! Generic client for the TSheets REST API: uniform verbs over every resource,
//! response-envelope normalization, caller-driven pagination and rate-limit
//! backoff.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, resource handles and builder |
//! | [`clock`] | Injectable sleep capability |
//! | [`config`] | Base URL, API version, bearer token |
//! | [`engine`] | Request execution, pages and continuations |
//! | [`envelope`] | Response envelope parsing and normalization |
//! | [`error`] | Error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`mock`] | Scripted transport and recording clock for tests |
//! | [`pagination`] | Page cursor |
//! | [`request`] | Resource requests and parameter encoding |
//! | [`resource`] | Static resource routing table |
//! | [`retry`] | Retry and backoff policy |
//! | [`throttling`] | Shared request budget |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use serde_json::json;
//! use tsheets_core::TsheetsClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TsheetsClient::from_env()?;
//!
//!     let mut page = client.users().list(json!({ "active": "yes" })).await?;
//!     loop {
//!         for user in &page.data {
//!             println!("{}", user["username"]);
//!         }
//!         match page.next {
//!             Some(next) => page = next.fetch().await?,
//!             None => break,
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ Resource Handle │  users().list(..), report(..)
//! └────────┬────────┘
//!          │ ResourceRequest
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Request Engine  │────▶│ Retry / Throttle │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ HTTP Client     │────▶│ Envelope         │
//! │ (reqwest/mock)  │     │ normalization    │
//! └─────────────────┘     └────────┬─────────┘
//!                                  ▼
//!                         Page { data, next }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use tsheets_core::ApiError;
//!
//! fn describe(error: &ApiError) -> &'static str {
//!     match error {
//!         ApiError::RemoteApi { code: 401, .. } => "check the bearer token",
//!         ApiError::RemoteApi { .. } => "the API rejected the request",
//!         ApiError::Transport(_) => "network problem",
//!         _ => "client-side problem",
//!     }
//! }
//! ```

pub mod client;
pub mod clock;
pub mod config;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod mock;
pub mod pagination;
pub mod request;
pub mod resource;
pub mod retry;
pub mod throttling;

pub use client::{ClientBuilder, ResourceHandle, TsheetsClient};
pub use clock::{Sleeper, TokioSleeper};
pub use config::ClientConfig;
pub use engine::{Continuation, Page, RequestEngine};
pub use envelope::{NormalizedPage, RawEnvelope};
pub use error::{ApiError, ConfigError};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use request::{params_from_value, Params, ResourceRequest};
pub use resource::{Report, Resource, ResourceDescriptor, UnknownName, Verb};
pub use retry::{Backoff, RetryPolicy};
pub use throttling::Throttle;
