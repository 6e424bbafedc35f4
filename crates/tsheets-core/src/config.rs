//! Client configuration.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `TSHEETS_BEARER_TOKEN` | yes | none |
//! | `TSHEETS_BASE_URL` | no | `https://rest.tsheets.com/api` |
//! | `TSHEETS_API_VERSION` | no | `v1` |

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://rest.tsheets.com/api";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const BEARER_TOKEN_ENV: &str = "TSHEETS_BEARER_TOKEN";
pub const BASE_URL_ENV: &str = "TSHEETS_BASE_URL";
pub const API_VERSION_ENV: &str = "TSHEETS_API_VERSION";

/// Connection settings for one API account.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_version: String,
    bearer_token: String,
    timeout_ms: u64,
}

impl ClientConfig {
    pub fn new(bearer_token: impl Into<String>) -> Result<Self, ConfigError> {
        let bearer_token = bearer_token.into();
        if bearer_token.trim().is_empty() {
            return Err(ConfigError::MissingBearerToken);
        }

        Ok(Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_version: String::from(DEFAULT_API_VERSION),
            bearer_token,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var(BEARER_TOKEN_ENV).unwrap_or_default();
        let mut config = Self::new(token)?;

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config = config.with_base_url(base_url)?;
        }
        if let Ok(api_version) = std::env::var(API_VERSION_ENV) {
            config = config.with_api_version(api_version)?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        self.base_url = trimmed.to_owned();
        Ok(self)
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Result<Self, ConfigError> {
        let api_version = api_version.into();
        let trimmed = api_version.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyApiVersion);
        }
        self.api_version = trimmed.to_owned();
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self, ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.timeout_ms = timeout_ms;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Root every resource path is appended to, e.g. `https://rest.tsheets.com/api/v1`.
    pub fn endpoint_root(&self) -> String {
        format!("{}/{}", self.base_url, self.api_version)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("bearer_token", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
