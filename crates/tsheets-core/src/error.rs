use thiserror::Error;

use crate::http_client::HttpError;
use crate::resource::Verb;

/// Remote error code signalling "too many requests".
pub const RATE_LIMITED_CODE: u16 = 429;

/// Configuration errors raised while constructing a client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("a bearer token is required")]
    MissingBearerToken,
    #[error("base url cannot be empty")]
    EmptyBaseUrl,
    #[error("api version cannot be empty")]
    EmptyApiVersion,
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Errors surfaced by the request engine and the resource handles.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (DNS, connect, timeout, unreadable body).
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    /// Application-level error declared by the remote API.
    #[error("[Code {code}] {message}")]
    RemoteApi { message: String, code: u16 },

    /// The response did not have the shape the client relies on.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("verb '{verb}' is not supported by resource '{resource}'")]
    UnsupportedVerb { resource: String, verb: Verb },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn remote(message: impl Into<String>, code: u16) -> Self {
        Self::RemoteApi {
            message: message.into(),
            code,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Code declared by the remote API, if this is a remote error.
    pub const fn remote_code(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RemoteApi { code, .. } if *code == RATE_LIMITED_CODE)
    }

    /// Stable machine-readable classification.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "api.transport",
            Self::RemoteApi { code, .. } if *code == RATE_LIMITED_CODE => "api.rate_limited",
            Self::RemoteApi { .. } => "api.remote",
            Self::MalformedResponse(_) => "api.malformed_response",
            Self::UnsupportedVerb { .. } => "api.unsupported_verb",
            Self::InvalidRequest(_) => "api.invalid_request",
            Self::Serialization(_) => "api.serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_renders_code_and_message() {
        let error = ApiError::remote("Too many requests", 429);

        assert_eq!(error.to_string(), "[Code 429] Too many requests");
        assert_eq!(error.remote_code(), Some(429));
        assert!(error.is_rate_limited());
        assert_eq!(error.code(), "api.rate_limited");
    }

    #[test]
    fn non_remote_errors_have_no_remote_code() {
        let error = ApiError::malformed("missing results.users");

        assert_eq!(error.remote_code(), None);
        assert!(!error.is_rate_limited());
        assert_eq!(error.code(), "api.malformed_response");
    }

    #[test]
    fn transport_error_is_not_rate_limited() {
        let error = ApiError::from(HttpError::new("connection refused"));

        assert!(!error.is_rate_limited());
        assert_eq!(error.code(), "api.transport");
    }
}
