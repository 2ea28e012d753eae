//! Error types for deputy-core operations.
//!
//! Two layers live here:
//!
//! - [`ApiError`]: the structured error returned by the upstream REST API (or
//!   synthesized for transport failures). It carries the HTTP status, an optional
//!   machine code, and retry metadata, and is what the CLI's exit-code mapping
//!   looks for in an error chain.
//! - [`Error`]: everything this crate can fail with, including configuration
//!   problems detected before a request is ever sent.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Machine code attached to transport failures that timed out.
pub const CODE_TIMEOUT: &str = "TIMEOUT";

/// Machine code attached to transport failures that never reached the server.
pub const CODE_NETWORK_ERROR: &str = "NETWORK_ERROR";

/// Structured error produced by the upstream API.
///
/// A `status_code` of `0` means the request never produced an HTTP response
/// (connection refused, DNS failure, timeout); `code` is then always set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiError {
    /// Optional machine-readable code (e.g. `NOT_FOUND`).
    pub code: Option<String>,
    /// HTTP status, or `0` for transport failures.
    pub status_code: u16,
    /// Human-readable message from the server or transport layer.
    pub message: String,
    /// Whether repeating the same request may succeed.
    pub retryable: bool,
    /// Seconds to wait before retrying, `0` when unknown.
    pub retry_after: u64,
    /// Offending request field, empty when unknown.
    pub field: String,
}

/// Error payload shapes the upstream API is known to return.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error: Option<ErrorDetail>,
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    field: Option<String>,
}

impl ApiError {
    /// Build an error from a non-success HTTP response.
    ///
    /// `body` is parsed as one of the known JSON error shapes; anything else is
    /// used verbatim as the message, falling back to the canonical reason phrase.
    pub fn from_response(status: u16, body: &str, retry_after: Option<u64>) -> Self {
        let payload: ErrorPayload = serde_json::from_str(body).unwrap_or_default();
        let detail = payload.error.unwrap_or_default();

        let message = detail
            .message
            .or(payload.message)
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| reason_phrase(status));

        // Upstream sometimes sends numeric codes; only string codes are meaningful here.
        let code = match detail.code {
            Some(serde_json::Value::String(code)) if !code.is_empty() => Some(code),
            _ => None,
        };

        Self {
            code,
            status_code: status,
            message,
            retryable: is_retryable_status(status),
            retry_after: retry_after.unwrap_or(0),
            field: detail.field.unwrap_or_default(),
        }
    }

    /// Build an error for a request that never produced an HTTP response.
    pub fn transport(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.to_string()),
            status_code: 0,
            message: message.into(),
            retryable: true,
            retry_after: 0,
            field: String::new(),
        }
    }

    /// Whether this error carries a real HTTP status.
    #[must_use]
    pub const fn has_status(&self) -> bool {
        self.status_code != 0
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest hides the root cause (e.g. "connection refused") in the source chain.
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        if err.is_timeout() {
            Self::transport(CODE_TIMEOUT, message)
        } else {
            Self::transport(CODE_NETWORK_ERROR, message)
        }
    }
}

fn is_retryable_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..600).contains(&status)
}

fn reason_phrase(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map_or_else(|| format!("HTTP {status}"), str::to_string)
}

/// The main error type for deputy-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The API (or the transport beneath it) rejected the request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No API token was supplied.
    #[error("not authenticated: set DEPUTY_TOKEN or pass --token")]
    NotAuthenticated,

    /// No API base URL was supplied.
    #[error("no API base URL configured: set DEPUTY_BASE_URL or pass --base-url")]
    MissingBaseUrl,

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// URL as given by the user.
        url: String,
        /// Parser failure.
        reason: String,
    },

    /// A success response could not be decoded into the expected model.
    #[error("failed to decode API response: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("failed to initialise HTTP client: {0}")]
    Client(String),
}

impl Error {
    /// The upstream API error, if this is one.
    #[must_use]
    pub const fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(api) => Some(api),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Api(ApiError::from(err))
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;
