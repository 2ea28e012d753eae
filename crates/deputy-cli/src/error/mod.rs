//! CLI error handling with semantic exit codes.
//!
//! Commands never pick an exit code themselves. They return `anyhow::Error`
//! unchanged up to [`crate::App::run`], where [`classify`] maps the error to an
//! [`ExitStatus`] and [`format_error`] / [`format_error_json`] render it for
//! humans or automation.
//!
//! # Exit Codes
//!
//! | Code | Status | Description |
//! |------|--------|-------------|
//! | 0 | `Ok` | Command completed successfully |
//! | 1 | `General` | Unclassified failure |
//! | 2 | `InputError` | Bad flags, bad arguments, validation failure |
//! | 3 | `AuthError` | Authentication or authorization failure |
//! | 4 | `NotFound` | Resource not found, or empty result with `--fail-empty` |
//! | 5 | `RateLimit` | Rate limited by the API |
//! | 6 | `TempError` | Network failure, timeout, or 5xx |
//!
//! These values are a public contract: scripts depend on them.
//!
//! ```bash
//! deputy employees get 42 --output json
//! case $? in
//!     0) echo "found" ;;
//!     4) echo "no such employee" ;;
//!     6) echo "try again later" ;;
//! esac
//! ```

mod classify;
mod format;

use std::fmt;
use std::process::ExitCode;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classify::{api_error_kind, classify, find_api_error, is_empty_result, typed_kind};
pub use format::{ErrorBody, ErrorEnvelope, build_envelope, format_error, format_error_json, hint_for_status};

/// Process exit status for a command invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExitStatus {
    /// Command completed successfully (exit code 0).
    Ok = 0,
    /// Unclassified failure (exit code 1).
    General = 1,
    /// Invalid flags, arguments, or request data (exit code 2).
    InputError = 2,
    /// Authentication or authorization failure (exit code 3).
    AuthError = 3,
    /// Resource not found, or an empty result under `--fail-empty` (exit code 4).
    NotFound = 4,
    /// Rate limited (exit code 5).
    RateLimit = 5,
    /// Transient failure: network, timeout, server error (exit code 6).
    TempError = 6,
}

impl ExitStatus {
    /// Get the numeric exit code.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Create an `ExitCode` for returning from `main`.
    #[must_use]
    pub fn as_exit_code(self) -> ExitCode {
        ExitCode::from(self.exit_code())
    }

    /// Get a short description of this status.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::General => "general error",
            Self::InputError => "input error",
            Self::AuthError => "authentication error",
            Self::NotFound => "not found",
            Self::RateLimit => "rate limited",
            Self::TempError => "temporary error",
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Machine-readable error taxonomy, independent of transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Missing or expired credentials (HTTP 401).
    AuthRequired,
    /// Authenticated but not permitted (HTTP 403).
    AuthForbidden,
    /// Resource missing, or an empty result under `--fail-empty`.
    NotFound,
    /// Request data failed upstream validation (HTTP 422).
    Validation,
    /// Bad request data, argument, or setting.
    InvalidInput,
    /// Unknown or malformed flag.
    InvalidFlag,
    /// Resource state conflict (HTTP 409).
    Conflict,
    /// Too many requests (HTTP 429).
    RateLimited,
    /// Upstream failure (HTTP 5xx).
    ServerError,
    /// Request timed out.
    Timeout,
    /// Upstream could not be reached.
    NetworkError,
    /// Anything not covered above.
    Unknown,
}

impl ErrorKind {
    /// Wire name, e.g. `NOT_FOUND`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::AuthForbidden => "AUTH_FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION",
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidFlag => "INVALID_FLAG",
            Self::Conflict => "CONFLICT",
            Self::RateLimited => "RATE_LIMITED",
            Self::ServerError => "SERVER_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::NetworkError => "NETWORK_ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse an upstream code. Matching ignores case; unrecognized codes map to
    /// [`ErrorKind::Unknown`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "AUTH_REQUIRED" => Self::AuthRequired,
            "AUTH_FORBIDDEN" => Self::AuthForbidden,
            "NOT_FOUND" => Self::NotFound,
            "VALIDATION" => Self::Validation,
            "INVALID_INPUT" => Self::InvalidInput,
            "INVALID_FLAG" => Self::InvalidFlag,
            "CONFLICT" => Self::Conflict,
            "RATE_LIMITED" => Self::RateLimited,
            "SERVER_ERROR" => Self::ServerError,
            "TIMEOUT" => Self::Timeout,
            "NETWORK_ERROR" => Self::NetworkError,
            _ => Self::Unknown,
        }
    }

    /// Derive a kind from an HTTP status.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::AuthRequired,
            403 => Self::AuthForbidden,
            404 => Self::NotFound,
            400 => Self::InvalidInput,
            409 => Self::Conflict,
            422 => Self::Validation,
            429 => Self::RateLimited,
            408 => Self::Timeout,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Exit status for errors of this kind.
    #[must_use]
    pub const fn exit_status(self) -> ExitStatus {
        match self {
            Self::AuthRequired | Self::AuthForbidden => ExitStatus::AuthError,
            Self::NotFound => ExitStatus::NotFound,
            Self::Validation | Self::InvalidInput | Self::InvalidFlag | Self::Conflict => {
                ExitStatus::InputError
            },
            Self::RateLimited => ExitStatus::RateLimit,
            Self::ServerError | Self::Timeout | Self::NetworkError => ExitStatus::TempError,
            Self::Unknown => ExitStatus::General,
        }
    }

    /// Whether an error of this kind is worth retrying unchanged.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError | Self::Timeout | Self::NetworkError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the CLI itself (as opposed to the API client).
#[derive(Debug, Error)]
pub enum CliError {
    /// A list or lookup produced nothing while `--fail-empty` was set in JSON mode.
    #[error("no results found")]
    EmptyResult,

    /// Bad flag value, argument, or environment setting.
    #[error("{0}")]
    InvalidInput(String),

    /// A flag the command tree does not know.
    #[error("{0}")]
    InvalidFlag(String),

    /// The `--query` expression could not be parsed.
    #[error("invalid jq query: {0}")]
    InvalidQuery(String),
}

impl CliError {
    /// Taxonomy kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyResult => ErrorKind::NotFound,
            Self::InvalidInput(_) | Self::InvalidQuery(_) => ErrorKind::InvalidInput,
            Self::InvalidFlag(_) => ErrorKind::InvalidFlag,
        }
    }
}
