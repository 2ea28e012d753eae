//! Human and machine renderings of a failed command.
//!
//! Both renderings share one status → hint table so a script reading the JSON
//! body and a person reading the terminal get the same advice.

use deputy_core::ApiError;
use serde::{Deserialize, Serialize};

use super::classify::{api_error_kind, chain_message, find_api_error, is_empty_result, typed_kind};
use super::{CliError, ErrorKind};

/// Suffix appended to human-readable errors without a more specific hint.
pub const DEBUG_HINT: &str = "Use --debug for full details";

const API_SUFFIX: &str = "Use --debug for full details. Do not redirect stderr into a JSON parser; \
                          pass --output json to get a structured error body.";

/// Error envelope written to stderr in JSON mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Machine-readable taxonomy code.
    pub code: ErrorKind,
    /// HTTP status when the failure came from the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Human-readable message.
    pub message: String,
    /// Whether retrying the same invocation may succeed.
    pub retryable: bool,
    /// Seconds to wait before retrying, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    /// Offending request field, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Actionable advice, when there is any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Top-level JSON error document: `{"error": {...}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The error itself.
    pub error: ErrorEnvelope,
}

/// Advice for a given HTTP status, shared by both renderings.
pub const fn hint_for_status(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("check field names against the resource schema"),
        401 => Some("re-authenticate"),
        403 => Some("check role permissions"),
        404 => Some("resource not found, list known resources"),
        409 => Some("conflict, verify resource state"),
        412 => Some("precondition failed, verify credentials"),
        417 => Some("data-format error, check JSON structure"),
        422 => Some("validation failed, check required fields"),
        429 => Some("rate limited, wait and retry"),
        500..=599 => Some("server error, retry later"),
        _ => None,
    }
}

/// Render an error for a person reading the terminal.
///
/// With `debug` the raw message is returned untouched. Returns an empty
/// string when there is no error.
pub fn format_error(err: Option<&anyhow::Error>, debug: bool) -> String {
    let Some(err) = err else {
        return String::new();
    };

    let message = chain_message(err);
    if debug {
        return message;
    }

    if let Some(api) = find_api_error(err) {
        return format_api_error(api);
    }

    let lower = message.to_lowercase();
    let hint = if lower.contains("invalid jq query") {
        "Hint: check the --query expression, e.g. '.items[] | .Id'"
    } else if lower.contains("unknown flag") {
        "Hint: run with --help to list the supported flags"
    } else if lower.contains("invalid --output") {
        "Hint: --output accepts 'text' or 'json'"
    } else {
        DEBUG_HINT
    };

    format!("Error: {message}\n{hint}")
}

fn format_api_error(api: &ApiError) -> String {
    let mut out = if api.has_status() {
        format!("API error {}: {}", api.status_code, api.message)
    } else {
        format!("API error: {}", api.message)
    };

    if let Some(hint) = hint_for_status(api.status_code) {
        out.push_str("\nHint: ");
        out.push_str(hint);
    }
    out.push('\n');
    out.push_str(API_SUFFIX);
    out
}

/// Build the JSON envelope for an error.
///
/// In debug mode the message is the raw chain and the hint is dropped; every
/// field the error itself carries is kept.
pub fn build_envelope(err: &anyhow::Error, debug: bool) -> ErrorEnvelope {
    let mut envelope = find_api_error(err).map_or_else(
        || envelope_for_other(err),
        envelope_for_api,
    );

    if debug {
        envelope.message = chain_message(err);
        envelope.hint = None;
    }
    envelope
}

fn envelope_for_api(api: &ApiError) -> ErrorEnvelope {
    ErrorEnvelope {
        code: api_error_kind(api),
        status: api.has_status().then_some(api.status_code),
        message: api.message.clone(),
        retryable: api.retryable,
        retry_after: (api.retry_after > 0).then_some(api.retry_after),
        field: Some(api.field.clone()).filter(|f| !f.is_empty()),
        hint: hint_for_status(api.status_code).map(str::to_string),
    }
}

fn envelope_for_other(err: &anyhow::Error) -> ErrorEnvelope {
    let message = chain_message(err);
    let code = typed_kind(err).unwrap_or_else(|| kind_from_message(&message));

    // The sentinel is reported bare, without the context it was wrapped in.
    let message = if is_empty_result(err) {
        CliError::EmptyResult.to_string()
    } else {
        message
    };

    ErrorEnvelope {
        code,
        status: None,
        message,
        retryable: code.is_retryable(),
        retry_after: None,
        field: None,
        hint: None,
    }
}

fn kind_from_message(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    if lower.contains("connection refused") || lower.contains("no such host") {
        ErrorKind::NetworkError
    } else if lower.contains("timeout") {
        ErrorKind::Timeout
    } else if lower.contains("unknown flag") {
        ErrorKind::InvalidFlag
    } else {
        ErrorKind::InvalidInput
    }
}

/// Render an error as a compact `{"error": {...}}` document.
///
/// Returns an empty string when there is no error.
pub fn format_error_json(err: Option<&anyhow::Error>, debug: bool) -> String {
    let Some(err) = err else {
        return String::new();
    };

    let body = ErrorBody {
        error: build_envelope(err, debug),
    };
    serde_json::to_string(&body).unwrap_or_else(|_| {
        format!(
            r#"{{"error":{{"code":"UNKNOWN","message":{},"retryable":false}}}}"#,
            serde_json::Value::String(body.error.message.clone())
        )
    })
}
