//! Mapping arbitrary errors onto exit statuses.
//!
//! Checks run in a fixed order and the first match wins:
//!
//! 1. no error → `Ok`
//! 2. the empty-result sentinel → `NotFound`
//! 3. an upstream [`ApiError`] → its code, or a code derived from its status
//! 4. typed errors raised by this crate or `deputy-core`
//! 5. known phrases in the message text
//! 6. everything else → `General`
//!
//! Every check walks the whole source chain, so wrapping an error with
//! `anyhow::Context` never changes how it is classified.

use deputy_core::ApiError;

use super::{CliError, ErrorKind, ExitStatus};

/// Phrases that mark bad command-line input.
const INPUT_PHRASES: &[&str] = &[
    "unknown flag",
    "required flag",
    "missing required argument",
    "invalid --output",
    "too many arguments",
];

/// Phrases that mark transient failures.
const TEMPORARY_PHRASES: &[&str] = &["connection refused", "no such host", "timeout"];

/// Classify an error into an exit status. Total: never fails, never panics.
pub fn classify(err: Option<&anyhow::Error>) -> ExitStatus {
    let Some(err) = err else {
        return ExitStatus::Ok;
    };

    if is_empty_result(err) {
        return ExitStatus::NotFound;
    }

    if let Some(api) = find_api_error(err) {
        return api_error_kind(api).exit_status();
    }

    if let Some(kind) = typed_kind(err) {
        return kind.exit_status();
    }

    message_status(&chain_message(err)).unwrap_or(ExitStatus::General)
}

/// Whether the chain contains the empty-result sentinel.
pub fn is_empty_result(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| matches!(cause.downcast_ref::<CliError>(), Some(CliError::EmptyResult)))
}

/// Find the upstream API error anywhere in the chain.
pub fn find_api_error(err: &anyhow::Error) -> Option<&ApiError> {
    err.chain().find_map(|cause| {
        cause.downcast_ref::<ApiError>().or_else(|| {
            cause
                .downcast_ref::<deputy_core::Error>()
                .and_then(deputy_core::Error::as_api)
        })
    })
}

/// Kind of an upstream error: the explicit code when present, else the status.
pub fn api_error_kind(api: &ApiError) -> ErrorKind {
    api.code
        .as_deref()
        .filter(|code| !code.trim().is_empty())
        .map_or_else(|| ErrorKind::from_status(api.status_code), ErrorKind::from_code)
}

/// Kind of a typed, non-API error raised by this crate or the client crate.
pub fn typed_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.chain().find_map(|cause| {
        if let Some(cli) = cause.downcast_ref::<CliError>() {
            return Some(cli.kind());
        }
        match cause.downcast_ref::<deputy_core::Error>()? {
            deputy_core::Error::NotAuthenticated => Some(ErrorKind::AuthRequired),
            deputy_core::Error::MissingBaseUrl | deputy_core::Error::InvalidBaseUrl { .. } => {
                Some(ErrorKind::InvalidInput)
            },
            deputy_core::Error::Api(api) => Some(api_error_kind(api)),
            deputy_core::Error::Decode(_) | deputy_core::Error::Client(_) => None,
        }
    })
}

/// Full message of the chain, outermost first, joined by `": "`.
pub(crate) fn chain_message(err: &anyhow::Error) -> String {
    format!("{err:#}")
}

fn message_status(message: &str) -> Option<ExitStatus> {
    let lower = message.to_lowercase();
    if INPUT_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some(ExitStatus::InputError);
    }
    if TEMPORARY_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some(ExitStatus::TempError);
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    fn api(status: u16, code: Option<&str>, message: &str) -> anyhow::Error {
        anyhow::Error::new(ApiError {
            code: code.map(str::to_string),
            status_code: status,
            message: message.to_string(),
            ..ApiError::default()
        })
    }

    mod ordering {
        use super::*;

        #[test]
        fn test_none_is_ok() {
            assert_eq!(classify(None), ExitStatus::Ok);
        }

        #[test]
        fn test_every_exit_status_is_reachable() {
            let cases = [
                (anyhow!("something odd happened"), ExitStatus::General),
                (anyhow!("unknown flag: --bogus"), ExitStatus::InputError),
                (api(401, None, "Unauthorized"), ExitStatus::AuthError),
                (anyhow::Error::new(CliError::EmptyResult), ExitStatus::NotFound),
                (api(429, None, "slow down"), ExitStatus::RateLimit),
                (anyhow!("dial tcp: connection refused"), ExitStatus::TempError),
            ];
            for (err, expected) in cases {
                assert_eq!(classify(Some(&err)), expected, "{err:#}");
            }
        }

        #[test]
        fn test_sentinel_wins_even_when_wrapped() {
            let err = anyhow::Error::new(CliError::EmptyResult)
                .context("listing employees")
                .context("timeout while rendering");
            assert_eq!(classify(Some(&err)), ExitStatus::NotFound);
        }

        #[test]
        fn test_api_error_wins_over_message_text() {
            let err = api(404, None, "unknown flag in request body");
            assert_eq!(classify(Some(&err)), ExitStatus::NotFound);
        }

        #[test]
        fn test_401_is_auth_regardless_of_message_or_code() {
            for code in [None, Some("AUTH_REQUIRED")] {
                for message in ["Unauthorized", "connection refused", "timeout"] {
                    let err = api(401, code, message);
                    assert_eq!(classify(Some(&err)), ExitStatus::AuthError);
                }
            }
        }
    }

    mod api_errors {
        use super::*;

        #[test]
        fn test_explicit_code_beats_status() {
            let err = api(400, Some("RATE_LIMITED"), "quota");
            assert_eq!(classify(Some(&err)), ExitStatus::RateLimit);
        }

        #[test]
        fn test_status_table() {
            let cases = [
                (400, ExitStatus::InputError),
                (403, ExitStatus::AuthError),
                (404, ExitStatus::NotFound),
                (408, ExitStatus::TempError),
                (409, ExitStatus::InputError),
                (422, ExitStatus::InputError),
                (500, ExitStatus::TempError),
                (502, ExitStatus::TempError),
                (418, ExitStatus::General),
            ];
            for (status, expected) in cases {
                assert_eq!(classify(Some(&api(status, None, "x"))), expected, "{status}");
            }
        }

        #[test]
        fn test_found_through_context() {
            let err = api(403, None, "Forbidden").context("fetching employee 7");
            assert_eq!(find_api_error(&err).map(|a| a.status_code), Some(403));
            assert_eq!(classify(Some(&err)), ExitStatus::AuthError);
        }

        #[test]
        fn test_found_inside_core_error() {
            let core = deputy_core::Error::Api(ApiError {
                status_code: 503,
                message: "maintenance".into(),
                ..ApiError::default()
            });
            let err = anyhow::Error::new(core).context("listing rosters");
            assert_eq!(classify(Some(&err)), ExitStatus::TempError);
        }

        #[test]
        fn test_transport_error_code() {
            let core = deputy_core::Error::Api(ApiError::transport(
                deputy_core::CODE_TIMEOUT,
                "operation timed out",
            ));
            assert_eq!(classify(Some(&anyhow::Error::new(core))), ExitStatus::TempError);
        }
    }

    mod typed {
        use super::*;

        #[test]
        fn test_not_authenticated_is_auth_error() {
            let err = anyhow::Error::new(deputy_core::Error::NotAuthenticated);
            assert_eq!(classify(Some(&err)), ExitStatus::AuthError);
        }

        #[test]
        fn test_missing_base_url_is_input_error() {
            let err = anyhow::Error::new(deputy_core::Error::MissingBaseUrl);
            assert_eq!(classify(Some(&err)), ExitStatus::InputError);
        }

        #[test]
        fn test_invalid_query_is_input_error() {
            let err = anyhow::Error::new(CliError::InvalidQuery("bad token".into()));
            assert_eq!(classify(Some(&err)), ExitStatus::InputError);
        }

        #[test]
        fn test_decode_error_falls_through() {
            let err = anyhow::Error::new(deputy_core::Error::Decode("expected array".into()));
            assert_eq!(classify(Some(&err)), ExitStatus::General);
        }
    }

    mod messages {
        use super::*;

        #[test]
        fn test_input_phrases() {
            for msg in [
                "Unknown flag: --foo",
                "required flag \"id\" not set",
                "missing required argument: <ID>",
                "invalid --output value \"yaml\"",
                "too many arguments",
            ] {
                assert_eq!(classify(Some(&anyhow!("{msg}"))), ExitStatus::InputError, "{msg}");
            }
        }

        #[test]
        fn test_temporary_phrases() {
            for msg in [
                "Connection refused",
                "lookup api.example: no such host",
                "request TIMEOUT",
            ] {
                assert_eq!(classify(Some(&anyhow!("{msg}"))), ExitStatus::TempError, "{msg}");
            }
        }

        #[test]
        fn test_phrase_in_wrapped_cause() {
            let err = anyhow!("connection refused").context("calling API");
            assert_eq!(classify(Some(&err)), ExitStatus::TempError);
        }

        #[test]
        fn test_default_is_general() {
            assert_eq!(classify(Some(&anyhow!("disk full"))), ExitStatus::General);
        }
    }

    #[test]
    fn test_context_result_helper_keeps_classification() {
        let result: Result<(), CliError> = Err(CliError::EmptyResult);
        let err = result.context("rendering").unwrap_err();
        assert!(is_empty_result(&err));
    }
}
