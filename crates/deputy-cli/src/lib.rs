//! deputy CLI - command-line client for the Deputy workforce API
//!
//! The library half of the binary. [`App::run`] is the single place where a
//! command's result becomes process output: data on stdout, errors on stderr,
//! and an [`ExitStatus`] for the shell. Everything an invocation needs is
//! resolved up front into a [`Context`](context::Context) and passed down
//! explicitly; the API client is produced by an injected connector so tests
//! can substitute a stub without touching global state.

use std::ffi::OsString;
use std::io::{self, Write};

use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind as ClapErrorKind};
use deputy_core::{ApiClient, ClientConfig, HttpClient};
use tracing::debug;

pub mod args;
pub mod cli;
mod commands;
pub mod context;
pub mod error;
pub mod output;
pub mod query;
pub mod utils;

use crate::cli::Cli;
use crate::context::{Context, client_config};
use crate::error::{CliError, ExitStatus, classify, format_error, format_error_json};
use crate::output::detect::fallback_mode;
use crate::output::{Environment, OutputMode};
use crate::utils::logging::initialize_logging;

/// Builds an API client from resolved connection settings.
pub type Connector = dyn Fn(&ClientConfig) -> deputy_core::Result<Box<dyn ApiClient>> + Send + Sync;

/// One configured CLI application.
pub struct App {
    environment: Environment,
    connector: Box<Connector>,
    install_logging: bool,
}

impl App {
    /// Create an app with an explicit environment and client connector.
    ///
    /// Logging is not installed; use [`App::with_logging`] to opt in.
    #[must_use]
    pub fn new(environment: Environment, connector: Box<Connector>) -> Self {
        Self {
            environment,
            connector,
            install_logging: false,
        }
    }

    /// Create the production app: real environment, real HTTP client, logging on.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            Environment::capture(),
            Box::new(
                |config: &ClientConfig| -> deputy_core::Result<Box<dyn ApiClient>> {
                    Ok(Box::new(HttpClient::new(config)?))
                },
            ),
        )
        .with_logging(true)
    }

    /// Install the global tracing subscriber on [`App::run`].
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.install_logging = enabled;
        self
    }

    /// Parse `args`, run the selected command, and report the outcome.
    ///
    /// Results go to `stdout`; errors are rendered to `stderr` as text or as a
    /// JSON envelope depending on the resolved output mode. Never panics and
    /// never returns an error: every failure is folded into the exit status.
    pub async fn run<I, T>(&self, args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> ExitStatus
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        let cli = match Cli::try_parse_from(&args) {
            Ok(cli) => cli,
            Err(err) => return self.report_usage(&err, &args, stdout, stderr),
        };

        let ctx = match Context::resolve(&cli, &self.environment) {
            Ok(ctx) => ctx,
            Err(err) => {
                let mode = fallback_mode(cli.output.as_deref(), &self.environment, cli.raw);
                return report(&anyhow::Error::from(err), mode, cli.debug, stderr);
            },
        };

        if self.install_logging {
            if let Err(err) = initialize_logging(&ctx) {
                return report(&err, ctx.mode, ctx.debug, stderr);
            }
        }

        debug!(mode = %ctx.mode, raw = ctx.raw, "resolved output");

        let client = match (self.connector)(&client_config(&cli)) {
            Ok(client) => client,
            Err(err) => return report(&anyhow::Error::from(err), ctx.mode, ctx.debug, stderr),
        };

        match commands::execute(&cli.command, client.as_ref(), &ctx, stdout).await {
            Ok(()) => ExitStatus::Ok,
            Err(err) => report(&err, ctx.mode, ctx.debug, stderr),
        }
    }

    /// Help and version are successful output; every other clap failure is a
    /// usage error reported through the normal error contract.
    fn report_usage(
        &self,
        err: &clap::Error,
        args: &[OsString],
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> ExitStatus {
        if matches!(err.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) {
            return match write!(stdout, "{err}") {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => ExitStatus::General,
                _ => ExitStatus::Ok,
            };
        }

        let flags = RawFlags::scan(args);
        let mode = fallback_mode(flags.output.as_deref(), &self.environment, flags.raw);
        report(&anyhow::Error::from(usage_error(err)), mode, flags.debug, stderr)
    }
}

/// Classify and print an error, returning the exit status.
fn report(err: &anyhow::Error, mode: OutputMode, debug: bool, stderr: &mut dyn Write) -> ExitStatus {
    if is_broken_pipe(err) {
        return ExitStatus::Ok;
    }

    let status = classify(Some(err));
    let rendered = if mode.is_json() {
        format_error_json(Some(err), debug)
    } else {
        format_error(Some(err), debug)
    };
    // Nowhere left to report a failed stderr write.
    let _ = writeln!(stderr, "{rendered}");
    status
}

/// Map a clap parse failure onto a typed usage error.
fn usage_error(err: &clap::Error) -> CliError {
    if err.kind() == ClapErrorKind::UnknownArgument {
        if let Some(ContextValue::String(arg)) = err.get(ContextKind::InvalidArg) {
            return CliError::InvalidFlag(format!("unknown flag: {arg}"));
        }
        return CliError::InvalidFlag("unknown flag".into());
    }

    let text = err.to_string();
    let first = text.lines().next().unwrap_or_default();
    let message = first.strip_prefix("error: ").unwrap_or(first).trim();
    if message.is_empty() {
        CliError::InvalidInput(format!("{:?}", err.kind()))
    } else {
        CliError::InvalidInput(message.to_string())
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .map(io::Error::kind)
            .or_else(|| {
                cause
                    .downcast_ref::<serde_json::Error>()
                    .and_then(serde_json::Error::io_error_kind)
            })
            == Some(io::ErrorKind::BrokenPipe)
    })
}

/// Contract flags pulled from raw arguments when clap itself rejected them.
#[derive(Debug, Default, PartialEq, Eq)]
struct RawFlags {
    output: Option<String>,
    raw: bool,
    debug: bool,
}

impl RawFlags {
    fn scan(args: &[OsString]) -> Self {
        let mut flags = Self::default();
        let mut iter = args.iter().skip(1).map(|arg| arg.to_string_lossy());
        while let Some(arg) = iter.next() {
            match arg.as_ref() {
                "--" => break,
                "--raw" => flags.raw = true,
                "--debug" => flags.debug = true,
                "--output" | "-o" => flags.output = iter.next().map(std::borrow::Cow::into_owned),
                other => {
                    if let Some(value) = other.strip_prefix("--output=") {
                        flags.output = Some(value.to_string());
                    } else if let Some(value) = other.strip_prefix("-o").filter(|v| !v.is_empty()) {
                        flags.output = Some(value.trim_start_matches('=').to_string());
                    }
                },
            }
        }
        flags
    }
}
