//! Logging initialization and configuration.
//!
//! This module handles setting up the tracing subscriber and color control
//! based on the resolved [`Context`].

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::context::Context;

/// Pick the log level for an invocation.
///
/// Machine-readable output keeps stderr to errors only unless verbose or
/// debug logging was explicitly requested.
#[must_use]
pub const fn log_level(ctx: &Context) -> Level {
    if ctx.verbose || ctx.debug {
        Level::DEBUG
    } else if ctx.mode.is_json() {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr so stdout stays parseable.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(ctx: &Context) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(ctx))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if !ctx.color {
        color_control::set_override(false);
    }
    Ok(())
}
