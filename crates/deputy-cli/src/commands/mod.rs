//! Command implementations for the deputy CLI
//!
//! Each resource lives in its own submodule. Commands fetch through the
//! injected [`ApiClient`], hand typed results to the [`Renderer`], and return
//! errors unchanged; exit codes are decided in [`crate::App::run`].
//!
//! [`Renderer`]: crate::output::Renderer

mod departments;
mod employees;
mod leave;
mod me;
mod rosters;
mod timesheets;

use std::future::Future;
use std::io::Write;

use anyhow::{Context as _, Result};
use deputy_core::{ApiClient, Resource};
use tracing::debug;

use crate::cli::{Commands, EmployeeCommands, ListOnly};
use crate::context::Context;

/// Run the selected command.
///
/// # Errors
///
/// Propagates API, rendering, and write errors.
pub async fn execute(
    command: &Commands,
    client: &dyn ApiClient,
    ctx: &Context,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Me => me::show(client, ctx, out).await,
        Commands::Employees(EmployeeCommands::List(args)) => {
            employees::list(client, ctx, args, out).await
        },
        Commands::Employees(EmployeeCommands::Get { id }) => {
            employees::get(client, ctx, *id, out).await
        },
        Commands::Departments(ListOnly::List(args)) => {
            departments::list(client, ctx, args, out).await
        },
        Commands::Timesheets(ListOnly::List(args)) => {
            timesheets::list(client, ctx, args, out).await
        },
        Commands::Rosters(ListOnly::List(args)) => rosters::list(client, ctx, args, out).await,
        Commands::Leave(ListOnly::List(args)) => leave::list(client, ctx, args, out).await,
    }
}

/// Await a collection fetch, naming the resource in errors and logs.
async fn fetch_all<T>(
    resource: Resource,
    fetch: impl Future<Output = deputy_core::Result<Vec<T>>>,
) -> Result<Vec<T>> {
    let items = fetch
        .await
        .with_context(|| format!("failed to list {}", resource.plural()))?;
    debug!(count = items.len(), "fetched {}", resource.plural());
    Ok(items)
}
