//! Timesheet commands

use std::io::Write;

use anyhow::Result;
use deputy_core::{ApiClient, Resource, Timesheet};

use super::fetch_all;
use crate::args::ListArgs;
use crate::context::Context;
use crate::output::{Renderer, TableRow};
use crate::utils::formatting::{format_hours, format_timestamp, or_missing, yes_no};

/// List timesheets.
pub async fn list(
    client: &dyn ApiClient,
    ctx: &Context,
    args: &ListArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let mut renderer = Renderer::new(ctx.render_options(Some(args)), out)?;
    let timesheets = fetch_all(Resource::Timesheet, client.timesheets()).await?;
    renderer.list(&args.apply(timesheets))
}

impl TableRow for Timesheet {
    const HEADERS: &'static [&'static str] =
        &["ID", "EMPLOYEE", "DATE", "START", "END", "HOURS", "APPROVED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.employee.to_string(),
            or_missing(self.date.as_deref()),
            format_timestamp(self.started_at()),
            format_timestamp(self.ended_at()),
            format_hours(self.total_time),
            yes_no(self.time_approved).to_string(),
        ]
    }
}
