//! Leave request commands

use std::io::Write;

use anyhow::Result;
use deputy_core::{ApiClient, Leave, Resource};

use super::fetch_all;
use crate::args::ListArgs;
use crate::context::Context;
use crate::output::{Renderer, TableRow};
use crate::utils::formatting::or_missing;

/// List leave requests.
pub async fn list(
    client: &dyn ApiClient,
    ctx: &Context,
    args: &ListArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let mut renderer = Renderer::new(ctx.render_options(Some(args)), out)?;
    let leave = fetch_all(Resource::Leave, client.leave()).await?;
    renderer.list(&args.apply(leave))
}

impl TableRow for Leave {
    const HEADERS: &'static [&'static str] = &["ID", "EMPLOYEE", "FROM", "TO", "STATUS", "COMMENT"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.employee.to_string(),
            or_missing(self.date_start.as_deref()),
            or_missing(self.date_end.as_deref()),
            self.status_label().to_string(),
            or_missing(self.comment.as_deref()),
        ]
    }
}
