//! Roster commands

use std::io::Write;

use anyhow::Result;
use deputy_core::{ApiClient, Resource, Roster};

use super::fetch_all;
use crate::args::ListArgs;
use crate::context::Context;
use crate::output::{Renderer, TableRow};
use crate::utils::formatting::{format_timestamp, id_or_missing, yes_no};

/// List rosters.
pub async fn list(
    client: &dyn ApiClient,
    ctx: &Context,
    args: &ListArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let mut renderer = Renderer::new(ctx.render_options(Some(args)), out)?;
    let rosters = fetch_all(Resource::Roster, client.rosters()).await?;
    renderer.list(&args.apply(rosters))
}

impl TableRow for Roster {
    const HEADERS: &'static [&'static str] =
        &["ID", "EMPLOYEE", "AREA", "START", "END", "PUBLISHED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            id_or_missing(Some(self.employee)),
            id_or_missing(Some(self.operational_unit)),
            format_timestamp(self.starts_at()),
            format_timestamp(self.ends_at()),
            yes_no(self.published).to_string(),
        ]
    }
}
