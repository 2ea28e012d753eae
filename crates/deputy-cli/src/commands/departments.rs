//! Department commands

use std::io::Write;

use anyhow::Result;
use deputy_core::{ApiClient, Department, Resource};

use super::fetch_all;
use crate::args::ListArgs;
use crate::context::Context;
use crate::output::{Renderer, TableRow};
use crate::utils::formatting::{id_or_missing, or_missing, yes_no};

/// List departments.
pub async fn list(
    client: &dyn ApiClient,
    ctx: &Context,
    args: &ListArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let mut renderer = Renderer::new(ctx.render_options(Some(args)), out)?;
    let departments = fetch_all(Resource::Department, client.departments()).await?;
    renderer.list(&args.apply(departments))
}

impl TableRow for Department {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "COMPANY", "ACTIVE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            or_missing(Some(&self.operational_unit_name)),
            id_or_missing(self.company),
            yes_no(self.active).to_string(),
        ]
    }
}
