//! Employee commands

use std::io::Write;

use anyhow::{Context as _, Result};
use deputy_core::{ApiClient, Employee, Resource};

use super::fetch_all;
use crate::args::ListArgs;
use crate::context::Context;
use crate::output::{Describe, Renderer, TableRow};
use crate::utils::formatting::{id_or_missing, or_missing, yes_no};

/// List employees.
pub async fn list(
    client: &dyn ApiClient,
    ctx: &Context,
    args: &ListArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let mut renderer = Renderer::new(ctx.render_options(Some(args)), out)?;
    let employees = fetch_all(Resource::Employee, client.employees()).await?;
    renderer.list(&args.apply(employees))
}

/// Show one employee.
pub async fn get(client: &dyn ApiClient, ctx: &Context, id: u64, out: &mut dyn Write) -> Result<()> {
    let mut renderer = Renderer::new(ctx.render_options(None), out)?;
    let employee = client
        .employee(id)
        .await
        .with_context(|| format!("failed to fetch employee {id}"))?;
    renderer.single(Some(&employee))
}

fn display_name(employee: &Employee) -> String {
    if !employee.display_name.trim().is_empty() {
        return employee.display_name.clone();
    }
    let joined = format!("{} {}", employee.first_name, employee.last_name);
    or_missing(Some(joined.trim()))
}

impl TableRow for Employee {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "ACTIVE", "START DATE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            display_name(self),
            yes_no(self.active).to_string(),
            or_missing(self.start_date.as_deref()),
        ]
    }
}

impl Describe for Employee {
    fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Name", display_name(self)),
            ("First Name", or_missing(Some(&self.first_name))),
            ("Last Name", or_missing(Some(&self.last_name))),
            ("Active", yes_no(self.active).to_string()),
            ("Company", id_or_missing(self.company)),
            ("Start Date", or_missing(self.start_date.as_deref())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(display: &str, first: &str, last: &str) -> Employee {
        Employee {
            id: 9,
            display_name: display.into(),
            first_name: first.into(),
            last_name: last.into(),
            active: true,
            ..Employee::default()
        }
    }

    #[test]
    fn test_cells_match_headers() {
        let e = employee("Ada L.", "Ada", "Lovelace");
        assert_eq!(e.cells().len(), Employee::HEADERS.len());
        assert_eq!(e.cells(), ["9", "Ada L.", "yes", "-"]);
    }

    #[test]
    fn test_name_falls_back_to_first_and_last() {
        assert_eq!(display_name(&employee("", "Ada", "Lovelace")), "Ada Lovelace");
        assert_eq!(display_name(&employee("", "", "")), "-");
    }
}
