//! Current-user command

use std::io::Write;

use anyhow::{Context as _, Result};
use deputy_core::{ApiClient, Me};

use crate::context::Context;
use crate::output::{Describe, Renderer};
use crate::utils::formatting::{id_or_missing, or_missing};

/// Show the authenticated user.
pub async fn show(client: &dyn ApiClient, ctx: &Context, out: &mut dyn Write) -> Result<()> {
    let mut renderer = Renderer::new(ctx.render_options(None), out)?;
    let me = client.me().await.context("failed to fetch current user")?;
    renderer.single(Some(&me))
}

impl Describe for Me {
    fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", or_missing(Some(&self.name))),
            ("User ID", self.user_id.to_string()),
            ("Employee ID", id_or_missing(Some(self.employee_id))),
            ("Email", or_missing(self.primary_email.as_deref())),
            ("Company", id_or_missing(self.company)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_order_and_placeholders() {
        let me = Me {
            user_id: 3,
            name: "Ada Lovelace".into(),
            ..Me::default()
        };
        let fields = me.describe();
        let labels: Vec<&str> = fields.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, ["Name", "User ID", "Employee ID", "Email", "Company"]);
        assert_eq!(fields[1].1, "3");
        assert_eq!(fields[3].1, "-");
    }
}
