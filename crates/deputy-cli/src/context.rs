//! Per-invocation settings, resolved once before any command runs.

use std::time::Duration;

use deputy_core::ClientConfig;

use crate::args::ListArgs;
use crate::cli::Cli;
use crate::error::CliError;
use crate::output::{Environment, OutputMode, RenderOptions, resolve_output};

/// Everything a command needs to know about how to behave, resolved once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Context {
    /// Resolved output mode.
    pub mode: OutputMode,
    /// JSON Lines output.
    pub raw: bool,
    /// Non-blank `--query` expression.
    pub query: Option<String>,
    /// Print raw error chains.
    pub debug: bool,
    /// Debug-level logging on stderr.
    pub verbose: bool,
    /// ANSI styling in text output.
    pub color: bool,
}

impl Context {
    /// Resolve output settings from parsed flags and the captured environment.
    ///
    /// # Errors
    ///
    /// Returns an input error for an invalid `--output` or `DEPUTY_OUTPUT`.
    pub fn resolve(cli: &Cli, env: &Environment) -> Result<Self, CliError> {
        let (mode, raw) = resolve_output(cli.output.as_deref(), env, cli.raw)?;
        let color = mode == OutputMode::Text && env.stdout_is_terminal && !cli.no_color && !env.no_color;
        Ok(Self {
            mode,
            raw,
            query: cli.query.clone().filter(|q| !q.trim().is_empty()),
            debug: cli.debug,
            verbose: cli.verbose,
            color,
        })
    }

    /// Render options for one command; `list` carries pagination and
    /// `--fail-empty` for list commands.
    #[must_use]
    pub fn render_options(&self, list: Option<&ListArgs>) -> RenderOptions {
        RenderOptions {
            mode: self.mode,
            raw: self.raw,
            query: self.query.clone(),
            limit: list.and_then(ListArgs::limit),
            offset: list.and_then(ListArgs::offset),
            fail_on_empty: list.is_some_and(|args| args.fail_empty),
            color: self.color,
        }
    }
}

/// Client settings taken from global flags.
#[must_use]
pub fn client_config(cli: &Cli) -> ClientConfig {
    ClientConfig {
        base_url: cli.base_url.clone().filter(|url| !url.trim().is_empty()),
        token: cli.token.clone().filter(|token| !token.trim().is_empty()),
        timeout: Duration::from_secs(cli.timeout),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["deputy"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_piped_defaults() {
        let ctx = Context::resolve(&cli(&["me"]), &Environment::piped()).unwrap();
        assert_eq!(ctx.mode, OutputMode::Json);
        assert!(!ctx.raw);
        assert!(!ctx.color);
    }

    #[test]
    fn test_terminal_text_has_color_unless_disabled() {
        let ctx = Context::resolve(&cli(&["me"]), &Environment::terminal()).unwrap();
        assert!(ctx.color);

        let ctx = Context::resolve(&cli(&["me", "--no-color"]), &Environment::terminal()).unwrap();
        assert!(!ctx.color);

        let env = Environment {
            no_color: true,
            ..Environment::terminal()
        };
        assert!(!Context::resolve(&cli(&["me"]), &env).unwrap().color);
    }

    #[test]
    fn test_invalid_output_is_error() {
        let err = Context::resolve(&cli(&["me", "-o", "yaml"]), &Environment::piped()).unwrap_err();
        assert!(err.to_string().contains("invalid --output"));
    }

    #[test]
    fn test_render_options_carry_pagination() {
        let parsed = cli(&["employees", "list", "--limit", "5", "--fail-empty"]);
        let ctx = Context::resolve(&parsed, &Environment::piped()).unwrap();
        let options = ctx.render_options(parsed.command.list_args());
        assert_eq!(options.limit, Some(5));
        assert_eq!(options.offset, None);
        assert!(options.fail_on_empty);

        let single = ctx.render_options(None);
        assert!(!single.fail_on_empty);
        assert_eq!(single.limit, None);
    }

    #[test]
    fn test_blank_query_is_dropped() {
        let ctx = Context::resolve(&cli(&["me", "-q", " "]), &Environment::piped()).unwrap();
        assert!(ctx.query.is_none());
    }

    #[test]
    fn test_client_config_from_flags() {
        let parsed = cli(&["me", "--base-url", "acme.deputy.com", "--token", "t0k", "--timeout", "5"]);
        let config = client_config(&parsed);
        assert_eq!(config.base_url.as_deref(), Some("acme.deputy.com"));
        assert_eq!(config.token.as_deref(), Some("t0k"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
