//! # CLI Structure and Argument Parsing
//!
//! The command-line interface for `deputy`, built with `clap` derive macros.
//!
//! ## Architecture
//!
//! - **Global options**: output contract flags (`--output`, `--raw`,
//!   `--query`, `--debug`, `--no-color`) and connection settings
//!   (`--base-url`, `--token`, `--timeout`) apply to every command
//! - **Subcommands**: one per resource, each with `list` (and `get` where the
//!   API supports lookups by id)
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Who am I?
//! deputy me
//!
//! # Tables in a terminal, JSON when piped
//! deputy employees list --limit 20
//! deputy employees list | jq '.items | length'
//!
//! # One record
//! deputy employees get 42 --output json
//!
//! # Scripting: fail when nothing comes back
//! deputy leave list --fail-empty -o json || echo "no leave requests"
//! ```
//!
//! ## Configuration
//!
//! Connection settings come from flags or the environment:
//!
//! | Flag | Environment | Default |
//! |------|-------------|---------|
//! | `--base-url` | `DEPUTY_BASE_URL` | none (required) |
//! | `--token` | `DEPUTY_TOKEN` | none (required) |
//! | `--timeout` | `DEPUTY_TIMEOUT` | 30 seconds |
//!
//! `DEPUTY_OUTPUT` sets the default output mode; see [`crate::output::detect`].

use clap::{Parser, Subcommand};

use crate::args::ListArgs;

/// Main CLI structure for the `deputy` command
#[derive(Parser, Clone, Debug)]
#[command(name = "deputy")]
#[command(version)]
#[command(about = "deputy - Command-line client for the Deputy workforce API", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text or json (default: text in a terminal, json otherwise)
    #[arg(short = 'o', long, global = true, value_name = "FORMAT")]
    pub output: Option<String>,

    /// Emit JSON Lines: one compact object per line (implies JSON)
    #[arg(long, global = true)]
    pub raw: bool,

    /// jq-style filter applied to JSON output
    #[arg(short = 'q', long, global = true, value_name = "FILTER")]
    pub query: Option<String>,

    /// Show full error chains instead of hints
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable verbose logging on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// API base URL, e.g. `https://acme.eu.deputy.com`
    #[arg(long, global = true, value_name = "URL", env = "DEPUTY_BASE_URL")]
    pub base_url: Option<String>,

    /// API access token
    #[arg(
        long,
        global = true,
        value_name = "TOKEN",
        env = "DEPUTY_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        global = true,
        value_name = "SECONDS",
        env = "DEPUTY_TIMEOUT",
        default_value_t = 30
    )]
    pub timeout: u64,
}

/// Available subcommands for the `deputy` CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Show the authenticated user
    Me,

    /// Staff members
    #[command(subcommand, alias = "employee")]
    Employees(EmployeeCommands),

    /// Departments (operational units)
    #[command(subcommand, alias = "department")]
    Departments(ListOnly),

    /// Worked time records
    #[command(subcommand, alias = "timesheet")]
    Timesheets(ListOnly),

    /// Scheduled shifts
    #[command(subcommand, alias = "roster")]
    Rosters(ListOnly),

    /// Leave requests
    #[command(subcommand)]
    Leave(ListOnly),
}

/// `deputy employees ...`
#[derive(Subcommand, Clone, Debug)]
pub enum EmployeeCommands {
    /// List employees
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one employee
    Get {
        /// Employee id
        id: u64,
    },
}

/// Resources that only support listing.
#[derive(Subcommand, Clone, Debug)]
pub enum ListOnly {
    /// List records
    #[command(alias = "ls")]
    List(ListArgs),
}

impl Commands {
    /// List arguments of the selected command, if it is a list.
    #[must_use]
    pub const fn list_args(&self) -> Option<&ListArgs> {
        match self {
            Self::Employees(EmployeeCommands::List(args))
            | Self::Departments(ListOnly::List(args))
            | Self::Timesheets(ListOnly::List(args))
            | Self::Rosters(ListOnly::List(args))
            | Self::Leave(ListOnly::List(args)) => Some(args),
            Self::Me | Self::Employees(EmployeeCommands::Get { .. }) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    mod parsing {
        use super::*;

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::try_parse_from([
                "deputy", "employees", "list", "--output", "json", "--raw", "-q", ".Id", "--limit",
                "5",
            ])
            .unwrap();
            assert_eq!(cli.output.as_deref(), Some("json"));
            assert!(cli.raw);
            assert_eq!(cli.query.as_deref(), Some(".Id"));
            assert_eq!(cli.command.list_args().map(|a| a.limit), Some(5));
        }

        #[test]
        fn test_output_is_unset_by_default() {
            let cli = Cli::try_parse_from(["deputy", "me"]).unwrap();
            assert!(cli.output.is_none());
            assert!(cli.command.list_args().is_none());
        }

        #[test]
        fn test_output_value_is_not_validated_by_clap() {
            let cli = Cli::try_parse_from(["deputy", "me", "-o", "yaml"]).unwrap();
            assert_eq!(cli.output.as_deref(), Some("yaml"));
        }

        #[test]
        fn test_get_takes_numeric_id() {
            let cli = Cli::try_parse_from(["deputy", "employees", "get", "42"]).unwrap();
            assert!(matches!(
                cli.command,
                Commands::Employees(EmployeeCommands::Get { id: 42 })
            ));
            assert!(Cli::try_parse_from(["deputy", "employees", "get", "abc"]).is_err());
        }

        #[test]
        fn test_aliases() {
            assert!(Cli::try_parse_from(["deputy", "employee", "ls"]).is_ok());
            assert!(Cli::try_parse_from(["deputy", "roster", "list"]).is_ok());
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_unknown_flag() {
            let err = Cli::try_parse_from(["deputy", "me", "--bogus"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        }

        #[test]
        fn test_missing_subcommand() {
            assert!(Cli::try_parse_from(["deputy"]).is_err());
        }

        #[test]
        fn test_help_and_version() {
            let help = Cli::try_parse_from(["deputy", "--help"]).unwrap_err();
            assert_eq!(help.kind(), ErrorKind::DisplayHelp);
            let version = Cli::try_parse_from(["deputy", "--version"]).unwrap_err();
            assert_eq!(version.kind(), ErrorKind::DisplayVersion);
        }
    }
}
