//! TTY detection and output mode resolution.
//!
//! Resolution follows a fixed priority order:
//!
//! 1. **Explicit flag** (`--output text|json`) - used verbatim, no guessing
//! 2. **Environment variable** (`DEPUTY_OUTPUT`) - session-wide default
//! 3. **TTY detection** - text for terminals, JSON for pipes and files
//!
//! and finally `--raw` upgrades a text result to JSON. This gives:
//!
//! - Interactive terminals get tables by default
//! - `deputy employees list > out.json` gets JSON without any flag
//! - An explicit flag always wins over guessing
//!
//! ```bash
//! export DEPUTY_OUTPUT=json
//! deputy departments list          # JSON, even in a terminal
//! deputy departments list -o text  # explicit flag wins
//! ```

use is_terminal::IsTerminal;

use super::OutputMode;
use crate::error::CliError;

/// Environment variable consulted when `--output` is not given.
pub const OUTPUT_ENV: &str = "DEPUTY_OUTPUT";

/// Process-level inputs to output resolution.
///
/// Captured once at startup so resolution itself stays a pure function and
/// tests can supply any combination.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    /// Value of `DEPUTY_OUTPUT`, if set.
    pub output: Option<String>,
    /// Whether `NO_COLOR` is set.
    pub no_color: bool,
    /// Whether stdout is attached to a terminal.
    pub stdout_is_terminal: bool,
}

impl Environment {
    /// Capture the current process environment.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            output: std::env::var(OUTPUT_ENV).ok(),
            no_color: std::env::var_os("NO_COLOR").is_some(),
            stdout_is_terminal: std::io::stdout().is_terminal(),
        }
    }

    /// An environment with stdout piped and nothing set.
    #[must_use]
    pub const fn piped() -> Self {
        Self {
            output: None,
            no_color: false,
            stdout_is_terminal: false,
        }
    }

    /// An environment with stdout on a terminal and nothing set.
    #[must_use]
    pub const fn terminal() -> Self {
        Self {
            output: None,
            no_color: false,
            stdout_is_terminal: true,
        }
    }

    /// Set `DEPUTY_OUTPUT`.
    #[must_use]
    pub fn with_output(mut self, value: impl Into<String>) -> Self {
        self.output = Some(value.into());
        self
    }

    /// Mode implied by the terminal alone.
    #[must_use]
    pub const fn detected_mode(&self) -> OutputMode {
        if self.stdout_is_terminal {
            OutputMode::Text
        } else {
            OutputMode::Json
        }
    }
}

/// Resolve the effective output mode and raw flag.
///
/// `flag` is `Some` only when the user passed `--output` explicitly.
pub fn resolve_output(
    flag: Option<&str>,
    env: &Environment,
    raw: bool,
) -> Result<(OutputMode, bool), CliError> {
    let mode = if let Some(value) = flag {
        match value {
            "text" => OutputMode::Text,
            "json" => OutputMode::Json,
            other => {
                return Err(CliError::InvalidInput(format!(
                    "invalid --output value \"{other}\": expected \"text\" or \"json\""
                )));
            },
        }
    } else if let Some(value) = env.output.as_deref().filter(|v| !v.trim().is_empty()) {
        OutputMode::parse(value).ok_or_else(|| {
            CliError::InvalidInput(format!(
                "invalid {OUTPUT_ENV} value \"{value}\": expected \"text\" or \"json\""
            ))
        })?
    } else {
        env.detected_mode()
    };

    if raw && mode == OutputMode::Text {
        return Ok((OutputMode::Json, true));
    }
    Ok((mode, raw))
}

/// Best-effort mode for reporting errors that happen before (or during)
/// resolution: an explicit `json` request or a pipe means JSON.
#[must_use]
pub fn fallback_mode(flag: Option<&str>, env: &Environment, raw: bool) -> OutputMode {
    resolve_output(flag, env, raw).map_or_else(
        |_| {
            if raw || flag == Some("json") {
                OutputMode::Json
            } else {
                env.detected_mode()
            }
        },
        |(mode, _)| mode,
    )
}
