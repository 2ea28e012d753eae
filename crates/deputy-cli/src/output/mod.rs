//! # Output Formatting
//!
//! Every command prints through this module so humans and automation see one
//! consistent contract.
//!
//! ## Modes
//!
//! - **Text**: aligned tables for lists, `Key: Value` blocks for single objects
//! - **JSON**: pretty objects, and an `{"items": [...]}` envelope for lists
//! - **JSON Lines** (`--raw`): one compact object per line, flushed as written
//!
//! The mode is resolved once per invocation by [`detect::resolve_output`]:
//! an explicit `--output` wins, then `DEPUTY_OUTPUT`, then TTY detection, and
//! `--raw` always forces JSON.
//!
//! ```bash
//! # Interactive terminal: table
//! deputy employees list
//!
//! # Redirected: JSON without asking
//! deputy employees list > employees.json
//!
//! # Streaming into jq line by line
//! deputy employees list --raw | jq -c 'select(.Active)'
//! ```
//!
//! ## Empty results
//!
//! With `--fail-empty`, an empty result in JSON mode is an error (exit 4)
//! instead of `{"items": []}`. Text mode ignores the flag and prints the
//! header-only table.

pub mod detect;
mod render;
mod stream;
pub mod text;

use std::fmt;

pub use detect::{Environment, OUTPUT_ENV, resolve_output};
pub use render::{Describe, ListEnvelope, Renderer, TableRow};
pub use stream::write_jsonl;

/// Output mode resolved for one invocation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputMode {
    /// Human-readable tables and key-value blocks.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Parse `text` or `json`, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Check if this mode is machine-readable.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Everything the renderer needs to know about one command's output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Resolved output mode.
    pub mode: OutputMode,
    /// Emit JSON Lines instead of a pretty document.
    pub raw: bool,
    /// jq-style filter applied to JSON output.
    pub query: Option<String>,
    /// Explicitly requested page size.
    pub limit: Option<usize>,
    /// Explicitly requested page offset.
    pub offset: Option<usize>,
    /// Treat an empty result as an error in JSON mode.
    pub fail_on_empty: bool,
    /// Style text output with ANSI colors.
    pub color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_text() {
        assert_eq!(OutputMode::default(), OutputMode::Text);
    }

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!(OutputMode::parse("JSON"), Some(OutputMode::Json));
        assert_eq!(OutputMode::parse(" text "), Some(OutputMode::Text));
        assert_eq!(OutputMode::parse("yaml"), None);
        assert_eq!(OutputMode::parse(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(OutputMode::Text.to_string(), "text");
        assert_eq!(OutputMode::Json.to_string(), "json");
    }
}
