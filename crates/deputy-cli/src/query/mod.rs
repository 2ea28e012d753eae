//! jq-style filters for `--query`.
//!
//! Supports the subset people reach for when trimming API output:
//!
//! - paths: `.`, `.Field`, `."Field"`, `.["Field"]`, `.[0]`, `.[-1]`, `.[1:3]`, `.[]`
//! - `?` to suppress errors, `|` to pipe, `,` to emit several values
//! - literals, `== != < <= > >=`, `and`, `or`
//! - `length`, `keys`, `first`, `last`, `not`, `empty`, `select(f)`, `map(f)`
//! - array construction `[f]`
//!
//! ```bash
//! deputy employees list -q '.items[] | select(.Active) | .DisplayName'
//! deputy me -q '.PrimaryEmail'
//! ```

mod eval;
mod parser;

use serde_json::Value;

use crate::error::CliError;

/// A parsed, reusable filter.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    source: String,
    filter: parser::Filter,
}

impl Query {
    /// Parse a filter expression.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidQuery`] when the expression is malformed.
    pub fn parse(source: &str) -> Result<Self, CliError> {
        let filter = parser::parse(source).map_err(CliError::InvalidQuery)?;
        Ok(Self {
            source: source.to_string(),
            filter,
        })
    }

    /// The expression as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Apply the filter, returning every output value in order.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidInput`] when the filter hits a type error,
    /// such as iterating over a number.
    pub fn run(&self, input: &Value) -> Result<Vec<Value>, CliError> {
        eval::eval(&self.filter, input).map_err(|reason| {
            CliError::InvalidInput(format!("query '{}' failed: {reason}", self.source))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_error_is_invalid_query() {
        let err = Query::parse(".items[").unwrap_err();
        assert!(matches!(err, CliError::InvalidQuery(_)));
        assert!(err.to_string().starts_with("invalid jq query: "));
    }

    #[test]
    fn test_deeply_nested_query_is_invalid_query() {
        let source = format!("{}{}", "[".repeat(200_000), "]".repeat(200_000));
        let err = Query::parse(&source).unwrap_err();
        assert!(matches!(err, CliError::InvalidQuery(_)));
        assert!(err.to_string().contains("nested too deeply"));
    }

    #[test]
    fn test_runtime_error_is_invalid_input() {
        let query = Query::parse(".[]").unwrap();
        let err = query.run(&json!(42)).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
        assert!(err.to_string().contains("cannot iterate over number"));
    }

    #[test]
    fn test_reusable_across_inputs() {
        let query = Query::parse(".Id").unwrap();
        assert_eq!(query.source(), ".Id");
        assert_eq!(query.run(&json!({"Id": 1})).unwrap(), vec![json!(1)]);
        assert_eq!(query.run(&json!({"Id": 2})).unwrap(), vec![json!(2)]);
    }
}
