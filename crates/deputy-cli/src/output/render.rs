//! Unified output rendering for command results.
//!
//! Commands hand over typed values; this module decides how they look.
//!
//! | Result | Text | JSON | JSON + `--raw` |
//! |--------|------|------|----------------|
//! | single | `Key: Value` block | pretty object | one compact line |
//! | list   | aligned table | `{"items": [...]}` envelope | one compact line per item |
//!
//! `--query` filters JSON output; each filter result is written on its own
//! line. `--fail-empty` turns an empty JSON result into
//! [`CliError::EmptyResult`].

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use super::stream::write_jsonl;
use super::text::{write_fields, write_table};
use super::{OutputMode, RenderOptions};
use crate::error::CliError;
use crate::query::Query;

/// A value that can be shown as one row of a text table.
pub trait TableRow {
    /// Column headers, in display order.
    const HEADERS: &'static [&'static str];

    /// Cell text for each header, in the same order.
    fn cells(&self) -> Vec<String>;
}

/// A value that can be shown as a `Key: Value` block.
pub trait Describe {
    /// Labelled fields in display order.
    fn describe(&self) -> Vec<(&'static str, String)>;
}

/// JSON wrapper for list output.
///
/// `limit` and `offset` are present only when the user asked for them.
#[derive(Debug, Serialize)]
pub struct ListEnvelope<'a, T> {
    /// The page of results.
    pub items: &'a [T],
    /// `--limit`, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// `--offset`, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

/// Writes command results according to resolved [`RenderOptions`].
pub struct Renderer<'w> {
    options: RenderOptions,
    query: Option<Query>,
    writer: &'w mut dyn Write,
}

impl<'w> Renderer<'w> {
    /// Create a renderer, compiling `--query` up front when output is JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidQuery`] if the query does not parse.
    pub fn new(options: RenderOptions, writer: &'w mut dyn Write) -> Result<Self> {
        let query = match options.query.as_deref().map(str::trim) {
            Some(source) if !source.is_empty() && options.mode.is_json() => {
                Some(Query::parse(source)?)
            },
            _ => None,
        };
        Ok(Self {
            options,
            query,
            writer,
        })
    }

    /// Render a single object, or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::EmptyResult`] for an empty result under
    /// `--fail-empty` in JSON mode, a query error, or a write error.
    pub fn single<T>(&mut self, item: Option<&T>) -> Result<()>
    where
        T: Serialize + Describe,
    {
        match self.options.mode {
            OutputMode::Text => match item {
                Some(item) => write_fields(&mut self.writer, &item.describe(), self.options.color),
                None => Ok(()),
            },
            OutputMode::Json => {
                let value = serde_json::to_value(item).context("failed to serialize result")?;
                if self.options.fail_on_empty && is_empty_single(&value) {
                    return Err(CliError::EmptyResult.into());
                }
                self.emit(&value)
            },
        }
    }

    /// Render a list of items.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::EmptyResult`] for an empty list under
    /// `--fail-empty` in JSON mode, a query error, or a write error.
    pub fn list<T>(&mut self, items: &[T]) -> Result<()>
    where
        T: Serialize + TableRow,
    {
        match self.options.mode {
            OutputMode::Text => {
                let rows: Vec<Vec<String>> = items.iter().map(TableRow::cells).collect();
                write_table(&mut self.writer, T::HEADERS, &rows, self.options.color)
            },
            OutputMode::Json => {
                if self.options.fail_on_empty && items.is_empty() {
                    return Err(CliError::EmptyResult.into());
                }
                if self.options.raw {
                    return self.stream(items);
                }
                let envelope = ListEnvelope {
                    items,
                    limit: self.options.limit,
                    offset: self.options.offset,
                };
                let value = serde_json::to_value(&envelope).context("failed to serialize list")?;
                self.emit(&value)
            },
        }
    }

    /// JSON Lines: each item is filtered independently.
    fn stream<T: Serialize>(&mut self, items: &[T]) -> Result<()> {
        let Some(query) = &self.query else {
            return write_jsonl(items, &mut *self.writer);
        };
        for item in items {
            let value = serde_json::to_value(item).context("failed to serialize item")?;
            let results = query.run(&value)?;
            write_jsonl(results, &mut *self.writer)?;
        }
        Ok(())
    }

    fn emit(&mut self, value: &Value) -> Result<()> {
        let raw = self.options.raw;
        match &self.query {
            Some(query) => {
                for result in query.run(value)? {
                    write_value(&mut *self.writer, &result, raw)?;
                }
                Ok(())
            },
            None => write_value(&mut *self.writer, value, raw),
        }
    }
}

fn write_value(writer: &mut dyn Write, value: &Value, raw: bool) -> Result<()> {
    if raw {
        serde_json::to_writer(&mut *writer, value)
    } else {
        serde_json::to_writer_pretty(&mut *writer, value)
    }
    .context("failed to write JSON")?;
    writeln!(writer).context("failed to write JSON")?;
    writer.flush().context("failed to flush output")
}

/// `null`, a missing value, or `{}`.
fn is_empty_single(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
