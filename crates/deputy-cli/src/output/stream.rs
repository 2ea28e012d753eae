//! # Streaming Output
//!
//! JSON Lines output for `--raw`: one compact document per line, flushed as
//! soon as it is written so a downstream `jq` or `grep` sees each record
//! immediately and nothing accumulates in memory.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write items as newline-delimited JSON, flushing after every line.
///
/// # Errors
///
/// Returns an error if serialization fails or if writing fails.
pub fn write_jsonl<T, W, I>(items: I, writer: &mut W) -> Result<()>
where
    T: Serialize,
    W: Write + ?Sized,
    I: IntoIterator<Item = T>,
{
    for item in items {
        let json = serde_json::to_string(&item).context("failed to serialize item to JSON")?;
        writeln!(writer, "{json}").context("failed to write JSON line")?;
        writer.flush().context("failed to flush writer")?;
    }
    Ok(())
}
