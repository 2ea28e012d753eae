//! Text output formatting
//!
//! Column widths are measured in terminal cells rather than bytes so names
//! with accents or CJK characters still line up.

use std::io::Write;

use anyhow::{Context, Result};
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

const COLUMN_GAP: &str = "  ";

/// Write an aligned table: a header row followed by one row per entry.
///
/// Rows shorter than the header are padded with empty cells. Trailing
/// whitespace is never written.
pub fn write_table(
    writer: &mut impl Write,
    headers: &[&str],
    rows: &[Vec<String>],
    color: bool,
) -> Result<()> {
    let widths = column_widths(headers, rows);

    let header_cells: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
    let header = format_row(&header_cells, &widths);
    if color {
        writeln!(writer, "{}", header.bold()).context("failed to write table header")?;
    } else {
        writeln!(writer, "{header}").context("failed to write table header")?;
    }

    for row in rows {
        writeln!(writer, "{}", format_row(row, &widths)).context("failed to write table row")?;
    }
    Ok(())
}

/// Write a `Key: Value` block with values aligned after the longest key.
pub fn write_fields(
    writer: &mut impl Write,
    fields: &[(&str, String)],
    color: bool,
) -> Result<()> {
    let key_width = fields
        .iter()
        .map(|(key, _)| key.width() + 1)
        .max()
        .unwrap_or(0);

    for (key, value) in fields {
        let label = format!("{key}:");
        let padding = " ".repeat(key_width.saturating_sub(label.width()));
        let line = if value.is_empty() {
            if color {
                label.bold().to_string()
            } else {
                label
            }
        } else if color {
            format!("{}{padding} {value}", label.bold())
        } else {
            format!("{label}{padding} {value}")
        };
        writeln!(writer, "{line}").context("failed to write field")?;
    }
    Ok(())
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let width = cell.width();
            match widths.get_mut(idx) {
                Some(current) => *current = (*current).max(width),
                None => widths.push(width),
            }
        }
    }
    widths
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    let last = widths.len().saturating_sub(1);
    for (idx, width) in widths.iter().enumerate() {
        let cell = cells.get(idx).map_or("", String::as_str);
        if idx > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(cell);
        if idx < last {
            line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
        }
    }
    line.truncate(line.trim_end().len());
    line
}
