//! Plain text report output for terminal reading.

use super::{Formatter, Table};
use anyhow::Result;
use std::io::Write;

pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn write_report(&mut self, output: &mut dyn Write, tables: &[Table]) -> Result<()> {
        for table in tables {
            writeln!(output, "=== {} ===", table.title)?;
            if table.is_empty() {
                writeln!(output, "(no rows)")?;
                writeln!(output)?;
                continue;
            }

            // Column widths in characters; CJK width quirks are acceptable here
            let mut widths: Vec<usize> =
                table.headers.iter().map(|h| h.chars().count()).collect();
            for row in &table.rows {
                for (i, cell) in row.iter().enumerate() {
                    if i < widths.len() {
                        widths[i] = widths[i].max(cell.chars().count());
                    }
                }
            }

            let line = |cells: &[String], widths: &[usize]| -> String {
                cells
                    .iter()
                    .zip(widths)
                    .map(|(c, w)| format!("{:<width$}", c, width = w))
                    .collect::<Vec<_>>()
                    .join("  ")
            };
            writeln!(output, "{}", line(&table.headers, &widths))?;
            for row in &table.rows {
                writeln!(output, "{}", line(row, &widths))?;
            }
            writeln!(output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_table;

    #[test]
    fn test_plain_layout() {
        let mut out = Vec::new();
        PlainFormatter
            .write_report(&mut out, &[sample_table()])
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("=== Degree Centrality ==="));
        assert!(text.contains("Character"));
        assert!(text.contains("门"));
    }
}
