//! Markdown report output.

use super::{Formatter, Table};
use anyhow::Result;
use std::io::Write;

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn write_report(&mut self, output: &mut dyn Write, tables: &[Table]) -> Result<()> {
        for table in tables {
            writeln!(output, "## {}\n", table.title)?;
            if table.is_empty() {
                writeln!(output, "_no rows_\n")?;
                continue;
            }
            writeln!(output, "| {} |", table.headers.join(" | "))?;
            writeln!(
                output,
                "|{}|",
                table.headers.iter().map(|_| " --- ").collect::<Vec<_>>().join("|")
            )?;
            for row in &table.rows {
                let escaped: Vec<String> =
                    row.iter().map(|c| c.replace('|', "\\|")).collect();
                writeln!(output, "| {} |", escaped.join(" | "))?;
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
    fn test_markdown_table_shape() {
        let mut out = Vec::new();
        MarkdownFormatter
            .write_report(&mut out, &[sample_table()])
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("## Degree Centrality\n"));
        assert!(text.contains("| Character | Score | Ends | Starts |"));
        assert!(text.contains("| 门 | 1.000 | 2 | 0 |"));
    }

    #[test]
    fn test_empty_table_placeholder() {
        let table = Table::new("Empty", &["A"]);
        let mut out = Vec::new();
        MarkdownFormatter.write_report(&mut out, &[table]).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("_no rows_"));
    }
}
