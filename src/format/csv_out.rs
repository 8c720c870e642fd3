//! CSV report output, import-friendly for spreadsheet and Anki workflows.

use super::{Formatter, Table};
use anyhow::Result;
use std::io::Write;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn write_report(&mut self, output: &mut dyn Write, tables: &[Table]) -> Result<()> {
        for (i, table) in tables.iter().enumerate() {
            // Multi-table reports separate sections with a comment line
            if tables.len() > 1 {
                if i > 0 {
                    writeln!(output)?;
                }
                writeln!(output, "# {}", table.title)?;
            }
            let mut writer = csv::WriterBuilder::new().from_writer(vec![]);
            writer.write_record(&table.headers)?;
            for row in &table.rows {
                writer.write_record(row)?;
            }
            let body = writer
                .into_inner()
                .map_err(|e| anyhow::anyhow!("csv flush failed: {}", e))?;
            output.write_all(&body)?;
        }
        Ok(())
    }
}
