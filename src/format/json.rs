//! JSON report output.

use super::{Formatter, Table};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct JsonTable<'a> {
    title: &'a str,
    headers: &'a [String],
    rows: &'a [Vec<String>],
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn write_report(&mut self, output: &mut dyn Write, tables: &[Table]) -> Result<()> {
        let body: Vec<JsonTable> = tables
            .iter()
            .map(|t| JsonTable {
                title: &t.title,
                headers: &t.headers,
                rows: &t.rows,
            })
            .collect();
        serde_json::to_writer_pretty(&mut *output, &body)?;
        writeln!(output)?;
        Ok(())
    }
}
