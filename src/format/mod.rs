//! Output format modules for verblens report tables.

pub mod csv_out;
pub mod json;
pub mod markdown;
pub mod plain;

use crate::config::OutputFormat;
use anyhow::Result;
use std::io::Write;

/// One report table ready for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub trait Formatter {
    fn write_report(&mut self, output: &mut dyn Write, tables: &[Table]) -> Result<()>;
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Csv => Box::new(csv_out::CsvFormatter),
        OutputFormat::Json => Box::new(json::JsonFormatter),
        OutputFormat::Markdown => Box::new(markdown::MarkdownFormatter),
        OutputFormat::Plain => Box::new(plain::PlainFormatter),
    }
}

#[cfg(test)]
pub(crate) fn sample_table() -> Table {
    let mut table = Table::new("Degree Centrality", &["Character", "Score", "Ends", "Starts"]);
    table.push_row(vec!["门".into(), "1.000".into(), "2".into(), "0".into()]);
    table.push_row(vec!["打, 开".into(), "0.500".into(), "0".into(), "2".into()]);
    table
}
