//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use invoicer_domain::{DocumentFailure, ResultRow, ResultTable, COLUMNS};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

/// A row serialized as an object keyed by column name, in column order
struct JsonRow<'a>(&'a ResultRow);

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let cells = self.0.cells();
        let mut map = serializer.serialize_map(Some(cells.len()))?;
        for (column, cell) in COLUMNS.iter().zip(cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the extracted rows.
    pub fn format_table(&self, table: &ResultTable) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_rows_json(table),
            OutputFormat::Table => Ok(self.format_rows_table(table)),
        }
    }

    /// Format rows as a JSON array.
    fn format_rows_json(&self, table: &ResultTable) -> Result<String> {
        let rows: Vec<JsonRow<'_>> = table.rows().iter().map(JsonRow).collect();
        Ok(serde_json::to_string_pretty(&rows)?)
    }

    /// Format rows as a table. An empty batch still shows the header row.
    fn format_rows_table(&self, table: &ResultTable) -> String {
        let mut builder = Builder::default();
        builder.push_record(table.headers().iter().copied());

        for row in table.rows() {
            builder.push_record(row.cells());
        }

        let mut rendered = builder.build();
        rendered
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        rendered.to_string()
    }

    /// One line per skipped document.
    pub fn failures(&self, failures: &[DocumentFailure]) -> Vec<String> {
        failures
            .iter()
            .map(|f| self.error(&format!("{}: {} ({})", f.file, f.message, f.kind)))
            .collect()
    }

    /// Summary line for a finished batch.
    pub fn summary(&self, table: &ResultTable) -> String {
        let message = format!(
            "Extracted {} invoice(s), skipped {}",
            table.len(),
            table.failures().len()
        );
        if table.failures().is_empty() {
            self.success(&message)
        } else {
            self.warning(&message)
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
