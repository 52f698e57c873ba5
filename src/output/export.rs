//! CSV export of the gradebook with computed averages.

use anyhow::{Context, Result};
use chrono::Local;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use super::formatter::{format_decimal, format_plain};
use crate::config::ExportConfig;
use crate::gradebook::GradeBook;

const HEADER: [&str; 7] = ["Subject", "Coefficient", "CC", "TP", "Exam", "Average", "Status"];

/// Default export file name for today, e.g. `grades-2026-10-19.csv`
pub fn default_export_path() -> PathBuf {
    PathBuf::from(format!("grades-{}.csv", Local::now().format("%Y-%m-%d")))
}

fn optional_cell(mark: Option<f64>, separator: char) -> String {
    mark.map(|m| format_decimal(m, separator)).unwrap_or_default()
}

/// Writes every entry with its average and status as CSV.
///
/// Absent marks are empty cells. When `include_summary` is set, a final
/// "General average" row carries the total coefficient and general average.
pub fn write_csv<W: Write>(writer: W, book: &GradeBook, options: &ExportConfig) -> Result<()> {
    let separator = options.decimal_char();
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter_byte())
        .from_writer(writer);

    writer.write_record(HEADER)?;

    for (entry, average, status) in book.scored() {
        writer.write_record([
            entry.subject.clone(),
            format_plain(entry.coefficient, separator),
            optional_cell(entry.continuous_assessment, separator),
            optional_cell(entry.practical_work, separator),
            format_decimal(entry.exam, separator),
            format_decimal(average, separator),
            status.label().to_string(),
        ])?;
    }

    if options.include_summary {
        let summary = book.summary();
        writer.write_record([
            "General average".to_string(),
            format_plain(book.total_coefficient(), separator),
            String::new(),
            String::new(),
            String::new(),
            format_decimal(summary.general_average, separator),
            summary.status().label().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Export the gradebook to a CSV file, replacing any existing file.
pub fn export_to_path(path: &Path, book: &GradeBook, options: &ExportConfig) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file at {}", path.display()))?;

    write_csv(file, book, options)
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;

    info!(path = %path.display(), entries = book.len(), "Exported gradebook");
    Ok(())
}
