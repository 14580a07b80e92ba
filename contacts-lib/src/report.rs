use anyhow::Result;
use std::path::Path;

use crate::model::ValidationReport;
use crate::utils::get_utc_iso_datetime;

/// Format a validation report into a structured string for logging
pub fn format_report(report: &ValidationReport, source: &str) -> String {
    let mut text = String::new();

    // Add title and separator
    text.push_str("=============================\n");
    text.push_str(&format!("Source: {}\n", source));
    text.push_str(&format!("Generated at: {}\n\n", get_utc_iso_datetime()));

    text.push_str(&format!(
        "Total rows: {}\nValid rows: {}\nErrors: {}\nWarnings: {}\n\n",
        report.total_rows,
        report.valid_rows,
        report.error_count(),
        report.warning_count()
    ));

    text.push_str("Findings by field:\n");
    for (field, count) in report.errors_by_field() {
        text.push_str(&format!("  {}: {}\n", field, count));
    }
    text.push('\n');

    for (row, findings) in report.errors_by_row() {
        text.push_str(&format!("Row {}: {} finding(s)\n", row, findings.len()));
        for finding in findings {
            text.push_str(&format!(
                "  - [{}] {}: {}\n",
                finding.severity, finding.field, finding.message
            ));
        }
        text.push('\n');
    }

    text
}

/// Export the findings as CSV, one line per finding in report order
pub fn export_report_csv(report: &ValidationReport, csv_path: impl AsRef<Path>) -> Result<()> {
    // Quote fields only when necessary (messages often contain commas)
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(csv_path)?;

    wtr.write_record(["row", "field", "severity", "message"])?;
    for finding in &report.errors {
        wtr.write_record([
            finding.row.to_string().as_str(),
            finding.field.as_str(),
            finding.severity.as_str(),
            finding.message.as_str(),
        ])?;
    }
    wtr.flush()?;

    Ok(())
}

/// Export the whole report as pretty-printed JSON
pub fn export_report_json(report: &ValidationReport, json_path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(json_path, json)?;
    Ok(())
}
