// reset; cargo run -- --excel-file ./data/contactos.xlsx
// reset; cargo run -- --excel-file ./data/contactos.xlsx --sheet-name Hoja1 --csv-report reporte.csv

use clap::Parser;
use contacts_lib::{
    export_report_csv, export_report_json, format_report, unreadable_file_report,
    utils::write_error_to_log, ContactSheetValidatorBuilder, ValidationReport, ERRORS_LOG_FILE,
};

#[derive(Parser)]
#[command(name = "contacts-validator")]
#[command(
    about = "A tool to validate contact spreadsheets against the Colombian departments and municipalities catalog"
)]
#[command(version)]
struct Args {
    /// Path to the Excel file to validate (.xlsx, .xls, .ods). A .json file holding an array of row objects is also accepted
    #[arg(short, long)]
    excel_file: String,

    /// Optional sheet name to validate (if not specified, validates the first sheet)
    #[arg(long)]
    sheet_name: Option<String>,

    /// Write every finding to this CSV file
    #[arg(long)]
    csv_report: Option<String>,

    /// Write the full report to this JSON file
    #[arg(long)]
    json_report: Option<String>,

    /// File where failed validations are logged
    #[arg(long, default_value = ERRORS_LOG_FILE)]
    log_file: String,

    /// Only print the summary, not every finding
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let arguments = Args::parse();

    let report = match ContactSheetValidatorBuilder::new(&arguments.excel_file)
        .sheet_name(arguments.sheet_name.as_deref())
        .build()
    {
        Ok(validator) => validator.validate(),
        Err(e) => {
            eprintln!("❌ Could not read {}: {e}", arguments.excel_file);
            write_error_to_log(
                &arguments.log_file,
                "Contact Sheet Intake Error",
                &format!("{}: {}", arguments.excel_file, e),
            );
            unreadable_file_report()
        }
    };

    if !report.is_valid {
        write_error_to_log(
            &arguments.log_file,
            "Contact Sheet Validation Report",
            &format_report(&report, &arguments.excel_file),
        );
    }

    if let Some(csv_path) = &arguments.csv_report {
        export_report_csv(&report, csv_path)?;
        println!("✅ CSV report created: {csv_path}");
    }
    if let Some(json_path) = &arguments.json_report {
        export_report_json(&report, json_path)?;
        println!("✅ JSON report created: {json_path}");
    }

    if !arguments.quiet {
        print_findings(&report);
    }

    println!(
        "Rows: {} total, {} valid. Findings: {} error(s), {} warning(s)",
        report.total_rows,
        report.valid_rows,
        report.error_count(),
        report.warning_count()
    );

    if report.has_blocking_errors() {
        eprintln!("❌ Validation failed with {} errors", report.error_count());
        eprintln!("❌ Check {} for details.", arguments.log_file);
        std::process::exit(1);
    } else if report.warning_count() > 0 {
        println!("⚠️ Validation completed with {} warnings", report.warning_count());
    } else {
        println!("✅ Validation completed!");
    }

    Ok(())
}

fn print_findings(report: &ValidationReport) {
    for finding in &report.errors {
        let marker = if finding.is_error() { "❌" } else { "⚠️" };
        println!(
            "{marker} Fila {} [{}]: {}",
            finding.row, finding.field, finding.message
        );
    }
}
