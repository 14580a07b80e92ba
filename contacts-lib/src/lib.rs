#![allow(clippy::needless_return)]

pub mod catalog;
mod column_mapper;
mod dataset_validator;
mod intake;
mod model;
mod report;
mod row_validator;
pub mod rules;
mod sheet_validator;
pub mod utils;

// Test utilities - only compiled when testing or with test feature
// #[cfg(test)] alone doesn't work for integration tests (they're external crates)
// The feature flag makes it available to integration tests via dev-dependencies
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use column_mapper::{ColumnCheck, normalize_column_name, normalize_row, validate_columns};
pub use dataset_validator::{duplicate_email_findings, validate_dataset};
pub use intake::{
    IntakeError, SheetData, cell_to_string, check_header_duplicates, sheet_from_json,
    sheet_from_range, unreadable_file_report, validate_sheet,
};
pub use model::{FIRST_DATA_ROW, Finding, Row, Severity, ValidationReport, fields};
pub use report::{export_report_csv, export_report_json, format_report};
pub use row_validator::validate_row;
pub use sheet_validator::{ContactSheetValidator, ContactSheetValidatorBuilder};

pub const ERRORS_LOG_FILE: &str = "errors.log";
