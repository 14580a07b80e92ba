//! Turns decoded sheet cells (or loosely typed JSON records) into canonical rows, and runs the
//! required-columns pre-check in front of the validation engine.

use calamine::{Data, Range};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

use crate::column_mapper::{normalize_column_name, normalize_row, validate_columns};
use crate::dataset_validator::validate_dataset;
use crate::model::{Row, ValidationReport, fields};

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Cannot open workbook '{path}': {source}")]
    Workbook {
        path: String,
        #[source]
        source: calamine::Error,
    },

    #[error("Error reading sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("The workbook '{path}' has no sheets")]
    NoSheets { path: String },

    #[error("The sheet is empty: no header row found")]
    EmptySheet,

    #[error(
        "Sheet contains duplicate column headers:\n{}\nPlease ensure all column headers are unique.",
        bullet_list(.duplicates)
    )]
    DuplicateHeaders { duplicates: Vec<String> },

    #[error("Cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON array of row objects, found {found}")]
    NotRowArray { found: &'static str },

    #[error("Row {index} is not a JSON object")]
    RowNotObject { index: usize },
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|msg| format!("  • {}", msg))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Headers and data rows of one sheet, keyed by canonical field names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Convert a decoded worksheet into canonical rows.
///
/// The first row holds the headers, which are mapped onto canonical field names. Columns with
/// a blank header are dropped, empty cells are left out of the row and rows without any value
/// are skipped.
pub fn sheet_from_range(range: &Range<Data>) -> Result<SheetData, IntakeError> {
    let mut sheet_rows = range.rows();

    let header_cells = sheet_rows.next().ok_or(IntakeError::EmptySheet)?;
    let headers: Vec<String> = header_cells
        .iter()
        .map(|cell| cell_to_string(cell).map(|h| normalize_column_name(&h)).unwrap_or_default())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(IntakeError::EmptySheet);
    }
    check_header_duplicates(&headers)?;

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let row: Row = headers
            .iter()
            .zip(cells)
            .filter(|(header, _)| !header.is_empty())
            .filter_map(|(header, cell)| cell_to_string(cell).map(|value| (header.clone(), value)))
            .collect();

        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok(SheetData {
        headers: headers.into_iter().filter(|h| !h.is_empty()).collect(),
        rows,
    })
}

/// Stringify one cell the way it reads in the sheet; `None` for empty and error cells
pub fn cell_to_string(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_to_string(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match excel_serial_to_chrono(dt.as_f64()) {
            Some(datetime) => format_datetime(datetime),
            None => float_to_string(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
    };

    if text.is_empty() { None } else { Some(text) }
}

/// Phone numbers are usually typed as numbers: 3001234567.0 must read "3001234567"
fn float_to_string(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

fn format_datetime(datetime: NaiveDateTime) -> String {
    if datetime.num_seconds_from_midnight() == 0 {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Excel serial date (days since 1899-12-30, fractional part is the time of day)
fn excel_serial_to_chrono(value: f64) -> Option<NaiveDateTime> {
    let excel_base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = value.trunc() as i64;
    let seconds = ((value - days as f64) * 86400.0).round() as i64;
    excel_base
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}

/// Check for duplicate column headers
///
/// # Arguments
/// * `headers` - Header names, already mapped onto canonical field names
///
/// # Returns
/// * `Ok(())` if no duplicates are found
/// * `Err(IntakeError::DuplicateHeaders)` listing each duplicate and its 1-based columns
pub fn check_header_duplicates(headers: &[String]) -> Result<(), IntakeError> {
    let mut header_positions: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for (index, header) in headers.iter().enumerate() {
        if header.is_empty() {
            continue;
        }
        let positions = header_positions.entry(header.as_str()).or_default();
        if positions.is_empty() {
            first_seen.push(header.as_str());
        }
        positions.push(index);
    }

    let duplicates: Vec<String> = first_seen
        .into_iter()
        .filter_map(|header| {
            let positions = &header_positions[header];
            (positions.len() > 1).then(|| {
                let columns_str = positions
                    .iter()
                    .map(|p| format!("column {}", p + 1)) // Convert to 1-based column indexing
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Header '{}' appears in: {}", header, columns_str)
            })
        })
        .collect();

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(IntakeError::DuplicateHeaders { duplicates })
    }
}

/// Convert a JSON array of loosely typed records into canonical rows.
///
/// Strings are trimmed, numbers and booleans stringified, nulls and empty strings dropped.
/// Keys are mapped onto canonical field names. Headers are the union of all keys, in order of
/// first appearance.
pub fn sheet_from_json(value: &Value) -> Result<SheetData, IntakeError> {
    let records = value.as_array().ok_or(IntakeError::NotRowArray {
        found: json_type_name(value),
    })?;

    let mut headers: Vec<String> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut rows = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let object = record
            .as_object()
            .ok_or(IntakeError::RowNotObject { index })?;

        let raw: Row = object
            .iter()
            .filter_map(|(key, cell)| json_cell_to_string(cell).map(|v| (key.clone(), v)))
            .collect();

        for key in object.keys() {
            let canonical = normalize_column_name(key);
            if seen.insert(canonical.clone()) {
                headers.push(canonical);
            }
        }

        let row = normalize_row(&raw);
        if !row.is_empty() {
            rows.push(row);
        }
    }

    Ok(SheetData { headers, rows })
}

fn json_cell_to_string(cell: &Value) -> Option<String> {
    let text = match cell {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() => float_to_string(f),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => cell.to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Required-columns pre-check followed by the validation engine.
///
/// With no data rows the engine reports "no data" on its own; otherwise, missing mandatory
/// columns short-circuit into a single row-0 finding on "Columnas".
pub fn validate_sheet(sheet: &SheetData) -> ValidationReport {
    if !sheet.rows.is_empty() {
        let check = validate_columns(&sheet.headers);
        if !check.is_valid {
            return ValidationReport::file_level_error(
                fields::COLUMNAS,
                format!(
                    "Faltan las siguientes columnas obligatorias: {}",
                    check.missing_columns.join(", ")
                ),
            );
        }
    }

    validate_dataset(&sheet.rows)
}

/// Report shown when the file itself could not be read
pub fn unreadable_file_report() -> ValidationReport {
    ValidationReport::file_level_error(
        fields::ARCHIVO,
        "Error al procesar el archivo Excel. Verifique que el formato sea correcto.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TEMPLATE_HEADERS, range_from_rows};
    use serde_json::json;

    #[test]
    fn test_sheet_from_range_maps_headers_and_skips_blank_rows() {
        let range = range_from_rows(vec![
            vec![
                Data::String("TRATAMIENTO".to_string()),
                Data::String("Nombres_y_Apellidos".to_string()),
                Data::String("Celular".to_string()),
                Data::String("".to_string()),
            ],
            vec![
                Data::String(" Sra. ".to_string()),
                Data::String("Ana Gómez".to_string()),
                Data::Float(3001234567.0),
                Data::String("ignored".to_string()),
            ],
            vec![Data::Empty, Data::String("   ".to_string()), Data::Empty, Data::Empty],
            vec![
                Data::String("Sr.".to_string()),
                Data::Empty,
                Data::Int(3109876543),
                Data::Empty,
            ],
        ]);

        let sheet = sheet_from_range(&range).unwrap();
        assert_eq!(
            sheet.headers,
            vec!["Tratamiento", "Nombres y Apellidos", "Celular"]
        );
        assert_eq!(sheet.rows.len(), 2, "Blank row should be skipped");
        assert_eq!(sheet.rows[0].value("Tratamiento"), "Sra.");
        assert_eq!(sheet.rows[0].value("Celular"), "3001234567");
        assert_eq!(sheet.rows[0].len(), 3, "Column without header is dropped");
        assert!(!sheet.rows[1].contains_field("Nombres y Apellidos"));
        assert_eq!(sheet.rows[1].value("Celular"), "3109876543");
    }

    #[test]
    fn test_sheet_from_range_rejects_empty_sheet() {
        let range: Range<Data> = Range::empty();
        assert!(matches!(
            sheet_from_range(&range),
            Err(IntakeError::EmptySheet)
        ));
    }

    #[test]
    fn test_duplicate_headers_after_normalization() {
        let range = range_from_rows(vec![vec![
            Data::String("Email".to_string()),
            Data::String("Tratamiento".to_string()),
            Data::String("CORREO".to_string()),
        ]]);
        let err = sheet_from_range(&range).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("duplicate column headers"));
        assert!(message.contains("Header 'Email' appears in: column 1, column 3"));
    }

    #[test]
    fn test_check_header_duplicates_ignores_blank_headers() {
        let headers = vec!["A".to_string(), String::new(), String::new()];
        assert!(check_header_duplicates(&headers).is_ok());
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), None);
        assert_eq!(cell_to_string(&Data::String("  ".to_string())), None);
        assert_eq!(cell_to_string(&Data::Float(6041234.0)).as_deref(), Some("6041234"));
        assert_eq!(cell_to_string(&Data::Float(1.5)).as_deref(), Some("1.5"));
        assert_eq!(cell_to_string(&Data::Bool(true)).as_deref(), Some("true"));
        assert_eq!(
            cell_to_string(&Data::DateTimeIso("2024-03-01".to_string())).as_deref(),
            Some("2024-03-01")
        );
    }

    #[test]
    fn test_excel_serial_dates() {
        let date = excel_serial_to_chrono(45352.0).unwrap();
        assert_eq!(format_datetime(date), "2024-03-01");
        let datetime = excel_serial_to_chrono(45352.5).unwrap();
        assert_eq!(format_datetime(datetime), "2024-03-01T12:00:00");
    }

    #[test]
    fn test_sheet_from_json() {
        let value = json!([
            {"TRATAMIENTO": "Sr.", "Teléfono": 6041234, "Email": null},
            {"tratamiento": "  ", "correo": "a@b.com", "Activo": true},
            {}
        ]);
        let sheet = sheet_from_json(&value).unwrap();
        assert_eq!(sheet.headers, vec!["Email", "Tratamiento", "Teléfono", "Activo"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].value("Teléfono"), "6041234");
        assert!(!sheet.rows[0].contains_field("Email"));
        assert_eq!(sheet.rows[1].value("Email"), "a@b.com");
        assert_eq!(sheet.rows[1].value("Activo"), "true");
        assert!(!sheet.rows[1].contains_field("Tratamiento"));
    }

    #[test]
    fn test_sheet_from_json_rejects_non_arrays() {
        let err = sheet_from_json(&json!({"Tratamiento": "Sr."})).unwrap_err();
        assert!(matches!(err, IntakeError::NotRowArray { found: "an object" }));

        let err = sheet_from_json(&json!([{"Tratamiento": "Sr."}, 3])).unwrap_err();
        assert!(matches!(err, IntakeError::RowNotObject { index: 1 }));
    }

    #[test]
    fn test_validate_sheet_reports_missing_columns() {
        let sheet = SheetData {
            headers: vec!["Tratamiento".to_string(), "Email".to_string()],
            rows: vec![Row::new().with("Tratamiento", "Sr.")],
        };
        let report = validate_sheet(&sheet);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row, 0);
        assert_eq!(report.errors[0].field, "Columnas");
        assert_eq!(
            report.errors[0].message,
            "Faltan las siguientes columnas obligatorias: Nombres y Apellidos, Departamento, Municipio"
        );
        assert_eq!(report.total_rows, 0);
        assert_eq!(report.valid_rows, 0);
    }

    #[test]
    fn test_validate_sheet_without_rows_reports_no_data() {
        let sheet = SheetData {
            headers: TEMPLATE_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        };
        let report = validate_sheet(&sheet);
        assert_eq!(report.errors[0].field, "Datos");
        assert_eq!(report.errors[0].message, "No hay datos para validar");
    }

    #[test]
    fn test_unreadable_file_report() {
        let report = unreadable_file_report();
        assert!(!report.is_valid);
        assert_eq!(report.errors[0].field, "Archivo");
        assert_eq!(report.total_rows, 0);
    }
}
