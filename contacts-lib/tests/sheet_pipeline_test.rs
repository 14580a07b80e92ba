//! Intake-to-report tests: decoded sheet cells through header mapping, the required-columns
//! pre-check and the validation engine

use calamine::Data;
use contacts_lib::{
    ContactSheetValidator, IntakeError, export_report_csv, format_report, sheet_from_range,
    validate_sheet,
};

mod common;
use common::{range_from_rows, text};

fn template_header_row() -> Vec<Data> {
    [
        "TRATAMIENTO",
        "Nombres y Apellidos",
        "cargo",
        "Entidad",
        "DEPARTAMENTO",
        "Municipio",
        "Direccion",
        "Correo Electrónico",
        "Telefono",
        "Móvil",
    ]
    .iter()
    .map(|h| text(h))
    .collect()
}

#[test]
fn test_sheet_with_header_variants_validates() {
    let range = range_from_rows(vec![
        template_header_row(),
        vec![
            text("Sra."),
            text("Lucía Gómez"),
            text("Alcaldesa"),
            text("Alcaldía de Tunja"),
            text("Boyacá"),
            text("Tunja"),
            text("Calle 19 # 9-95"),
            text("despacho@tunja.gov.co"),
            Data::Float(6087405770.0),
            Data::Float(3101234567.0),
        ],
        vec![Data::Empty; 10],
        vec![
            text("Sr."),
            text("Pedro Ruiz"),
            Data::Empty,
            Data::Empty,
            text("Boyacá"),
            text("Duitama"),
            Data::Empty,
            text("pedro@correo.com"),
            Data::Int(123),
            Data::Empty,
        ],
    ]);

    let sheet = sheet_from_range(&range).unwrap();
    assert_eq!(sheet.rows.len(), 2);

    let validator = ContactSheetValidator::from_sheet("contactos.xlsx", "Hoja1", sheet);
    let report = validator.validate();

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 3, "Blank sheet lines are not counted");
    assert_eq!(report.errors[0].field, "Teléfono");
    assert!(!report.has_blocking_errors());
    assert_eq!(report.valid_rows, 1);
}

#[test]
fn test_missing_mandatory_columns_short_circuit() {
    let range = range_from_rows(vec![
        vec![text("Tratamiento"), text("Email")],
        vec![text("Sr."), text("no-es-correo")],
    ]);

    let sheet = sheet_from_range(&range).unwrap();
    let report = validate_sheet(&sheet);

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].field, "Columnas");
    assert!(report.errors[0].message.contains("Nombres y Apellidos"));
    assert!(report.errors[0].message.contains("Departamento"));
    assert!(report.errors[0].message.contains("Municipio"));
    assert_eq!(report.total_rows, 0);
}

#[test]
fn test_duplicate_canonical_headers_are_rejected() {
    let range = range_from_rows(vec![vec![
        text("Telefono"),
        text("Tratamiento"),
        text("TELÉFONO"),
    ]]);

    let result = sheet_from_range(&range);
    match result {
        Err(IntakeError::DuplicateHeaders { duplicates }) => {
            assert_eq!(duplicates, vec!["Header 'Teléfono' appears in: column 1, column 3"]);
        }
        other => panic!("Expected duplicate headers error, got {:?}", other),
    }
}

#[test]
fn test_report_outputs() {
    let range = range_from_rows(vec![
        template_header_row(),
        vec![
            text("Sr."),
            text("Juan Pérez"),
            Data::Empty,
            Data::Empty,
            text("Antioquia"),
            text("Bogotá"),
            Data::Empty,
            Data::Empty,
            Data::Empty,
            Data::Empty,
        ],
    ]);
    let report = validate_sheet(&sheet_from_range(&range).unwrap());
    assert_eq!(report.errors.len(), 2);

    let text_report = format_report(&report, "contactos.xlsx");
    assert!(text_report.contains("Row 2: 2 finding(s)"));
    assert!(text_report.contains("[error] Municipio"));
    assert!(text_report.contains("[error] Dirección"));

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("reporte.csv");
    export_report_csv(&report, &csv_path).unwrap();
    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(content.lines().count(), 3, "Header plus one line per finding");
    assert!(content.starts_with("row,field,severity,message\n"));
}
