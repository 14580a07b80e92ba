//! End-to-end scenarios for validate_dataset, from empty input to mixed warnings and errors

use contacts_lib::{Row, Severity, validate_dataset};

mod common;
use common::{complete_row, locations, row, valid_row, warnings};

#[test]
fn test_empty_input_reports_no_data() {
    let report = validate_dataset(&[]);

    assert!(!report.is_valid);
    assert_eq!(report.total_rows, 0);
    assert_eq!(report.valid_rows, 0);
    assert_eq!(report.errors.len(), 1);

    let finding = &report.errors[0];
    assert_eq!(finding.row, 0);
    assert_eq!(finding.field, "Datos");
    assert_eq!(finding.severity, Severity::Error);
}

#[test]
fn test_minimal_valid_row() {
    let rows = vec![row(&[
        ("Tratamiento", "Sr."),
        ("Nombres y Apellidos", "Juan Pérez"),
        ("Departamento", "Antioquia"),
        ("Municipio", "Medellín"),
        ("Email", "juan@x.com"),
    ])];

    let report = validate_dataset(&rows);
    assert!(report.is_valid, "Unexpected findings: {:?}", report.errors);
    assert!(report.errors.is_empty());
    assert_eq!(report.total_rows, 1);
    assert_eq!(report.valid_rows, 1);
}

#[test]
fn test_municipality_from_another_department() {
    let rows = vec![valid_row().with("Municipio", "Bogotá")];

    let report = validate_dataset(&rows);
    assert_eq!(report.errors.len(), 1);

    let finding = &report.errors[0];
    assert_eq!(finding.field, "Municipio");
    assert_eq!(finding.severity, Severity::Error);
    assert!(finding.message.contains("Bogotá"));
    assert!(finding.message.contains("Antioquia"));
}

#[test]
fn test_same_email_on_two_rows_any_case() {
    let rows = vec![
        valid_row().with("Email", "a@b.com"),
        valid_row().with("Email", "A@B.COM"),
    ];

    let report = validate_dataset(&rows);
    assert_eq!(report.errors.len(), 2);
    assert!(!report.is_valid, "Warnings still make the report non-empty");

    let duplicates = warnings(&report.errors);
    assert_eq!(duplicates.len(), 2);
    assert_eq!(duplicates[0].row, 2);
    assert!(duplicates[0].message.ends_with("filas: 3"));
    assert_eq!(duplicates[1].row, 3);
    assert!(duplicates[1].message.ends_with("filas: 2"));
    assert_eq!(report.valid_rows, 0);
}

#[test]
fn test_email_with_space_and_no_address() {
    let rows = vec![valid_row().with("Email", "a b@x.com").with("Dirección", "")];

    let report = validate_dataset(&rows);
    let email_findings: Vec<_> = report
        .errors
        .iter()
        .filter(|f| f.field == "Email")
        .collect();

    assert_eq!(email_findings.len(), 1, "Email sub-checks are combined");
    assert_eq!(email_findings[0].severity, Severity::Error);
    assert!(email_findings[0].message.contains("espacios"));
    assert!(email_findings[0].message.contains("formato incorrecto"));
}

#[test]
fn test_each_out_of_range_phone_is_a_warning() {
    let rows = vec![valid_row().with("Teléfono", "123,4567890123")];

    let report = validate_dataset(&rows);
    assert_eq!(locations(&report.errors), vec![(2, "Teléfono"), (2, "Teléfono")]);
    assert!(report.errors[0].message.contains("123"));
    assert!(report.errors[1].message.contains("4567890123"));
    assert!(report.errors.iter().all(|f| f.severity == Severity::Warning));
    assert!(!report.is_valid);
    assert!(!report.has_blocking_errors());
    assert_eq!(report.valid_rows, 0);
}

#[test]
fn test_mixed_sheet_keeps_row_then_rule_order() {
    let rows = vec![
        complete_row(1),
        Row::new().with("Email", "contacto1@valle.gov.co"),
        complete_row(3).with("Cargo", "Jefe 1").with("Celular", "300"),
        complete_row(4),
    ];

    let report = validate_dataset(&rows);
    assert_eq!(
        locations(&report.errors),
        vec![
            (3, "Tratamiento"),
            (3, "Nombres y Apellidos"),
            (3, "Departamento"),
            (3, "Municipio"),
            (4, "Cargo"),
            (4, "Celular"),
            (2, "Email"),
            (3, "Email"),
        ]
    );
    assert_eq!(report.total_rows, 4);
    assert_eq!(report.valid_rows, 1, "Only row 5 is clean");
}

#[test]
fn test_validation_is_repeatable() {
    let rows = vec![
        complete_row(1).with("Email", "dup@x.com"),
        Row::new(),
        complete_row(2).with("Email", "dup@x.com,otro@x.com"),
        complete_row(3).with("Email", "OTRO@x.com"),
    ];

    let first = validate_dataset(&rows);
    let second = validate_dataset(&rows);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_large_sheet_row_numbers() {
    let rows: Vec<Row> = (0..500).map(complete_row).collect();
    let mut rows = rows;
    rows[499] = rows[499].clone().with("Tratamiento", "");

    let report = validate_dataset(&rows);
    assert_eq!(locations(&report.errors), vec![(501, "Tratamiento")]);
    assert_eq!(report.valid_rows, 499);
}
