use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::rules::RuleViolation;

/// Canonical column names of the contact template
pub mod fields {
    pub const TRATAMIENTO: &str = "Tratamiento";
    pub const NOMBRES_Y_APELLIDOS: &str = "Nombres y Apellidos";
    pub const CARGO: &str = "Cargo";
    pub const ENTIDAD: &str = "Entidad";
    pub const DEPARTAMENTO: &str = "Departamento";
    pub const MUNICIPIO: &str = "Municipio";
    pub const DIRECCION: &str = "Dirección";
    pub const EMAIL: &str = "Email";
    pub const TELEFONO: &str = "Teléfono";
    pub const CELULAR: &str = "Celular";

    /// Pseudo-fields used by whole-file findings (row 0)
    pub const DATOS: &str = "Datos";
    pub const COLUMNAS: &str = "Columnas";
    pub const ARCHIVO: &str = "Archivo";

    /// Columns that must be present in the sheet before any row is validated
    pub const REQUIRED_COLUMNS: [&str; 4] =
        [TRATAMIENTO, NOMBRES_Y_APELLIDOS, DEPARTAMENTO, MUNICIPIO];

    pub const ALL: [&str; 10] = [
        TRATAMIENTO,
        NOMBRES_Y_APELLIDOS,
        CARGO,
        ENTIDAD,
        DEPARTAMENTO,
        MUNICIPIO,
        DIRECCION,
        EMAIL,
        TELEFONO,
        CELULAR,
    ];
}

/// Sheet line of the first data row (line 1 holds the headers)
pub const FIRST_DATA_ROW: usize = 2;

/// One contact record, keyed by canonical field name.
///
/// Values are stored as given by the intake step. A field that is absent and a field holding
/// only whitespace are treated the same by the rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    pub fn new() -> Self {
        Row(BTreeMap::new())
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Builder-style insert, handy when assembling rows by hand
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Trimmed value of `field`, or `""` when absent
    pub fn value(&self, field: &str) -> &str {
        self.0.get(field).map(|v| v.trim()).unwrap_or("")
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation issue tied to a sheet line and a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub row: usize,
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl Finding {
    pub fn new(row: usize, field: &str, message: impl Into<String>, severity: Severity) -> Self {
        Finding {
            row,
            field: field.to_string(),
            message: message.into(),
            severity,
        }
    }

    /// Lift a rule violation into a finding, taking the message and severity from the violation
    pub fn from_violation(row: usize, field: &str, violation: &RuleViolation) -> Self {
        Finding::new(row, field, violation.to_string(), violation.severity())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Outcome of one validation run.
///
/// `errors` holds warnings too; a row with any finding is not counted in `valid_rows`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<Finding>,
    pub total_rows: usize,
    pub valid_rows: usize,
}

impl ValidationReport {
    /// Build a report from the ordered findings of a run over `total_rows` rows
    pub fn from_findings(findings: Vec<Finding>, total_rows: usize) -> Self {
        let error_rows: BTreeSet<usize> = findings.iter().map(|f| f.row).collect();
        ValidationReport {
            is_valid: findings.is_empty(),
            valid_rows: total_rows.saturating_sub(error_rows.len()),
            errors: findings,
            total_rows,
        }
    }

    /// Whole-file failure: one error on row 0, no rows counted
    pub fn file_level_error(field: &str, message: impl Into<String>) -> Self {
        ValidationReport {
            is_valid: false,
            errors: vec![Finding::new(0, field, message, Severity::Error)],
            total_rows: 0,
            valid_rows: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.iter().filter(|f| f.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.errors.len() - self.error_count()
    }

    /// True when at least one finding has severity error
    pub fn has_blocking_errors(&self) -> bool {
        self.errors.iter().any(Finding::is_error)
    }

    /// Number of findings per field, ordered by field name
    pub fn errors_by_field(&self) -> BTreeMap<&str, usize> {
        let mut by_field = BTreeMap::new();
        for finding in &self.errors {
            *by_field.entry(finding.field.as_str()).or_insert(0) += 1;
        }
        by_field
    }

    /// Findings grouped by sheet line, ascending, keeping their original order within a line
    pub fn errors_by_row(&self) -> BTreeMap<usize, Vec<&Finding>> {
        let mut by_row: BTreeMap<usize, Vec<&Finding>> = BTreeMap::new();
        for finding in &self.errors {
            by_row.entry(finding.row).or_default().push(finding);
        }
        by_row
    }
}
