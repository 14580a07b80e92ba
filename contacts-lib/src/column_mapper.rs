//! Maps the header spellings found in real sheets onto the canonical field names.

use crate::model::{Row, fields};
use crate::utils::{fold_accents, normalize_string};

/// Header aliases keyed by their comparison key (see `comparison_key`)
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("tratamiento", fields::TRATAMIENTO),
    ("nombresyapellidos", fields::NOMBRES_Y_APELLIDOS),
    ("nombresapellidos", fields::NOMBRES_Y_APELLIDOS),
    ("cargo", fields::CARGO),
    ("entidad", fields::ENTIDAD),
    ("departamento", fields::DEPARTAMENTO),
    ("municipio", fields::MUNICIPIO),
    ("direccion", fields::DIRECCION),
    ("email", fields::EMAIL),
    ("e-mail", fields::EMAIL),
    ("correo", fields::EMAIL),
    ("correoelectronico", fields::EMAIL),
    ("telefono", fields::TELEFONO),
    ("celular", fields::CELULAR),
    ("movil", fields::CELULAR),
];

/// Result of checking a sheet's headers for the mandatory columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCheck {
    pub is_valid: bool,
    pub missing_columns: Vec<String>,
    pub found_columns: Vec<String>,
}

/// Lower-cased, accent-folded, with underscores and whitespace removed
fn comparison_key(name: &str) -> String {
    fold_accents(&normalize_string(name).to_lowercase())
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect()
}

/// Canonical field name for a header, or the trimmed header itself when it is not a known alias
pub fn normalize_column_name(column_name: &str) -> String {
    let key = comparison_key(column_name);
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| normalize_string(column_name))
}

/// Re-key a row from sheet headers to canonical field names.
///
/// When two headers normalize to the same field, the later column wins.
pub fn normalize_row(raw: &Row) -> Row {
    raw.iter()
        .map(|(key, value)| (normalize_column_name(key), value.to_string()))
        .collect()
}

/// Check that all mandatory columns are present among `columns` (after normalization)
pub fn validate_columns<S: AsRef<str>>(columns: &[S]) -> ColumnCheck {
    let found_columns: Vec<String> = columns
        .iter()
        .map(|column| normalize_column_name(column.as_ref()))
        .collect();

    let missing_columns: Vec<String> = fields::REQUIRED_COLUMNS
        .iter()
        .filter(|required| !found_columns.iter().any(|found| found == *required))
        .map(|required| required.to_string())
        .collect();

    ColumnCheck {
        is_valid: missing_columns.is_empty(),
        missing_columns,
        found_columns,
    }
}
