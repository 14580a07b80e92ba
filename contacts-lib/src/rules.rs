//! Field grammars and the violations the row rules can raise.
//!
//! Letter classes are spelled out instead of using `\p{L}`: only the Spanish accented vowels,
//! ñ/Ñ and ü/Ü are admitted, nothing else from the Latin-1 or wider letter range.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::model::Severity;

/// Maximum characters for names, positions, organizations and addresses
pub const MAX_TEXT_LENGTH: usize = 100;
/// Maximum characters for the whole Email cell
pub const MAX_EMAIL_FIELD_LENGTH: usize = 200;
/// Accepted landline lengths
pub const PHONE_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 6..=10;
pub const MOBILE_LENGTH: usize = 10;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑüÜ\s]+$").expect("valid regex"));

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑüÜ0-9\s.&()]+$").expect("valid regex"));

static POSITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑüÜ\s().]+$").expect("valid regex"));

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[a-zA-ZáéíóúÁÉÍÓÚüÜ0-9\s.#\-,º"“”–°]+$"#).expect("valid regex")
});

static EMAIL_FORMAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

static EMAIL_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._@-]+$").expect("valid regex"));

pub fn is_valid_name(value: &str) -> bool {
    NAME_RE.is_match(value)
}

pub fn is_valid_entity(value: &str) -> bool {
    ENTITY_RE.is_match(value)
}

pub fn is_valid_position(value: &str) -> bool {
    POSITION_RE.is_match(value)
}

pub fn is_valid_address(value: &str) -> bool {
    ADDRESS_RE.is_match(value)
}

/// Length in characters, not bytes
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Split a multi-valued cell on commas, trimming each piece
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("El campo {field} es obligatorio")]
    Required { field: &'static str },

    #[error("El campo {field} no puede exceder {max} caracteres")]
    TooLong { field: &'static str, max: usize },

    #[error("El campo {field} solo acepta {allowed}")]
    InvalidCharacters {
        field: &'static str,
        allowed: &'static str,
    },

    #[error("El departamento \"{department}\" no existe en la lista oficial")]
    UnknownDepartment { department: String },

    #[error("El municipio \"{municipality}\" no pertenece al departamento \"{department}\"")]
    MunicipalityOutsideDepartment {
        municipality: String,
        department: String,
    },

    #[error("Debe diligenciar una dirección física o un correo electrónico")]
    MissingContactChannel,

    #[error("Errores en email: {}", join_problems(.problems))]
    InvalidEmail { problems: Vec<EmailProblem> },

    #[error("Teléfono parece incorrecto (6-10 dígitos): {piece}")]
    PhoneLength { piece: String },

    #[error("Celular parece incorrecto (10 dígitos): {piece}")]
    MobileLength { piece: String },

    #[error("El correo \"{address}\" está repetido también en las filas: {}", join_rows(.other_rows))]
    DuplicateEmail {
        address: String,
        other_rows: Vec<usize>,
    },
}

impl RuleViolation {
    pub fn severity(&self) -> Severity {
        match self {
            RuleViolation::PhoneLength { .. }
            | RuleViolation::MobileLength { .. }
            | RuleViolation::DuplicateEmail { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// One failed sub-check of the Email cell; several are folded into a single finding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailProblem {
    #[error("no puede exceder {max} caracteres")]
    TooLong { max: usize },

    #[error("no se permiten espacios (separe múltiples correos con comas sin espacios)")]
    ContainsSpaces,

    #[error("\"{address}\" no puede contener la letra ñ")]
    ContainsEnye { address: String },

    #[error("formato incorrecto en \"{address}\"")]
    BadFormat { address: String },

    #[error("\"{address}\" contiene caracteres no permitidos")]
    DisallowedCharacters { address: String },

    #[error("\"{address}\" no puede empezar o terminar con punto")]
    EdgeDot { address: String },

    #[error("\"{address}\" no puede tener puntos consecutivos")]
    ConsecutiveDots { address: String },

    #[error("\"{address}\" debe tener exactamente un símbolo @")]
    AtSignCount { address: String },
}

fn join_problems(problems: &[EmailProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_rows(rows: &[usize]) -> String {
    rows.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run every Email sub-check over a non-empty cell, in a fixed order
pub fn email_problems(email: &str) -> Vec<EmailProblem> {
    let mut problems = Vec::new();

    if char_len(email) > MAX_EMAIL_FIELD_LENGTH {
        problems.push(EmailProblem::TooLong {
            max: MAX_EMAIL_FIELD_LENGTH,
        });
    }

    if email.contains(' ') {
        problems.push(EmailProblem::ContainsSpaces);
    }

    for address in split_list(email).filter(|a| !a.is_empty()) {
        let owned = || address.to_string();

        if address.contains(['ñ', 'Ñ']) {
            problems.push(EmailProblem::ContainsEnye { address: owned() });
        }
        if !EMAIL_FORMAT_RE.is_match(address) {
            problems.push(EmailProblem::BadFormat { address: owned() });
        }
        if !EMAIL_CHARSET_RE.is_match(address) {
            problems.push(EmailProblem::DisallowedCharacters { address: owned() });
        }
        if address.starts_with('.') || address.ends_with('.') {
            problems.push(EmailProblem::EdgeDot { address: owned() });
        }
        if address.contains("..") {
            problems.push(EmailProblem::ConsecutiveDots { address: owned() });
        }
        if address.matches('@').count() != 1 {
            problems.push(EmailProblem::AtSignCount { address: owned() });
        }
    }

    problems
}
