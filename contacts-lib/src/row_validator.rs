use crate::catalog;
use crate::model::{Finding, Row, fields};
use crate::rules::{
    self, MAX_TEXT_LENGTH, MOBILE_LENGTH, PHONE_LENGTH_RANGE, RuleViolation, char_len, split_list,
};

/// Collects the findings of one row in evaluation order
struct RowCheck {
    row_number: usize,
    findings: Vec<Finding>,
}

impl RowCheck {
    fn new(row_number: usize) -> Self {
        RowCheck {
            row_number,
            findings: Vec::new(),
        }
    }

    fn report(&mut self, field: &str, violation: RuleViolation) {
        self.findings
            .push(Finding::from_violation(self.row_number, field, &violation));
    }

    /// Length and grammar check shared by the free-text fields.
    /// The grammar is only consulted when the length is acceptable.
    fn check_text(
        &mut self,
        field: &'static str,
        value: &str,
        is_valid: fn(&str) -> bool,
        allowed: &'static str,
    ) {
        if char_len(value) > MAX_TEXT_LENGTH {
            self.report(
                field,
                RuleViolation::TooLong {
                    field,
                    max: MAX_TEXT_LENGTH,
                },
            );
        } else if !is_valid(value) {
            self.report(field, RuleViolation::InvalidCharacters { field, allowed });
        }
    }
}

/// Validate a single contact row.
///
/// `row_number` is the sheet line the row came from; it is copied into every finding.
/// Findings come back in rule order: Tratamiento, Nombres y Apellidos, Departamento,
/// Municipio, Dirección/Email, Entidad, Cargo, Teléfono, Celular.
pub fn validate_row(row: &Row, row_number: usize) -> Vec<Finding> {
    let mut check = RowCheck::new(row_number);

    if row.value(fields::TRATAMIENTO).is_empty() {
        check.report(
            fields::TRATAMIENTO,
            RuleViolation::Required {
                field: fields::TRATAMIENTO,
            },
        );
    }

    let names = row.value(fields::NOMBRES_Y_APELLIDOS);
    if names.is_empty() {
        check.report(
            fields::NOMBRES_Y_APELLIDOS,
            RuleViolation::Required {
                field: fields::NOMBRES_Y_APELLIDOS,
            },
        );
    } else {
        check.check_text(
            fields::NOMBRES_Y_APELLIDOS,
            names,
            rules::is_valid_name,
            "letras y espacios",
        );
    }

    let department = row.value(fields::DEPARTAMENTO);
    if department.is_empty() {
        check.report(
            fields::DEPARTAMENTO,
            RuleViolation::Required {
                field: fields::DEPARTAMENTO,
            },
        );
    } else if !catalog::is_department(department) {
        check.report(
            fields::DEPARTAMENTO,
            RuleViolation::UnknownDepartment {
                department: department.to_string(),
            },
        );
    }

    let municipality = row.value(fields::MUNICIPIO);
    if municipality.is_empty() {
        check.report(
            fields::MUNICIPIO,
            RuleViolation::Required {
                field: fields::MUNICIPIO,
            },
        );
    } else if !department.is_empty() && !catalog::is_municipality_of(department, municipality) {
        // An unknown department has no municipalities, so this also fires after an
        // UnknownDepartment finding
        check.report(
            fields::MUNICIPIO,
            RuleViolation::MunicipalityOutsideDepartment {
                municipality: municipality.to_string(),
                department: department.to_string(),
            },
        );
    }

    let address = row.value(fields::DIRECCION);
    let email = row.value(fields::EMAIL);

    if address.is_empty() && email.is_empty() {
        check.report(fields::DIRECCION, RuleViolation::MissingContactChannel);
    }

    if !address.is_empty() {
        check.check_text(
            fields::DIRECCION,
            address,
            rules::is_valid_address,
            "letras, números, espacios, puntos, comas, guiones y numeral (#)",
        );
    }

    if !email.is_empty() {
        let problems = rules::email_problems(email);
        if !problems.is_empty() {
            check.report(fields::EMAIL, RuleViolation::InvalidEmail { problems });
        }
    }

    let entity = row.value(fields::ENTIDAD);
    if !entity.is_empty() {
        check.check_text(
            fields::ENTIDAD,
            entity,
            rules::is_valid_entity,
            "letras, números, espacios, punto (.), ampersand (&) y paréntesis",
        );
    }

    let position = row.value(fields::CARGO);
    if !position.is_empty() {
        check.check_text(
            fields::CARGO,
            position,
            rules::is_valid_position,
            "letras, espacios, puntos y paréntesis",
        );
    }

    let phones = row.value(fields::TELEFONO);
    if !phones.is_empty() {
        for piece in split_list(phones) {
            if !PHONE_LENGTH_RANGE.contains(&char_len(piece)) {
                check.report(
                    fields::TELEFONO,
                    RuleViolation::PhoneLength {
                        piece: piece.to_string(),
                    },
                );
            }
        }
    }

    let mobiles = row.value(fields::CELULAR);
    if !mobiles.is_empty() {
        for piece in split_list(mobiles) {
            if char_len(piece) != MOBILE_LENGTH {
                check.report(
                    fields::CELULAR,
                    RuleViolation::MobileLength {
                        piece: piece.to_string(),
                    },
                );
            }
        }
    }

    check.findings
}
