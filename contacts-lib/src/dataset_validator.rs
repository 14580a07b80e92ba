use std::collections::HashMap;

use crate::model::{FIRST_DATA_ROW, Finding, Row, ValidationReport, fields};
use crate::row_validator::validate_row;
use crate::rules::{RuleViolation, split_list};

/// Validate every row, then look for email addresses shared between rows.
///
/// Row `i` of `rows` is reported as sheet line `i + 2`. Findings are ordered by row, then by
/// rule within the row; duplicate-email warnings come last.
pub fn validate_dataset(rows: &[Row]) -> ValidationReport {
    if rows.is_empty() {
        return ValidationReport::file_level_error(fields::DATOS, "No hay datos para validar");
    }

    let mut findings: Vec<Finding> = rows
        .iter()
        .enumerate()
        .flat_map(|(index, row)| validate_row(row, index + FIRST_DATA_ROW))
        .collect();

    findings.extend(duplicate_email_findings(rows));

    ValidationReport::from_findings(findings, rows.len())
}

/// One warning per occurrence of every address that shows up on more than one row.
///
/// Addresses are compared lower-cased and trimmed. Groups are emitted in order of the first
/// row each address appears on.
pub fn duplicate_email_findings(rows: &[Row]) -> Vec<Finding> {
    let mut order: Vec<String> = Vec::new();
    let mut occurrences: HashMap<String, Vec<usize>> = HashMap::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + FIRST_DATA_ROW;
        let email = row.value(fields::EMAIL).to_lowercase();

        for address in split_list(&email).filter(|a| !a.is_empty()) {
            let seen_on = occurrences.entry(address.to_string()).or_insert_with(|| {
                order.push(address.to_string());
                Vec::new()
            });
            // The same address twice in one cell is not a cross-row duplicate
            if seen_on.last() != Some(&row_number) {
                seen_on.push(row_number);
            }
        }
    }

    let mut findings = Vec::new();
    for address in order {
        let Some(seen_on) = occurrences.get(&address) else {
            continue;
        };
        if seen_on.len() < 2 {
            continue;
        }

        for &row_number in seen_on {
            let violation = RuleViolation::DuplicateEmail {
                address: address.clone(),
                other_rows: seen_on
                    .iter()
                    .copied()
                    .filter(|&other| other != row_number)
                    .collect(),
            };
            findings.push(Finding::from_violation(
                row_number,
                fields::EMAIL,
                &violation,
            ));
        }
    }

    findings
}
