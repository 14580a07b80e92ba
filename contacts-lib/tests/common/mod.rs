use contacts_lib::{Finding, Row, Severity};

// Re-export shared test utilities from src/test_utils.rs
// These are the core functions used by most tests
#[allow(unused_imports)]
pub use contacts_lib::test_utils::{complete_row, range_from_rows, text, valid_row};

/// Build a row from (field, value) pairs
#[allow(dead_code)]
pub fn row(pairs: &[(&str, &str)]) -> Row {
    pairs.iter().copied().collect()
}

/// (row, field) of every finding, in report order
#[allow(dead_code)]
pub fn locations(findings: &[Finding]) -> Vec<(usize, &str)> {
    findings.iter().map(|f| (f.row, f.field.as_str())).collect()
}

#[allow(dead_code)]
pub fn warnings(findings: &[Finding]) -> Vec<&Finding> {
    findings
        .iter()
        .filter(|f| f.severity == Severity::Warning)
        .collect()
}
