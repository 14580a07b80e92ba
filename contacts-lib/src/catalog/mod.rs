//! Read-only catalog of Colombian departments and their municipalities.
//!
//! Names are compared byte for byte: case, accents and punctuation are significant
//! ("Bogotá, D.C." is a department, "Bogota" is not). Normalizing user input onto these
//! spellings is the caller's job.

mod colombia;

use colombia::{DEPARTMENTS, Department};

/// All valid department names, in catalog order.
pub fn list_departments() -> Vec<&'static str> {
    DEPARTMENTS.iter().map(|department| department.name).collect()
}

/// Municipalities of `department`, in catalog order.
///
/// An unknown department yields an empty list; the caller decides how to report it.
pub fn list_municipalities(department: &str) -> Vec<&'static str> {
    find_department(department)
        .map(|found| found.municipalities.to_vec())
        .unwrap_or_default()
}

pub fn is_department(name: &str) -> bool {
    find_department(name).is_some()
}

pub fn is_municipality_of(department: &str, municipality: &str) -> bool {
    find_department(department)
        .is_some_and(|found| found.municipalities.contains(&municipality))
}

fn find_department(name: &str) -> Option<&'static Department> {
    DEPARTMENTS.iter().find(|department| department.name == name)
}
