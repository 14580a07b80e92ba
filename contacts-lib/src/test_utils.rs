// Test utilities available to both unit and integration tests
// Only compiled when testing

use calamine::{Data, Range};

use crate::model::{Row, fields};

/// Column headers of the official upload template, in template order
pub const TEMPLATE_HEADERS: [&str; 10] = fields::ALL;

/// A row that passes every rule
pub fn valid_row() -> Row {
    Row::new()
        .with(fields::TRATAMIENTO, "Sr.")
        .with(fields::NOMBRES_Y_APELLIDOS, "Juan Pérez")
        .with(fields::DEPARTAMENTO, "Antioquia")
        .with(fields::MUNICIPIO, "Medellín")
        .with(fields::EMAIL, "juan@x.com")
}

/// A fully populated valid row, distinct per `n` so no email is shared
pub fn complete_row(n: usize) -> Row {
    Row::new()
        .with(fields::TRATAMIENTO, "Dra.")
        .with(fields::NOMBRES_Y_APELLIDOS, "María Fernanda Núñez")
        .with(fields::CARGO, "Directora (E.)")
        .with(fields::ENTIDAD, "Gobernación del Valle & Cía.")
        .with(fields::DEPARTAMENTO, "Valle del Cauca")
        .with(fields::MUNICIPIO, "Guadalajara de Buga")
        .with(fields::DIRECCION, "Carrera 14 # 5-30, Oficina 201")
        .with(fields::EMAIL, format!("contacto{}@valle.gov.co", n))
        .with(fields::TELEFONO, "6022345678")
        .with(fields::CELULAR, "3151234567")
}

/// Build an in-memory worksheet, first row being the headers
pub fn range_from_rows(rows: Vec<Vec<Data>>) -> Range<Data> {
    let height = rows.len();
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if height == 0 || width == 0 {
        return Range::empty();
    }

    let mut range = Range::new((0, 0), ((height - 1) as u32, (width - 1) as u32));
    for (r, cells) in rows.into_iter().enumerate() {
        for (c, cell) in cells.into_iter().enumerate() {
            range.set_value((r as u32, c as u32), cell);
        }
    }
    range
}

/// Shorthand for a string cell
pub fn text(value: &str) -> Data {
    Data::String(value.to_string())
}
