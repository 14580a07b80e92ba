use calamine::{Reader, open_workbook_auto};
use std::path::Path;

use crate::intake::{IntakeError, SheetData, sheet_from_json, sheet_from_range, validate_sheet};
use crate::model::{Row, ValidationReport};

pub struct ContactSheetValidator {
    source_path: String,
    sheet_name: String,
    sheet: SheetData,
}

pub struct ContactSheetValidatorBuilder {
    source_path: String,
    sheet_name: Option<String>,
}

impl ContactSheetValidatorBuilder {
    /// Create a new ContactSheetValidatorBuilder
    ///
    /// # Arguments
    /// * `source_path` - Path to the spreadsheet (`.xlsx`, `.xls`, `.ods`) or to a JSON array of rows
    pub fn new(source_path: &str) -> Self {
        ContactSheetValidatorBuilder {
            source_path: source_path.to_string(),
            sheet_name: None,
        }
    }

    /// Sheet to read; the first sheet of the workbook when not set
    pub fn sheet_name(mut self, sheet_name: Option<&str>) -> Self {
        self.sheet_name = sheet_name.map(str::to_string);
        self
    }

    /// Build the ContactSheetValidator, reading the source once during construction
    pub fn build(self) -> Result<ContactSheetValidator, IntakeError> {
        let is_json = Path::new(&self.source_path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let (sheet_name, sheet) = if is_json {
            (String::new(), self.read_json()?)
        } else {
            self.read_workbook()?
        };

        Ok(ContactSheetValidator {
            source_path: self.source_path,
            sheet_name,
            sheet,
        })
    }

    fn read_workbook(&self) -> Result<(String, SheetData), IntakeError> {
        let mut workbook =
            open_workbook_auto(&self.source_path).map_err(|source| IntakeError::Workbook {
                path: self.source_path.clone(),
                source,
            })?;

        let sheet_name = match &self.sheet_name {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| IntakeError::NoSheets {
                    path: self.source_path.clone(),
                })?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|source| IntakeError::Sheet {
                sheet: sheet_name.clone(),
                source,
            })?;

        let sheet = sheet_from_range(&range)?;
        Ok((sheet_name, sheet))
    }

    fn read_json(&self) -> Result<SheetData, IntakeError> {
        let content =
            std::fs::read_to_string(&self.source_path).map_err(|source| IntakeError::Io {
                path: self.source_path.clone(),
                source,
            })?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        sheet_from_json(&value)
    }
}

impl ContactSheetValidator {
    /// Wrap rows that were already decoded elsewhere
    pub fn from_sheet(source_path: &str, sheet_name: &str, sheet: SheetData) -> Self {
        ContactSheetValidator {
            source_path: source_path.to_string(),
            sheet_name: sheet_name.to_string(),
            sheet,
        }
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// Name of the sheet that was read; empty for JSON sources
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Canonical headers of the sheet
    pub fn headers(&self) -> &[String] {
        &self.sheet.headers
    }

    /// Non-blank data rows, in sheet order
    pub fn rows(&self) -> &[Row] {
        &self.sheet.rows
    }

    /// Run the required-columns pre-check and the validation engine over the cached rows
    pub fn validate(&self) -> ValidationReport {
        validate_sheet(&self.sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder_reads_json_rows() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"TRATAMIENTO": "Sr.", "NOMBRES Y APELLIDOS": "Juan Pérez",
                 "departamento": "Antioquia", "municipio": "Medellín",
                 "correo": "juan@x.com", "Celular": 3001234567}}]"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let validator = ContactSheetValidatorBuilder::new(&path).build().unwrap();

        assert_eq!(validator.sheet_name(), "");
        assert_eq!(validator.rows().len(), 1);
        assert_eq!(validator.rows()[0].value("Celular"), "3001234567");

        let report = validator.validate();
        assert!(report.is_valid, "Unexpected findings: {:?}", report.errors);
        assert_eq!(report.valid_rows, 1);
    }

    #[test]
    fn test_builder_reports_missing_workbook() {
        let result = ContactSheetValidatorBuilder::new("does/not/exist.xlsx")
            .sheet_name(Some("Hoja1"))
            .build();
        assert!(matches!(result, Err(IntakeError::Workbook { .. })));
    }

    #[test]
    fn test_builder_rejects_malformed_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[{{\"Tratamiento\": ").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let result = ContactSheetValidatorBuilder::new(&path).build();
        assert!(matches!(result, Err(IntakeError::Json(_))));
    }

    #[test]
    fn test_from_sheet_accessors() {
        let sheet = SheetData {
            headers: vec!["Tratamiento".to_string()],
            rows: vec![Row::new().with("Tratamiento", "Sra.")],
        };
        let validator = ContactSheetValidator::from_sheet("memoria.xlsx", "Contactos", sheet);
        assert_eq!(validator.source_path(), "memoria.xlsx");
        assert_eq!(validator.sheet_name(), "Contactos");
        assert_eq!(validator.headers(), ["Tratamiento".to_string()]);

        let report = validator.validate();
        assert_eq!(report.errors[0].field, "Columnas");
    }
}
