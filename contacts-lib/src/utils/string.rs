/// Normalize text by replacing control characters with spaces and normalizing whitespace
/// Replaces newlines and control characters with spaces, collapses runs of whitespace and trims
pub fn normalize_string(value: &str) -> String {
    value
        .chars() // Process character by character
        .map(|c| {
            if c.is_control() {
                ' ' // Replace control characters (newlines, tabs, etc.) with spaces
            } else {
                c
            }
        })
        .collect::<String>()
        .split_whitespace() // Split on whitespace to normalize multiple spaces
        .collect::<Vec<&str>>()
        .join(" ") // Join back with single spaces
}

/// Replace Spanish accented vowels and ü with their plain ASCII vowel.
/// ñ/Ñ are kept since they are distinct letters.
pub fn fold_accents(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'Á' => 'A',
            'É' => 'E',
            'Í' => 'I',
            'Ó' => 'O',
            'Ú' | 'Ü' => 'U',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_string_collapses_whitespace() {
        assert_eq!(normalize_string("  Nombres \n y\tApellidos  "), "Nombres y Apellidos");
        assert_eq!(normalize_string(""), "");
    }

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("Dirección"), "Direccion");
        assert_eq!(fold_accents("TELÉFONO"), "TELEFONO");
        assert_eq!(fold_accents("Güicán"), "Guican");
        assert_eq!(fold_accents("Ñame"), "Ñame");
    }
}
