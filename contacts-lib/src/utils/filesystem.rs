use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::utils::get_utc_iso_datetime;

/// Centralized function to append error messages to an errors log file
///
/// # Arguments
/// * `log_file` - Path of the log file, created on first use (usually `ERRORS_LOG_FILE`)
/// * `error_type` - A description of the error type/category (e.g., "Contact Sheet Validation Report")
/// * `error_message` - The actual error message content
pub fn write_error_to_log(log_file: impl AsRef<Path>, error_type: &str, error_message: &str) {
    let timestamp = get_utc_iso_datetime();
    let log_entry = format!("\n[{}] {}:\n{}\n", timestamp, error_type, error_message);

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        let _ = writeln!(file, "{}", log_entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entries_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("errors.log");

        write_error_to_log(&log_path, "First", "uno");
        write_error_to_log(&log_path, "Second", "dos");

        let content = std::fs::read_to_string(&log_path).unwrap();
        let first = content.find("First:\nuno").expect("first entry");
        let second = content.find("Second:\ndos").expect("second entry");
        assert!(first < second, "Entries should keep their write order");
    }
}
