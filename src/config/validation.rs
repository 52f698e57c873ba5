use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref path) = config.storage_path {
        if path.as_os_str().is_empty() {
            errors.push("storage_path: must not be empty".to_string());
        } else if path.is_dir() {
            errors.push(format!(
                "storage_path: '{}' is a directory, expected a file path",
                path.display()
            ));
        }
    }

    let delimiter = &config.export.delimiter;
    match delimiter.as_bytes() {
        [b] if b.is_ascii() && !matches!(*b, b'"' | b'\n' | b'\r') => {}
        _ => errors.push(format!(
            "export.delimiter: invalid '{}' - must be a single ASCII character other than a quote or newline",
            delimiter
        )),
    }

    let decimal = &config.export.decimal_separator;
    if decimal != "." && decimal != "," {
        errors.push(format!(
            "export.decimal_separator: invalid '{}' - must be \".\" or \",\"",
            decimal
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
