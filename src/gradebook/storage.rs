use super::types::{GradeBook, GRADEBOOK_VERSION};
use crate::grading::GradeEntry;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the gradebook inside the config directory
pub const STORAGE_FILE: &str = "grades.json";

/// Get the default gradebook path (~/.config/moyenne/grades.json)
pub fn get_gradebook_path() -> PathBuf {
    crate::config::get_config_dir().join(STORAGE_FILE)
}

/// Load the gradebook from a JSON file
///
/// If the file doesn't exist, returns a new empty gradebook.
/// A bare JSON array of entries (older format) is accepted as well.
/// If the file has an unsupported version, returns an error.
pub fn load_gradebook(path: &Path) -> Result<GradeBook> {
    if !path.exists() {
        debug!(path = %path.display(), "No gradebook file yet, starting empty");
        return Ok(GradeBook::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read gradebook at {}", path.display()))?;

    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse gradebook at {}", path.display()))?;

    let book = if value.is_array() {
        let entries: Vec<GradeEntry> =
            serde_json::from_value(value).context("Failed to load gradebook entries")?;
        warn!(
            path = %path.display(),
            entries = entries.len(),
            "Loaded gradebook in legacy array format, it will be upgraded on next save"
        );
        GradeBook::from_entries(entries)
    } else {
        let book: GradeBook =
            serde_json::from_value(value).context("Failed to load gradebook")?;
        if book.version != GRADEBOOK_VERSION {
            anyhow::bail!("Unsupported gradebook version: {}", book.version);
        }
        book
    };

    debug!(path = %path.display(), entries = book.len(), "Loaded gradebook");
    Ok(book)
}

/// Save the gradebook to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_gradebook(path: &Path, book: &GradeBook) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, book).context("Failed to serialize gradebook")?;

    file.commit().context("Failed to save gradebook")?;

    debug!(path = %path.display(), entries = book.len(), "Saved gradebook");
    Ok(())
}
