use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration, read from `~/.config/moyenne/config.yaml`.
///
/// Every section is optional. Example YAML:
/// ```yaml
/// storage_path: /home/me/school/grades.json
/// export:
///   delimiter: ","
///   decimal_separator: ","
///   include_summary: true
/// display:
///   theme: auto
///   confirm_destructive: true
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where the gradebook is stored (default: ~/.config/moyenne/grades.json)
    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// CSV export settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ExportConfig {
    /// Field delimiter, a single ASCII character
    pub delimiter: String,

    /// Decimal separator used for numbers: "." or ","
    pub decimal_separator: String,

    /// Append a "General average" row after the entries
    pub include_summary: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            decimal_separator: ",".to_string(),
            include_summary: true,
        }
    }
}

impl ExportConfig {
    /// Delimiter as a byte for the CSV writer. Falls back to `,` when the
    /// configured value is not a single ASCII character.
    pub fn delimiter_byte(&self) -> u8 {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => b',',
        }
    }

    /// Decimal separator as a char, `.` unless configured otherwise.
    pub fn decimal_char(&self) -> char {
        self.decimal_separator.chars().next().unwrap_or('.')
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}

/// Terminal display settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct DisplayConfig {
    pub theme: ThemeMode,

    /// Ask before deleting an entry or clearing the gradebook
    pub confirm_destructive: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Auto,
            confirm_destructive: true,
        }
    }
}
