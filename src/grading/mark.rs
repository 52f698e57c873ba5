//! Marks (scores out of 20) and the single "present and numeric" rule.
//!
//! Every place that turns an optional score into a number goes through
//! [`present`] (for values already typed as `f64`) or [`parse`] (for text).
//! The subject average, the aggregate and the gradebook loader all share it.

use serde::{Deserialize, Deserializer};

/// Highest mark on the grading scale.
pub const MAX_MARK: f64 = 20.0;

/// Returns the value only if it is a usable number (not NaN, not infinite).
pub fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Parse a mark typed by a user or read from storage.
///
/// Empty or whitespace-only text is absent. Both `.` and `,` are accepted as
/// decimal separator ("12,5" and "12.5" are the same mark).
pub fn parse(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.replace(',', ".");
    present(normalized.parse::<f64>().ok())
}

/// Round to two decimals, the precision used for display and export.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A stored value as it may appear in a gradebook file: a JSON number, a
/// numeric string (older files stored raw form text), or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredMark {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl StoredMark {
    fn value(self) -> Option<f64> {
        match self {
            StoredMark::Number(n) => present(Some(n)),
            StoredMark::Text(s) => parse(&s),
            StoredMark::Other(_) => None,
        }
    }
}

/// Deserialize an optional mark, mapping anything non-numeric to `None`.
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<StoredMark>::deserialize(deserializer)?;
    Ok(stored.and_then(StoredMark::value))
}

/// Deserialize a mark that must be numeric, falling back to `0`.
pub(crate) fn deserialize_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional(deserializer)?.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_filters_non_finite() {
        assert_eq!(present(Some(12.5)), Some(12.5));
        assert_eq!(present(Some(-3.0)), Some(-3.0));
        assert_eq!(present(Some(f64::NAN)), None);
        assert_eq!(present(Some(f64::INFINITY)), None);
        assert_eq!(present(None), None);
    }

    #[test]
    fn test_parse_accepts_both_separators() {
        assert_eq!(parse("12.5"), Some(12.5));
        assert_eq!(parse("12,5"), Some(12.5));
        assert_eq!(parse("  14 "), Some(14.0));
    }

    #[test]
    fn test_parse_empty_and_garbage_are_absent() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("abc"), None);
        assert_eq!(parse("NaN"), None);
        assert_eq!(parse("inf"), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.399999999), 10.4);
        assert_eq!(round2(4.8), 4.8);
        assert_eq!(round2(12.345678), 12.35);
        assert_eq!(round2(0.0), 0.0);
    }

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "deserialize_optional")]
        mark: Option<f64>,
        #[serde(default, deserialize_with = "deserialize_or_zero")]
        exam: f64,
    }

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let probe: Probe = serde_json::from_str(r#"{"mark": 12, "exam": "15,5"}"#).unwrap();
        assert_eq!(probe.mark, Some(12.0));
        assert_eq!(probe.exam, 15.5);
    }

    #[test]
    fn test_deserialize_absent_values() {
        let probe: Probe = serde_json::from_str(r#"{"mark": "", "exam": null}"#).unwrap();
        assert_eq!(probe.mark, None);
        assert_eq!(probe.exam, 0.0);

        let probe: Probe = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(probe.mark, None);
        assert_eq!(probe.exam, 0.0);
    }

    #[test]
    fn test_deserialize_unexpected_types_do_not_fail() {
        let probe: Probe = serde_json::from_str(r#"{"mark": true, "exam": [1, 2]}"#).unwrap();
        assert_eq!(probe.mark, None);
        assert_eq!(probe.exam, 0.0);
    }
}
