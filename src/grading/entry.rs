use serde::{Deserialize, Deserializer, Serialize};

use super::engine::subject_average;
use super::mark;
use super::status::{classify, Status};

/// One subject's scores and its weight in the general average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    #[serde(default, deserialize_with = "deserialize_subject")]
    pub subject: String,

    #[serde(default, deserialize_with = "mark::deserialize_or_zero")]
    pub coefficient: f64,

    /// Contrôle continu
    #[serde(
        default,
        deserialize_with = "mark::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub continuous_assessment: Option<f64>,

    /// Travaux pratiques
    #[serde(
        default,
        deserialize_with = "mark::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub practical_work: Option<f64>,

    #[serde(default, deserialize_with = "mark::deserialize_or_zero")]
    pub exam: f64,
}

/// A stored subject name: normally text, but a bare number is kept as its
/// digits and anything else reads as an empty name.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSubject {
    Text(String),
    Number(f64),
    Other(serde::de::IgnoredAny),
}

fn deserialize_subject<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<StoredSubject>::deserialize(deserializer)?;
    Ok(match stored {
        Some(StoredSubject::Text(s)) => s,
        Some(StoredSubject::Number(n)) => n.to_string(),
        Some(StoredSubject::Other(_)) | None => String::new(),
    })
}

impl GradeEntry {
    /// Create an exam-only entry.
    pub fn new(subject: impl Into<String>, coefficient: f64, exam: f64) -> Self {
        Self {
            subject: subject.into(),
            coefficient,
            continuous_assessment: None,
            practical_work: None,
            exam,
        }
    }

    pub fn with_continuous_assessment(mut self, mark: f64) -> Self {
        self.continuous_assessment = Some(mark);
        self
    }

    pub fn with_practical_work(mut self, mark: f64) -> Self {
        self.practical_work = Some(mark);
        self
    }

    /// Subject average, unrounded.
    pub fn average(&self) -> f64 {
        subject_average(self.continuous_assessment, self.practical_work, self.exam)
    }

    pub fn status(&self) -> Status {
        classify(self.average())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_optional_marks() {
        let entry = GradeEntry::new("Physique", 3.0, 11.0)
            .with_continuous_assessment(13.0)
            .with_practical_work(15.0);

        assert_eq!(entry.subject, "Physique");
        assert_eq!(entry.coefficient, 3.0);
        assert_eq!(entry.continuous_assessment, Some(13.0));
        assert_eq!(entry.practical_work, Some(15.0));
        assert_eq!(entry.exam, 11.0);
    }

    #[test]
    fn test_average_and_status_follow_engine() {
        let entry = GradeEntry::new("Histoire", 1.0, 16.0);
        assert_eq!(entry.average(), 16.0);
        assert_eq!(entry.status(), Status::Excellent);

        let entry = GradeEntry::new("Chimie", 1.0, 4.0).with_practical_work(6.0);
        assert!((entry.average() - 4.8).abs() < 1e-9);
        assert_eq!(entry.status(), Status::Danger);
    }

    #[test]
    fn test_serialize_skips_absent_marks() {
        let entry = GradeEntry::new("Anglais", 2.0, 12.0);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("continuous_assessment"));
        assert!(!json.contains("practical_work"));
        assert!(json.contains("\"exam\":12.0"));
    }

    #[test]
    fn test_deserialize_lenient_fields() {
        let json = r#"{
            "subject": "Maths",
            "coefficient": "2",
            "continuous_assessment": "12,5",
            "practical_work": "",
            "exam": "x"
        }"#;
        let entry: GradeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.coefficient, 2.0);
        assert_eq!(entry.continuous_assessment, Some(12.5));
        assert_eq!(entry.practical_work, None);
        assert_eq!(entry.exam, 0.0);
    }

    #[test]
    fn test_deserialize_lenient_subject() {
        let json = r#"[
            {"coefficient": 1, "exam": 12},
            {"subject": 42, "coefficient": 1, "exam": 9},
            {"subject": {"name": "x"}, "coefficient": 1, "exam": 4},
            {"subject": null, "coefficient": 1, "exam": 15}
        ]"#;
        let entries: Vec<GradeEntry> = serde_json::from_str(json).unwrap();
        let subjects: Vec<_> = entries.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(subjects, vec!["", "42", "", ""]);
        assert_eq!(entries[1].exam, 9.0);
    }
}
