use std::fmt;

use crate::grading::mark::{self, MAX_MARK};
use crate::grading::GradeEntry;

/// Which form field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ContinuousAssessment,
    PracticalWork,
    Exam,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::ContinuousAssessment => write!(f, "continuous assessment"),
            Field::PracticalWork => write!(f, "practical work"),
            Field::Exam => write!(f, "exam"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryError {
    MissingSubject,
    MissingExam,
    InvalidCoefficient(String),
    InvalidMark { field: Field, value: String },
    OutOfRange { field: Field, value: f64 },
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryError::MissingSubject => write!(f, "Subject is required"),
            EntryError::MissingExam => write!(f, "Exam mark is required"),
            EntryError::InvalidCoefficient(value) => {
                write!(f, "Coefficient must be a positive number, got '{}'", value)
            }
            EntryError::InvalidMark { field, value } => {
                write!(f, "Invalid {} mark '{}'", field, value)
            }
            EntryError::OutOfRange { field, value } => {
                write!(f, "The {} mark must be between 0 and 20, got {}", field, value)
            }
        }
    }
}

impl std::error::Error for EntryError {}

fn optional_mark(field: Field, raw: &str) -> Result<Option<f64>, EntryError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let value = mark::parse(raw).ok_or_else(|| EntryError::InvalidMark {
        field,
        value: raw.trim().to_string(),
    })?;
    if !(0.0..=MAX_MARK).contains(&value) {
        return Err(EntryError::OutOfRange { field, value });
    }
    Ok(Some(value))
}

impl GradeEntry {
    /// Build an entry from raw text fields, as typed in a form or passed on
    /// the command line.
    ///
    /// An empty coefficient means 1. Empty CC/TP fields mean the mark is
    /// absent. Subject and exam are required.
    pub fn from_fields(
        subject: &str,
        coefficient: &str,
        continuous_assessment: &str,
        practical_work: &str,
        exam: &str,
    ) -> Result<Self, EntryError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(EntryError::MissingSubject);
        }

        let coefficient = if coefficient.trim().is_empty() {
            1.0
        } else {
            match mark::parse(coefficient) {
                Some(c) if c > 0.0 => c,
                _ => return Err(EntryError::InvalidCoefficient(coefficient.trim().to_string())),
            }
        };

        let continuous_assessment =
            optional_mark(Field::ContinuousAssessment, continuous_assessment)?;
        let practical_work = optional_mark(Field::PracticalWork, practical_work)?;
        let exam = optional_mark(Field::Exam, exam)?.ok_or(EntryError::MissingExam)?;

        Ok(Self {
            subject: subject.to_string(),
            coefficient,
            continuous_assessment,
            practical_work,
            exam,
        })
    }
}
