use super::entry::GradeEntry;
use super::mark::present;
use super::status::{classify, Status, DANGER_THRESHOLD, PASS_THRESHOLD};

/// Result of aggregating a whole gradebook.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    pub general_average: f64,
    /// Subjects with an average of at least 10.
    pub validated_count: usize,
    /// Subjects with an average below 8.
    pub danger_count: usize,
}

impl Aggregate {
    pub fn status(&self) -> Status {
        classify(self.general_average)
    }
}

/// Average of one subject.
///
/// Weighting depends on which continuous-work marks are present:
/// - both CC and TP: 30% CC, 20% TP, 50% exam
/// - only one of them: 40% that mark, 60% exam
/// - neither: the exam mark alone
///
/// A non-numeric exam counts as 0. The result is not rounded.
pub fn subject_average(
    continuous_assessment: Option<f64>,
    practical_work: Option<f64>,
    exam: f64,
) -> f64 {
    let exam = present(Some(exam)).unwrap_or(0.0);

    match (present(continuous_assessment), present(practical_work)) {
        (Some(cc), Some(tp)) => 0.3 * cc + 0.2 * tp + 0.5 * exam,
        (Some(single), None) | (None, Some(single)) => 0.4 * single + 0.6 * exam,
        (None, None) => exam,
    }
}

/// Aggregates entries into the general average and pass/danger counts.
///
/// Only entries with a numeric, non-negative coefficient take part in the
/// general average; the counts cover every entry. Subjects averaging in
/// `[8, 10)` are counted in neither.
pub fn aggregate(entries: &[GradeEntry]) -> Aggregate {
    let mut weighted_total = 0.0;
    let mut weight_sum = 0.0;
    let mut validated_count = 0;
    let mut danger_count = 0;

    for entry in entries {
        let average = entry.average();

        if let Some(coefficient) = present(Some(entry.coefficient)).filter(|c| *c >= 0.0) {
            weighted_total += average * coefficient;
            weight_sum += coefficient;
        }

        if average >= PASS_THRESHOLD {
            validated_count += 1;
        }
        if average < DANGER_THRESHOLD {
            danger_count += 1;
        }
    }

    let general_average = if weight_sum == 0.0 {
        0.0
    } else {
        weighted_total / weight_sum
    };

    Aggregate {
        general_average,
        validated_count,
        danger_count,
    }
}
