use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of the Excellent band.
pub const EXCELLENT_THRESHOLD: f64 = 16.0;
/// Lower bound of a validated (passed) subject.
pub const PASS_THRESHOLD: f64 = 10.0;
/// Averages below this are in danger.
pub const DANGER_THRESHOLD: f64 = 8.0;

/// Standing of an average on the /20 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Excellent,
    Good,
    Warning,
    Danger,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Excellent => "Excellent",
            Status::Good => "Good",
            Status::Warning => "Warning",
            Status::Danger => "Danger",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies an average into a [`Status`].
///
/// | Range        | Status    |
/// |--------------|-----------|
/// | >= 16        | Excellent |
/// | >= 10        | Good      |
/// | >= 8         | Warning   |
/// | < 8 (or NaN) | Danger    |
pub fn classify(average: f64) -> Status {
    match average {
        a if a >= EXCELLENT_THRESHOLD => Status::Excellent,
        a if a >= PASS_THRESHOLD => Status::Good,
        a if a >= DANGER_THRESHOLD => Status::Warning,
        _ => Status::Danger,
    }
}
