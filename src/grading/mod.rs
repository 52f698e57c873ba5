//! Grade computation: subject averages, the weighted general average and
//! status classification. Pure functions only; no I/O and no state.

pub mod engine;
pub mod entry;
pub mod mark;
pub mod status;

pub use engine::{aggregate, subject_average, Aggregate};
pub use entry::GradeEntry;
pub use status::{classify, Status};
