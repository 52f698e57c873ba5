//! Subject grades on a /20 scale, their coefficient-weighted general average,
//! and the CLI/TUI front ends that record and display them.

pub mod config;
pub mod gradebook;
pub mod grading;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod stderr_buffer;
pub mod tui;
