//! Output formatting for analysis reports

pub mod formatter;

pub use formatter::{BatchEntry, ReportGenerator};
