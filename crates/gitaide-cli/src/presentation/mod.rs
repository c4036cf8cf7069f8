//! Shared CLI presentation utilities.
//!
//! Format-only: values come in ready to print.

pub mod report;
pub mod tables;

pub use report::{StandupReport, write_report};
pub use tables::{format_optional, print_separator, print_tool_row, truncate_string};
