//! Summary spreadsheet of the eligible attendees.
//!
//! The summary mirrors the filter output row for row, using the export's own
//! column names plus a `ref` column.

mod error;
mod summary;
mod xlsx;

pub use error::{OutputError, Result};
pub use summary::{SUMMARY_FILE_STEM, summary_path, write_summary};
