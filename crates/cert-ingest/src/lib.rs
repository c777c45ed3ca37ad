//! Attendance export ingestion.
//!
//! The webinar platform exports a single CSV with several unrelated summary
//! blocks stacked on top of each other. Only the attendee-detail block is of
//! interest: it starts at a marker row, continues with its own header row and
//! runs to the end of the file.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cert_ingest::parse_attendance;
//!
//! let records = parse_attendance(Path::new("attendance.csv"))?;
//! if records.is_empty() {
//!     // section or header row missing: nothing to certify
//! }
//! ```

mod attendance;
mod error;

pub use attendance::{parse_attendance, validate_encoding};
pub use error::{IngestError, Result};
