//! Section-scoped reader for the attendee-detail block.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info, warn};

use cert_model::RawAttendeeRecord;
use cert_model::columns::{HEADER_ATTENDED_MARKER, HEADER_USERNAME_MARKER, SECTION_MARKER};

use crate::error::{IngestError, Result};

const UTF8_BOM: char = '\u{feff}';

/// Read the attendee-detail block of an attendance export.
///
/// Returns an empty list when the section marker or the header row is never
/// found. Data rows shorter than the header are skipped with a warning.
pub fn parse_attendance(path: &Path) -> Result<Vec<RawAttendeeRecord>> {
    validate_encoding(path)?;
    let file = File::open(path).map_err(|e| IngestError::open(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut scanner = SectionScanner::default();
    let mut first = true;
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let line = record.position().map_or(0, csv::Position::line);
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        if first {
            if let Some(cell) = row.first_mut() {
                *cell = cell.trim_start_matches(UTF8_BOM).to_string();
            }
            first = false;
        }
        scanner.push_row(row, line);
    }

    let outcome = scanner.finish();
    if !outcome.section_found {
        info!(path = %path.display(), "attendee-detail section not found");
    } else if !outcome.header_found {
        info!(path = %path.display(), "attendee-detail header row not found");
    }
    info!(
        path = %path.display(),
        records = outcome.records.len(),
        malformed_rows = outcome.malformed_rows,
        "attendance parsed"
    );
    Ok(outcome.records)
}

/// Reject files that carry a UTF-16 byte-order mark.
///
/// A UTF-8 BOM is accepted and stripped while parsing.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| IngestError::open(path, e))?;
    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    if bytes_read == 2 {
        let encoding = match buffer {
            [0xFF, 0xFE] => Some("UTF-16 LE"),
            [0xFE, 0xFF] => Some("UTF-16 BE"),
            _ => None,
        };
        if let Some(encoding) = encoding {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding,
            });
        }
    }
    Ok(())
}

struct ScanOutcome {
    records: Vec<RawAttendeeRecord>,
    section_found: bool,
    header_found: bool,
    malformed_rows: usize,
}

/// Row-at-a-time state machine over the export.
///
/// The checks run in a fixed order for every row: marker row, header row,
/// data row. A marker row seen again inside the block is skipped, and a
/// second header row replaces the first.
#[derive(Debug, Default)]
struct SectionScanner {
    section_found: bool,
    headers: Option<Vec<String>>,
    records: Vec<RawAttendeeRecord>,
    malformed_rows: usize,
}

impl SectionScanner {
    fn push_row(&mut self, row: Vec<String>, line: u64) {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            return;
        }
        let first = row.first().map(String::as_str).unwrap_or("");
        if first.contains(SECTION_MARKER) {
            debug!(line, "attendee-detail section marker");
            self.section_found = true;
            return;
        }
        if !self.section_found {
            return;
        }
        if is_header_row(&row) {
            debug!(line, columns = row.len(), "attendee-detail header row");
            self.headers = Some(row);
            return;
        }
        let Some(headers) = &self.headers else {
            return;
        };
        if row.len() < headers.len() {
            warn!(
                line,
                cells = row.len(),
                expected = headers.len(),
                "skipping incomplete attendee row"
            );
            self.malformed_rows += 1;
            return;
        }
        let record = headers
            .iter()
            .zip(row)
            .map(|(header, value)| (header.clone(), value))
            .collect();
        self.records.push(record);
    }

    fn finish(self) -> ScanOutcome {
        ScanOutcome {
            section_found: self.section_found,
            header_found: self.headers.is_some(),
            records: self.records,
            malformed_rows: self.malformed_rows,
        }
    }
}

fn is_header_row(row: &[String]) -> bool {
    let attended = row
        .first()
        .is_some_and(|cell| cell.contains(HEADER_ATTENDED_MARKER));
    let username = row
        .get(1)
        .is_some_and(|cell| cell.contains(HEADER_USERNAME_MARKER));
    attended && username
}
