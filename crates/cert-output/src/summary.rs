use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use cert_model::{EligibleAttendee, SummaryFormat};

use crate::error::{OutputError, Result};
use crate::xlsx::write_workbook;

pub const SUMMARY_FILE_STEM: &str = "eligible_attendees";

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// `<root>/eligible_attendees.<ext>`.
pub fn summary_path(root: &Path, format: SummaryFormat) -> PathBuf {
    root.join(format!("{SUMMARY_FILE_STEM}.{}", format.extension()))
}

/// Write the eligible attendees to `path`, creating parent directories.
pub fn write_summary(
    path: &Path,
    attendees: &[EligibleAttendee],
    format: SummaryFormat,
) -> Result<PathBuf> {
    if attendees.is_empty() {
        return Err(OutputError::NoRows);
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| OutputError::io(parent, err))?;
    }

    match format {
        SummaryFormat::Xlsx => write_workbook(path, attendees)?,
        SummaryFormat::Csv => write_csv(path, attendees)?,
    }
    info!(
        path = %path.display(),
        format = %format,
        rows = attendees.len(),
        "summary written"
    );
    Ok(path.to_path_buf())
}

/// UTF-8 with a byte-order mark so spreadsheet tools pick the right encoding.
fn write_csv(path: &Path, attendees: &[EligibleAttendee]) -> Result<()> {
    let file = File::create(path).map_err(|err| OutputError::io(path, err))?;
    let mut out = BufWriter::new(file);
    out.write_all(UTF8_BOM)
        .map_err(|err| OutputError::io(path, err))?;

    let mut writer = csv::Writer::from_writer(out);
    for attendee in attendees {
        writer.serialize(attendee).map_err(|source| OutputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    }
    writer.flush().map_err(|err| OutputError::io(path, err))?;
    Ok(())
}
