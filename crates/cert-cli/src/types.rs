use std::path::PathBuf;

use cert_core::FilterStats;

#[derive(Debug)]
pub struct RunResult {
    pub csv_path: PathBuf,
    pub output_root: PathBuf,
    pub certificate_dir: PathBuf,
    /// `None` on a dry run.
    pub summary_path: Option<PathBuf>,
    pub records: usize,
    pub stats: FilterStats,
    pub attendees: Vec<AttendeeSummary>,
    pub dry_run: bool,
}

impl RunResult {
    pub fn written_count(&self) -> usize {
        self.attendees
            .iter()
            .filter(|attendee| matches!(attendee.certificate, CertificateStatus::Written(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.attendees
            .iter()
            .filter(|attendee| matches!(attendee.certificate, CertificateStatus::Failed(_)))
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.failed_count() > 0
    }
}

#[derive(Debug)]
pub struct AttendeeSummary {
    pub reference: usize,
    pub name: String,
    pub email: String,
    pub duration_minutes: u64,
    pub certificate: CertificateStatus,
}

#[derive(Debug)]
pub enum CertificateStatus {
    Written(PathBuf),
    Failed(String),
    /// Not rendered because the run was a dry run.
    Skipped,
}

/// Placeholder coverage of a template.
#[derive(Debug)]
pub struct TemplateCheck {
    pub template_path: PathBuf,
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

impl TemplateCheck {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
