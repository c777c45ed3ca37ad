//! Batch rendering of certificates.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use cert_model::{EligibleAttendee, PlaceholderTokens};

use crate::error::{RenderError, Result};
use crate::normalize::{certificate_file_name, normalize_attendee_names, sequence_label};
use crate::package::Template;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Directory receiving one `.docx` per attendee; created when absent.
    pub output_dir: PathBuf,
    pub tokens: PlaceholderTokens,
}

impl RenderOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            tokens: PlaceholderTokens::default(),
        }
    }
}

/// Result of rendering one attendee.
#[derive(Debug)]
pub struct CertificateOutcome {
    pub sequence: String,
    pub email: String,
    pub result: Result<PathBuf>,
}

#[derive(Debug, Default)]
pub struct RenderReport {
    /// One entry per attendee, in list order.
    pub outcomes: Vec<CertificateOutcome>,
}

impl RenderReport {
    pub fn written_paths(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .map(PathBuf::as_path)
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&CertificateOutcome, &RenderError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (outcome, err)))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Render one certificate per attendee.
///
/// Names are normalized in place first. Only a failure to create the output
/// directory aborts the batch; every other error is recorded against the
/// attendee and rendering moves on.
pub fn render_certificates(
    template_path: &Path,
    attendees: &mut [EligibleAttendee],
    options: &RenderOptions,
) -> Result<RenderReport> {
    let start = Instant::now();
    normalize_attendee_names(attendees);
    fs::create_dir_all(&options.output_dir).map_err(|source| RenderError::OutputDirectory {
        path: options.output_dir.clone(),
        source,
    })?;

    let mut report = RenderReport::default();
    for (index, attendee) in attendees.iter().enumerate() {
        let sequence = sequence_label(index);
        let result = render_one(template_path, attendee, &sequence, options);
        match &result {
            Ok(path) => debug!(
                sequence = %sequence,
                first_name = %attendee.first_name,
                last_name = %attendee.last_name,
                path = %path.display(),
                "certificate written"
            ),
            Err(err) => warn!(
                email = %attendee.email,
                error = %err,
                "skipping attendee: certificate not rendered"
            ),
        }
        report.outcomes.push(CertificateOutcome {
            sequence,
            email: attendee.email.clone(),
            result,
        });
    }

    info!(
        attendees = attendees.len(),
        written = report.written_paths().len(),
        failed = report.failure_count(),
        output_dir = %options.output_dir.display(),
        duration_ms = start.elapsed().as_millis(),
        "certificate rendering complete"
    );
    Ok(report)
}

fn render_one(
    template_path: &Path,
    attendee: &EligibleAttendee,
    sequence: &str,
    options: &RenderOptions,
) -> Result<PathBuf> {
    let mut template = Template::load(template_path)?;
    let map = options
        .tokens
        .build(&attendee.first_name, &attendee.last_name, sequence);
    template.document_mut().replace_placeholders(&map)?;

    let path = options.output_dir.join(certificate_file_name(
        sequence,
        &attendee.first_name,
        &attendee.last_name,
    ));
    template.save(&path)?;
    Ok(path)
}
