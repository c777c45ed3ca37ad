//! The generate pipeline: parse, filter, summary, render.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{info, info_span};

use cert_core::filter_attendees_with_stats;
use cert_ingest::parse_attendance;
use cert_model::{EligibilityRules, PlaceholderTokens, SummaryFormat};
use cert_output::{summary_path, write_summary};
use cert_render::{RenderOptions, Template, render_certificates};

use crate::types::{AttendeeSummary, CertificateStatus, RunResult, TemplateCheck};

/// Sub-folder of the output root receiving the certificates.
pub const CERTIFICATE_DIR: &str = "docx";

/// Conditions that end a run before any certificate is attempted.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no attendee data in {}: attendee section or header row not found", .path.display())]
    NoAttendeeData { path: PathBuf },

    #[error("no eligible attendees among {records} attendance rows")]
    NoEligibleAttendees { records: usize },
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub csv_path: PathBuf,
    pub template_path: PathBuf,
    pub output_root: PathBuf,
    pub summary_format: SummaryFormat,
    pub rules: EligibilityRules,
    pub tokens: PlaceholderTokens,
    /// Stop after filtering without writing anything.
    pub dry_run: bool,
}

impl PipelineOptions {
    pub fn certificate_dir(&self) -> PathBuf {
        self.output_root.join(CERTIFICATE_DIR)
    }
}

pub fn run_pipeline(options: &PipelineOptions) -> Result<RunResult> {
    let run_span = info_span!("generate", csv = %options.csv_path.display());
    let _run_guard = run_span.enter();
    let run_start = Instant::now();

    let records = info_span!("parse").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let records = parse_attendance(&options.csv_path)
            .with_context(|| format!("parse {}", options.csv_path.display()))?;
        info!(
            records = records.len(),
            duration_ms = start.elapsed().as_millis(),
            "parse complete"
        );
        Ok(records)
    })?;
    if records.is_empty() {
        return Err(PipelineError::NoAttendeeData {
            path: options.csv_path.clone(),
        }
        .into());
    }

    let (mut eligible, stats) = info_span!("filter")
        .in_scope(|| filter_attendees_with_stats(&records, &options.rules));
    if eligible.is_empty() {
        return Err(PipelineError::NoEligibleAttendees {
            records: records.len(),
        }
        .into());
    }

    let mut result = RunResult {
        csv_path: options.csv_path.clone(),
        output_root: options.output_root.clone(),
        certificate_dir: options.certificate_dir(),
        summary_path: None,
        records: records.len(),
        stats,
        attendees: Vec::new(),
        dry_run: options.dry_run,
    };

    if options.dry_run {
        result.attendees = eligible
            .iter()
            .map(|attendee| AttendeeSummary {
                reference: attendee.reference,
                name: attendee.display_name(),
                email: attendee.email.clone(),
                duration_minutes: attendee.duration_minutes,
                certificate: CertificateStatus::Skipped,
            })
            .collect();
        info!(
            eligible = eligible.len(),
            duration_ms = run_start.elapsed().as_millis(),
            "dry run complete"
        );
        return Ok(result);
    }

    let summary = info_span!("summary").in_scope(|| {
        let path = summary_path(&options.output_root, options.summary_format);
        write_summary(&path, &eligible, options.summary_format)
            .with_context(|| format!("write summary {}", path.display()))
    })?;
    result.summary_path = Some(summary);

    let render_options = RenderOptions {
        output_dir: options.certificate_dir(),
        tokens: options.tokens.clone(),
    };
    let report = info_span!("render")
        .in_scope(|| render_certificates(&options.template_path, &mut eligible, &render_options))
        .context("render certificates")?;

    result.attendees = eligible
        .iter()
        .zip(report.outcomes)
        .map(|(attendee, outcome)| AttendeeSummary {
            reference: attendee.reference,
            name: attendee.display_name(),
            email: attendee.email.clone(),
            duration_minutes: attendee.duration_minutes,
            certificate: match outcome.result {
                Ok(path) => CertificateStatus::Written(path),
                Err(err) => CertificateStatus::Failed(err.to_string()),
            },
        })
        .collect();

    info!(
        eligible = result.attendees.len(),
        written = result.written_count(),
        failed = result.failed_count(),
        duration_ms = run_start.elapsed().as_millis(),
        "generate complete"
    );
    Ok(result)
}

/// Report which placeholder tokens a template contains.
pub fn check_template(template_path: &Path, tokens: &PlaceholderTokens) -> Result<TemplateCheck> {
    let template = Template::load(template_path)
        .with_context(|| format!("load template {}", template_path.display()))?;
    let map = tokens.build("", "", "");
    let present: Vec<String> = template
        .document()
        .tokens_present(&map)
        .into_iter()
        .map(str::to_string)
        .collect();
    let missing = tokens
        .all()
        .into_iter()
        .filter(|token| !present.iter().any(|found| found == token))
        .map(str::to_string)
        .collect();
    Ok(TemplateCheck {
        template_path: template_path.to_path_buf(),
        present,
        missing,
    })
}
