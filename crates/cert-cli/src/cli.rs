//! CLI argument definitions for the certificate generator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use cert_model::SummaryFormat;

#[derive(Parser)]
#[command(
    name = "certgen",
    version,
    about = "Generate attendance certificates from a webinar attendance export",
    long_about = "Generate attendance certificates from a webinar attendance export.\n\n\
                  Reads the attendee-detail section of the export, keeps the attendees\n\
                  matching the configured specialty, country and minimum attendance,\n\
                  writes a summary spreadsheet and renders one .docx certificate each."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file to use instead of the one in the platform config directory.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Filter the attendance export and render certificates.
    Generate(GenerateArgs),

    /// Report which placeholders a template contains.
    CheckTemplate(CheckTemplateArgs),

    /// Print the effective settings and where they were loaded from.
    Config,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Attendance export (CSV, UTF-8 with or without BOM).
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Certificate template (.docx) containing the placeholders.
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Root folder for the summary and the certificates (default: <Downloads>/certs).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Summary spreadsheet format.
    #[arg(long = "summary-format", value_enum)]
    pub summary_format: Option<SummaryFormatArg>,

    /// Minimum total attendance in minutes (inclusive).
    #[arg(long = "min-duration", value_name = "MINUTES")]
    pub min_duration: Option<u64>,

    /// List eligible attendees without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CheckTemplateArgs {
    /// Certificate template (.docx) to inspect.
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SummaryFormatArg {
    Xlsx,
    Csv,
}

impl From<SummaryFormatArg> for SummaryFormat {
    fn from(value: SummaryFormatArg) -> Self {
        match value {
            SummaryFormatArg::Xlsx => SummaryFormat::Xlsx,
            SummaryFormatArg::Csv => SummaryFormat::Csv,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
