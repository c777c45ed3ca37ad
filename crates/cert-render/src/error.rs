//! Error types for certificate rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while rendering certificates.
///
/// Apart from [`RenderError::OutputDirectory`], every variant is scoped to a
/// single attendee: the batch records it and moves on.
#[derive(Debug, Error)]
pub enum RenderError {
    /// One or more placeholder tokens never appeared in the template text.
    #[error("missing placeholders in template: {}", .missing.join(", "))]
    TemplateMismatch { missing: Vec<String> },

    /// Failed to open or read the template package.
    #[error("failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template is not a readable word-processing package.
    #[error("malformed template {path}: {reason}")]
    MalformedTemplate { path: PathBuf, reason: String },

    /// The package has no main document part.
    #[error("template {path} has no {part} part")]
    MissingDocumentPart { path: PathBuf, part: &'static str },

    /// Failed to create the output directory.
    #[error("failed to create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a rendered certificate.
    #[error("failed to write certificate {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl RenderError {
    pub(crate) fn malformed(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        Self::MalformedTemplate {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: &std::path::Path, message: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// True when the template itself needs fixing, as opposed to an I/O problem.
    pub fn is_template_problem(&self) -> bool {
        matches!(
            self,
            Self::TemplateMismatch { .. }
                | Self::MalformedTemplate { .. }
                | Self::MissingDocumentPart { .. }
        )
    }
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_lists_every_missing_token() {
        let err = RenderError::TemplateMismatch {
            missing: vec!["<<last_name>>".to_string(), "<<ref>>".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing placeholders in template: <<last_name>>, <<ref>>"
        );
        assert!(err.is_template_problem());
    }

    #[test]
    fn write_failures_are_not_template_problems() {
        let err = RenderError::write(std::path::Path::new("out/01_A_B.docx"), "disk full");
        assert!(!err.is_template_problem());
        assert_eq!(
            err.to_string(),
            "failed to write certificate out/01_A_B.docx: disk full"
        );
    }
}
