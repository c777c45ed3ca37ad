//! Certificate rendering.
//!
//! A certificate template is a word-processing (`.docx`) package whose main
//! document contains literal placeholder tokens. For every eligible attendee
//! the template is loaded fresh from disk, the tokens are substituted
//! paragraph by paragraph and the result is written as a new package.
//!
//! Substitution rebuilds a paragraph from its concatenated run text and
//! writes the new text into the first run, so character formatting of the
//! other runs in that paragraph is lost. Paragraphs without a token keep
//! their runs untouched.

mod document;
mod error;
mod normalize;
mod package;
mod renderer;
mod xml;

pub use document::WordDocument;
pub use error::{RenderError, Result};
pub use normalize::{
    certificate_file_name, normalize_attendee_names, normalize_first_name, normalize_last_name,
    sequence_label,
};
pub use package::{MAIN_DOCUMENT_PART, Template};
pub use renderer::{CertificateOutcome, RenderOptions, RenderReport, render_certificates};
