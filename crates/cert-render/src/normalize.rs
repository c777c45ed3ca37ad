//! Name normalization and output naming.

use cert_model::EligibleAttendee;

/// Capitalize every whitespace-separated word and join with single spaces.
pub fn normalize_first_name(value: &str) -> String {
    value
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize_last_name(value: &str) -> String {
    value.to_uppercase()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut word: String = first.to_uppercase().collect();
            word.push_str(&chars.as_str().to_lowercase());
            word
        }
        None => String::new(),
    }
}

/// Normalize the names of every attendee in place.
pub fn normalize_attendee_names(attendees: &mut [EligibleAttendee]) {
    for attendee in attendees {
        attendee.first_name = normalize_first_name(&attendee.first_name);
        attendee.last_name = normalize_last_name(&attendee.last_name);
    }
}

/// Sequence string for a 0-based list position: `0 -> "01"`.
pub fn sequence_label(index: usize) -> String {
    format!("{:02}", index + 1)
}

/// `<sequence>_<first>_<last>.docx`.
///
/// Path separators and control characters in the names are replaced with
/// `_` so the file always lands in the output directory.
pub fn certificate_file_name(sequence: &str, first_name: &str, last_name: &str) -> String {
    format!(
        "{sequence}_{}_{}.docx",
        file_name_safe(first_name),
        file_name_safe(last_name)
    )
}

fn file_name_safe(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '/' | '\\' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect()
}
