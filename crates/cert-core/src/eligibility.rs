//! Identity aggregation and eligibility rules.
//!
//! Merge policy is "create on first match, accumulate on repeat":
//!
//! - the first usable row seen for an email decides whether that attendee is
//!   tracked at all, using its specialty and country;
//! - every later usable row for a tracked email adds its duration, whatever
//!   its own specialty and country say;
//! - once the first row for an email failed the profile check, later rows for
//!   that email are dropped, even when they would match.
//!
//! The last point silently loses attendance from attendees whose first row
//! carried different profile data; [`FilterStats::gated_rows`] counts those
//! rows.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use cert_model::columns::{COUNTRY, DURATION_MINUTES, EMAIL, FIRST_NAME, LAST_NAME, SPECIALTY};
use cert_model::{EligibilityRules, EligibleAttendee, RawAttendeeRecord};

/// Row and attendee counts collected while filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub rows: usize,
    /// Rows without an email or with a non-integer duration.
    pub unusable_rows: usize,
    /// Rows dropped because the attendee's first row failed the profile check.
    pub gated_rows: usize,
    /// Tracked attendees whose total duration stayed below the minimum.
    pub below_minimum: usize,
    pub eligible: usize,
}

/// Aggregate attendance rows and keep the attendees that qualify.
///
/// Output order is first-occurrence order; reference numbers run 1..N.
pub fn filter_attendees(
    records: &[RawAttendeeRecord],
    rules: &EligibilityRules,
) -> Vec<EligibleAttendee> {
    filter_attendees_with_stats(records, rules).0
}

pub fn filter_attendees_with_stats(
    records: &[RawAttendeeRecord],
    rules: &EligibilityRules,
) -> (Vec<EligibleAttendee>, FilterStats) {
    let mut stats = FilterStats {
        rows: records.len(),
        ..FilterStats::default()
    };
    let mut tracked: Vec<EligibleAttendee> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut gated: HashSet<String> = HashSet::new();

    for (row, record) in records.iter().enumerate() {
        let email = record.field(EMAIL);
        let duration = parse_duration(record.field(DURATION_MINUTES));
        let Some(duration) = duration.filter(|_| !email.is_empty()) else {
            debug!(row, "skipping row without email or integer duration");
            stats.unusable_rows += 1;
            continue;
        };

        if let Some(&position) = positions.get(email) {
            let attendee = &mut tracked[position];
            attendee.duration_minutes = attendee.duration_minutes.saturating_add(duration);
            continue;
        }
        if gated.contains(email) {
            stats.gated_rows += 1;
            continue;
        }

        let specialty = record.field(SPECIALTY);
        let country = record.field(COUNTRY);
        if !rules.matches_profile(specialty, country) {
            debug!(row, "first row for attendee fails specialty/country check");
            gated.insert(email.to_string());
            stats.gated_rows += 1;
            continue;
        }

        positions.insert(email.to_string(), tracked.len());
        tracked.push(EligibleAttendee {
            first_name: record.field(FIRST_NAME).to_string(),
            last_name: record.field(LAST_NAME).to_string(),
            email: email.to_string(),
            duration_minutes: duration,
            specialty: specialty.to_string(),
            country: country.to_string(),
            reference: 0,
        });
    }

    let tracked_count = tracked.len();
    let mut eligible: Vec<EligibleAttendee> = tracked
        .into_iter()
        .filter(|attendee| rules.meets_duration(attendee.duration_minutes))
        .collect();
    for (index, attendee) in eligible.iter_mut().enumerate() {
        attendee.reference = index + 1;
    }

    stats.below_minimum = tracked_count - eligible.len();
    stats.eligible = eligible.len();
    info!(
        rows = stats.rows,
        unusable_rows = stats.unusable_rows,
        gated_rows = stats.gated_rows,
        below_minimum = stats.below_minimum,
        eligible = stats.eligible,
        min_duration_minutes = rules.min_duration_minutes,
        "eligibility filter complete"
    );
    (eligible, stats)
}

/// Parse a duration cell: a non-empty run of ASCII digits.
///
/// Signs, decimals, whitespace inside the value and values that overflow
/// `u64` are rejected.
pub fn parse_duration(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_accepts_plain_digits_only() {
        assert_eq!(parse_duration("0"), Some(0));
        assert_eq!(parse_duration("045"), Some(45));
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("-5"), None);
        assert_eq!(parse_duration("+5"), None);
        assert_eq!(parse_duration("12.5"), None);
        assert_eq!(parse_duration("1 2"), None);
        assert_eq!(parse_duration("３０"), None);
        assert_eq!(parse_duration("99999999999999999999999"), None);
    }
}
