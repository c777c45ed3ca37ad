//! Attendee aggregation and eligibility filtering.
//!
//! Rows of the attendance export are merged by email address, checked
//! against the [`EligibilityRules`](cert_model::EligibilityRules) and
//! numbered in the order attendees first qualify.

pub mod eligibility;

pub use eligibility::{FilterStats, filter_attendees, filter_attendees_with_stats, parse_duration};
