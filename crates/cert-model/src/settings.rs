//! User-tunable settings.
//!
//! Every field defaults to the values the attendance export and the stock
//! certificate template were built around, so an empty settings file is a
//! valid one.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::placeholder::PlaceholderTokens;

pub const DEFAULT_SPECIALTY: &str = "Nurse/Midwife";
pub const DEFAULT_COUNTRY: &str = "香港特別行政區";
pub const DEFAULT_MIN_DURATION_MINUTES: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub eligibility: EligibilityRules,
    pub output: OutputSettings,
    pub placeholders: PlaceholderTokens,
}

/// Who qualifies for a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityRules {
    pub specialty: String,
    pub country: String,
    /// Inclusive lower bound on total attendance.
    pub min_duration_minutes: u64,
}

impl Default for EligibilityRules {
    fn default() -> Self {
        Self {
            specialty: DEFAULT_SPECIALTY.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            min_duration_minutes: DEFAULT_MIN_DURATION_MINUTES,
        }
    }
}

impl EligibilityRules {
    /// Specialty and country gate, applied to trimmed values.
    pub fn matches_profile(&self, specialty: &str, country: &str) -> bool {
        specialty == self.specialty && country == self.country
    }

    pub fn meets_duration(&self, minutes: u64) -> bool {
        minutes >= self.min_duration_minutes
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Root folder for the summary and the certificates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    pub summary_format: SummaryFormat,
}

/// File format of the eligible-attendee summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    #[default]
    Xlsx,
    Csv,
}

impl SummaryFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [eligibility]
            min_duration_minutes = 45

            [output]
            summary_format = "csv"
            "#,
        )
        .expect("parse settings");
        assert_eq!(settings.eligibility.min_duration_minutes, 45);
        assert_eq!(settings.eligibility.specialty, DEFAULT_SPECIALTY);
        assert_eq!(settings.output.summary_format, SummaryFormat::Csv);
        assert!(settings.output.root.is_none());
        assert_eq!(settings.placeholders, PlaceholderTokens::default());
    }

    #[test]
    fn duration_bound_is_inclusive() {
        let rules = EligibilityRules::default();
        assert!(!rules.meets_duration(29));
        assert!(rules.meets_duration(30));
    }

    #[test]
    fn profile_match_is_exact() {
        let rules = EligibilityRules::default();
        assert!(rules.matches_profile("Nurse/Midwife", "香港特別行政區"));
        assert!(!rules.matches_profile("nurse/midwife", "香港特別行政區"));
        assert!(!rules.matches_profile("Nurse/Midwife", "澳門特別行政區"));
    }
}
