pub mod attendee;
pub mod columns;
pub mod placeholder;
pub mod settings;

pub use attendee::{EligibleAttendee, RawAttendeeRecord};
pub use placeholder::{PlaceholderMap, PlaceholderTokens};
pub use settings::{EligibilityRules, OutputSettings, Settings, SummaryFormat};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_lookup_uses_export_vocabulary() {
        let record = RawAttendeeRecord::from_pairs([
            (columns::EMAIL, " mary@example.org "),
            (columns::DURATION_MINUTES, "42"),
        ]);
        assert_eq!(record.field(columns::EMAIL), "mary@example.org");
        assert_eq!(record.get(columns::DURATION_MINUTES), Some("42"));
        assert_eq!(record.field(columns::SPECIALTY), "");
    }

    #[test]
    fn default_settings_carry_fixed_rules() {
        let settings = Settings::default();
        assert_eq!(settings.eligibility.specialty, "Nurse/Midwife");
        assert_eq!(settings.eligibility.country, "香港特別行政區");
        assert_eq!(settings.eligibility.min_duration_minutes, 30);
        assert_eq!(settings.output.summary_format, SummaryFormat::Xlsx);
        assert_eq!(settings.placeholders.first_name, "<<first_name>>");
    }
}
