use std::collections::BTreeMap;

use serde::Serialize;

/// One data row of the attendee-detail section, keyed by header cell.
///
/// When the header repeats a column name the later cell wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAttendeeRecord {
    fields: BTreeMap<String, String>,
}

impl RawAttendeeRecord {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Raw cell value for a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Trimmed cell value, empty when the column is absent.
    pub fn field(&self, column: &str) -> &str {
        self.get(column).map(str::trim).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawAttendeeRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut fields = BTreeMap::new();
        for (key, value) in iter {
            fields.insert(key.into(), value.into());
        }
        Self { fields }
    }
}

/// An attendee that passed the eligibility rules.
///
/// Serialized field names follow the export vocabulary so the summary
/// spreadsheet reads like the source data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibleAttendee {
    #[serde(rename = "名字")]
    pub first_name: String,
    #[serde(rename = "姓氏")]
    pub last_name: String,
    #[serde(rename = "電子郵件地址")]
    pub email: String,
    #[serde(rename = "出席時間（分鐘）")]
    pub duration_minutes: u64,
    #[serde(rename = "Specialty")]
    pub specialty: String,
    #[serde(rename = "國家/地區名稱")]
    pub country: String,
    /// 1-based reference number in first-qualification order.
    #[serde(rename = "ref")]
    pub reference: usize,
}

impl EligibleAttendee {
    /// Display name used in summaries and logs.
    pub fn display_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => self.email.clone(),
        }
    }
}
