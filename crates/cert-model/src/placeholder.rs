//! Placeholder tokens and the per-attendee substitution map.

use serde::{Deserialize, Serialize};

pub const DEFAULT_FIRST_NAME_TOKEN: &str = "<<first_name>>";
pub const DEFAULT_LAST_NAME_TOKEN: &str = "<<last_name>>";
pub const DEFAULT_REFERENCE_TOKEN: &str = "<<ref>>";

/// The literal markers a certificate template is expected to contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderTokens {
    pub first_name: String,
    pub last_name: String,
    pub reference: String,
}

impl Default for PlaceholderTokens {
    fn default() -> Self {
        Self {
            first_name: DEFAULT_FIRST_NAME_TOKEN.to_string(),
            last_name: DEFAULT_LAST_NAME_TOKEN.to_string(),
            reference: DEFAULT_REFERENCE_TOKEN.to_string(),
        }
    }
}

impl PlaceholderTokens {
    /// Tokens in substitution order.
    pub fn all(&self) -> [&str; 3] {
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.reference.as_str(),
        ]
    }

    /// Build the substitution map for one attendee.
    pub fn build(&self, first_name: &str, last_name: &str, reference: &str) -> PlaceholderMap {
        let mut map = PlaceholderMap::new();
        map.insert(&self.first_name, first_name);
        map.insert(&self.last_name, last_name);
        map.insert(&self.reference, reference);
        map
    }
}

/// Ordered token to value mapping.
///
/// Substitution walks the entries in insertion order, so a value that happens
/// to contain a later token is substituted again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, replacing the value in place if the token already exists.
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        let token = token.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == token) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((token, value)),
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == token)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(token, value)| (token.as_str(), value.as_str()))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(token, _)| token.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
