use std::collections::{BTreeMap, HashSet};

pub const REDACTED: &str = "[REDACTED]";

/// Header-style field map. Keys are case-sensitive and kept in sorted order so
/// exports are stable.
pub type FieldMap = BTreeMap<String, String>;

/// Set of field names whose values must never be displayed or exported.
/// Matching is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionPolicy {
    blocked: HashSet<String>,
}

impl RedactionPolicy {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            blocked: names
                .into_iter()
                .map(|name| name.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn is_blocked(&self, name: &str) -> bool {
        self.blocked.contains(&name.to_ascii_lowercase())
    }

    /// Returns a copy of `fields` with blocked values replaced by [`REDACTED`].
    pub fn apply(&self, fields: &FieldMap) -> FieldMap {
        fields
            .iter()
            .map(|(key, value)| {
                let value = if self.is_blocked(key) {
                    REDACTED.to_string()
                } else {
                    value.clone()
                };
                (key.clone(), value)
            })
            .collect()
    }
}
