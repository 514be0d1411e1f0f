//! Variable values recorded alongside every generated document.
//!
//! The values are persisted as a JSON object mapping variable names to the
//! strings that were submitted. Keys are kept sorted so that the stored text
//! for the same submission is always identical, and non-ASCII text is written
//! as-is rather than escaped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AuditValues(BTreeMap<String, String>);

impl AuditValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes the values as a JSON object.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Decodes a stored JSON object. Anything that is not an object of
    /// strings is rejected.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw).map(Self)
    }
}

impl From<HashMap<String, String>> for AuditValues {
    fn from(values: HashMap<String, String>) -> Self {
        Self(values.into_iter().collect())
    }
}

impl FromIterator<(String, String)> for AuditValues {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
