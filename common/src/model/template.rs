use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored document template.
///
/// `template_text` holds the body with `{{ variable }}` placeholders. The
/// placeholders are not stored separately; the backend extracts them from the
/// body whenever it needs to prompt for values or validate a submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentTemplate {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub template_text: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Payload used to create or edit a template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub template_text: String,
}

impl TemplateDraft {
    /// Checks the required fields.
    ///
    /// Returns the list of offending field names so the caller can report all
    /// of them at once.
    pub fn validate(&self) -> Result<(), Vec<&'static str>> {
        let mut invalid = Vec::new();
        if self.name.trim().is_empty() {
            invalid.push("name");
        }
        if self.template_text.trim().is_empty() {
            invalid.push("template_text");
        }
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(invalid)
        }
    }
}
