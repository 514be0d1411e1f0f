use crate::model::audit::AuditValues;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit record of one generation event.
///
/// `template_name` is filled from a join and is `None` when the source
/// template no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedDocument {
    pub id: i64,
    pub template_id: i64,
    pub template_name: Option<String>,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub meta: AuditValues,
}
