use crate::model::template::DocumentTemplate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    pub templates: Vec<DocumentTemplate>,
    pub generated_count: i64,
    pub today_count: i64,
}
