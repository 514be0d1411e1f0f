use serde::{Deserialize, Serialize};

/// Variables a template asks for, in the order they should be prompted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateVariables {
    pub template_id: i64,
    pub variables: Vec<String>,
}
