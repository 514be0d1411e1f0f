use crate::pipeline::variables::is_variable_name;
use std::collections::HashMap;
use thiserror::Error;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Syntax problems found while rendering a template body.
///
/// Offsets are byte positions of the offending `{{` in the body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("unclosed placeholder at position {offset}")]
    Unclosed { offset: usize },
    #[error("invalid placeholder `{expression}` at position {offset}")]
    InvalidExpression { offset: usize, expression: String },
}

/// Replaces every `{{ name }}` in `text` with its value from `values`.
///
/// Names without a value render as an empty string. On a syntax error
/// nothing is returned, so callers never see half-rendered output.
pub fn render(text: &str, values: &HashMap<String, String>) -> Result<String, RenderError> {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    let mut consumed = 0;

    while let Some(start) = rest.find(OPEN) {
        let offset = consumed + start;
        output.push_str(&rest[..start]);

        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or(RenderError::Unclosed { offset })?;

        let expression = after_open[..end].trim();
        if !is_variable_name(expression) {
            return Err(RenderError::InvalidExpression {
                offset,
                expression: expression.to_string(),
            });
        }
        if let Some(value) = values.get(expression) {
            output.push_str(value);
        }

        let advance = start + OPEN.len() + end + CLOSE.len();
        consumed += advance;
        rest = &rest[advance..];
    }

    output.push_str(rest);
    Ok(output)
}
