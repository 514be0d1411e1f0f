//! # Document Pipeline
//!
//! Everything needed to turn a template plus submitted values into a PDF:
//!
//! - `variables`: finds the `{{ name }}` placeholders of a template body.
//! - `renderer`: substitutes values into the body.
//! - `layout`: paginates the rendered text (pure, no PDF types).
//! - `compositor`: draws the layout with genpdf and returns PDF bytes.
//! - `fonts` / `images`: resolve fonts and normalize logo/signature images.
//! - `filename`: collision-resistant storage names.
//!
//! [`DocumentPipeline::generate`] runs the steps in order: missing-value
//! check, rendering, composition. A failed step stops the pipeline and no
//! output is produced.

pub mod compositor;
pub mod filename;
pub mod fonts;
pub mod images;
pub mod layout;
pub mod renderer;
pub mod variables;

use crate::pipeline::compositor::{ComposeError, DocumentCompositor};
use crate::pipeline::fonts::ResolvedFonts;
use crate::pipeline::images::PreparedImage;
use crate::pipeline::layout::LayoutSettings;
use crate::pipeline::renderer::{render, RenderError};
use log::info;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("required fields are empty: {}", .0.join(", "))]
    MissingVariables(Vec<String>),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// A finished document and the name suggested for downloading it.
#[derive(Debug)]
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Variables from `required` whose value is absent or blank, in the order
/// of `required`.
pub fn missing_variables(required: &[String], values: &HashMap<String, String>) -> Vec<String> {
    required
        .iter()
        .filter(|name| {
            values
                .get(name.as_str())
                .is_none_or(|value| value.trim().is_empty())
        })
        .cloned()
        .collect()
}

pub struct DocumentPipeline {
    compositor: DocumentCompositor,
}

impl DocumentPipeline {
    pub fn new(settings: LayoutSettings, fonts: ResolvedFonts, logo: Option<PreparedImage>) -> Self {
        Self {
            compositor: DocumentCompositor::new(settings, fonts, logo),
        }
    }

    pub fn compositor(&self) -> &DocumentCompositor {
        &self.compositor
    }

    /// Validates, renders and composes one document.
    ///
    /// # Arguments
    /// * `body` - Template text.
    /// * `required` - Variables of the template, in prompting order.
    /// * `values` - Submitted values keyed by variable name.
    /// * `signature` - Raw bytes of an uploaded signature image, if any.
    ///
    /// # Returns
    /// The PDF bytes with a download name, or the first error encountered.
    pub fn generate(
        &self,
        body: &str,
        required: &[String],
        values: &HashMap<String, String>,
        signature: Option<&[u8]>,
    ) -> Result<GeneratedPdf, PipelineError> {
        let missing = missing_variables(required, values);
        if !missing.is_empty() {
            return Err(PipelineError::MissingVariables(missing));
        }

        let rendered = render(body, values)?;
        let bytes = self.compositor.compose(&rendered, signature)?;
        info!("Generated PDF of {} bytes", bytes.len());

        Ok(GeneratedPdf {
            bytes,
            filename: filename::unique_pdf_filename(),
        })
    }
}
