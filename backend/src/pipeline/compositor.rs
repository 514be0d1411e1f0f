//! # Document Compositor
//!
//! Bridges the page layout with genpdf. The layout is computed up front with
//! the document's own font metrics, then handed to genpdf as a single element
//! that draws one planned page per render call. genpdf starts a new page each
//! time the element reports that more content remains, so the page count is
//! exactly the number of planned pages.
//!
//! genpdf embeds all four faces of the family uncompressed, even when two of
//! them are copies of the others. The rendered bytes are therefore compacted
//! with lopdf: identical font files are merged and every stream is deflated.

use crate::pipeline::fonts::ResolvedFonts;
use crate::pipeline::images::PreparedImage;
use crate::pipeline::layout::{lay_out, LayoutSettings, PagePlan, Placement, TextMetrics, TextStyle};
use genpdf::fonts::{FontCache, FontData, FontFamily};
use genpdf::render::Area;
use genpdf::style::Style;
use genpdf::{Context, Document, Element, Position, RenderResult, Size};
use log::{debug, info, warn};
use lopdf::{Object, ObjectId};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const DOCUMENT_TITLE: &str = "Generated document";

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

impl From<genpdf::error::Error> for ComposeError {
    fn from(e: genpdf::error::Error) -> Self {
        ComposeError::Pdf(e.to_string())
    }
}

impl From<lopdf::Error> for ComposeError {
    fn from(e: lopdf::Error) -> Self {
        ComposeError::Pdf(e.to_string())
    }
}

impl From<std::io::Error> for ComposeError {
    fn from(e: std::io::Error) -> Self {
        ComposeError::Pdf(e.to_string())
    }
}

fn redirect(object: &mut Object, aliases: &BTreeMap<ObjectId, ObjectId>) {
    match object {
        Object::Reference(id) => {
            if let Some(target) = aliases.get(id) {
                *id = *target;
            }
        }
        Object::Array(items) => items.iter_mut().for_each(|item| redirect(item, aliases)),
        Object::Dictionary(dict) => dict.iter_mut().for_each(|(_, value)| redirect(value, aliases)),
        Object::Stream(stream) => stream
            .dict
            .iter_mut()
            .for_each(|(_, value)| redirect(value, aliases)),
        _ => {}
    }
}

/// Merges byte-identical embedded font files, drops what is no longer
/// referenced and deflates the remaining streams.
fn compact(rendered: &[u8]) -> Result<Vec<u8>, ComposeError> {
    let mut doc = lopdf::Document::load_mem(rendered)?;

    let mut aliases = BTreeMap::new();
    {
        let mut first_seen: HashMap<&[u8], ObjectId> = HashMap::new();
        for (id, object) in &doc.objects {
            if let Object::Stream(stream) = object {
                if stream.dict.has(b"Length1") {
                    let first = *first_seen.entry(stream.content.as_slice()).or_insert(*id);
                    if first != *id {
                        aliases.insert(*id, first);
                    }
                }
            }
        }
    }

    if !aliases.is_empty() {
        for object in doc.objects.values_mut() {
            redirect(object, &aliases);
        }
        doc.prune_objects();
    }
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    debug!(
        "Compacted PDF from {} to {} bytes ({} duplicate font files)",
        rendered.len(),
        bytes.len(),
        aliases.len()
    );
    Ok(bytes)
}

struct TextStyles {
    body: Style,
    heading: Style,
}

impl TextStyles {
    fn new(settings: &LayoutSettings) -> Self {
        Self {
            body: Style::new().with_font_size(settings.body_font_size),
            heading: Style::new()
                .bold()
                .with_font_size(settings.heading_font_size),
        }
    }

    fn get(&self, style: TextStyle) -> &Style {
        match style {
            TextStyle::Body => &self.body,
            TextStyle::Heading => &self.heading,
        }
    }
}

struct FontMetrics<'a> {
    cache: &'a FontCache,
    styles: &'a TextStyles,
}

impl TextMetrics for FontMetrics<'_> {
    fn text_width(&self, text: &str, style: TextStyle) -> f64 {
        f64::from(self.styles.get(style).str_width(self.cache, text))
    }
}

/// genpdf element drawing one planned page per render call.
struct PlannedPages {
    pages: Vec<PagePlan>,
    next: usize,
    styles: TextStyles,
    logo: Option<Arc<PreparedImage>>,
    signature: Option<PreparedImage>,
}

impl PlannedPages {
    fn draw_image(
        image: Option<&PreparedImage>,
        context: &Context,
        area: &Area<'_>,
        style: Style,
        position: Position,
        width: f64,
    ) -> Result<(), genpdf::error::Error> {
        if let Some(image) = image {
            image
                .element(position, width)?
                .render(context, area.clone(), style)?;
        }
        Ok(())
    }
}

impl Element for PlannedPages {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        style: Style,
    ) -> Result<RenderResult, genpdf::error::Error> {
        let mut result = RenderResult::default();
        if let Some(page) = self.pages.get(self.next) {
            for placement in &page.placements {
                match placement {
                    Placement::Text {
                        x, y, text, style: text_style, ..
                    } => {
                        let fitted = area.print_str(
                            &context.font_cache,
                            Position::new(*x, *y),
                            *self.styles.get(*text_style),
                            text,
                        )?;
                        if !fitted {
                            debug!("Line at y={} mm does not fit the page area", y);
                        }
                    }
                    Placement::Logo { x, y, width, .. } => Self::draw_image(
                        self.logo.as_deref(),
                        context,
                        &area,
                        style,
                        Position::new(*x, *y),
                        *width,
                    )?,
                    Placement::Signature { x, y, width, .. } => Self::draw_image(
                        self.signature.as_ref(),
                        context,
                        &area,
                        style,
                        Position::new(*x, *y),
                        *width,
                    )?,
                }
            }
        }
        self.next += 1;
        result.size = area.size();
        result.has_more = self.next < self.pages.len();
        Ok(result)
    }
}

/// Loads the deployment logo. A missing or unreadable file means "no logo".
pub fn load_logo(path: Option<&Path>) -> Option<PreparedImage> {
    let path = path?;
    if !path.exists() {
        info!("Logo {} not found, documents will have no logo", path.display());
        return None;
    }
    match PreparedImage::from_path(path) {
        Ok(logo) => Some(logo),
        Err(e) => {
            warn!("Logo {} skipped: {}", path.display(), e);
            None
        }
    }
}

pub struct DocumentCompositor {
    settings: LayoutSettings,
    fonts: FontFamily<FontData>,
    used_fallback_font: bool,
    logo: Option<Arc<PreparedImage>>,
}

impl DocumentCompositor {
    pub fn new(settings: LayoutSettings, fonts: ResolvedFonts, logo: Option<PreparedImage>) -> Self {
        Self {
            settings,
            fonts: fonts.family,
            used_fallback_font: fonts.used_fallback,
            logo: logo.map(Arc::new),
        }
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn used_fallback_font(&self) -> bool {
        self.used_fallback_font
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    /// Lays out `text` and renders it to PDF bytes.
    ///
    /// An undecodable signature is skipped with a warning instead of failing
    /// the whole document.
    pub fn compose(&self, text: &str, signature: Option<&[u8]>) -> Result<Vec<u8>, ComposeError> {
        let signature = signature.and_then(|bytes| match PreparedImage::from_bytes(bytes) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!("Signature skipped: {}", e);
                None
            }
        });

        let mut doc = Document::new(self.fonts.clone());
        doc.set_title(DOCUMENT_TITLE);
        doc.set_paper_size(Size::new(
            self.settings.page_width_mm,
            self.settings.page_height_mm,
        ));
        doc.set_font_size(self.settings.body_font_size);

        let styles = TextStyles::new(&self.settings);
        let layout = {
            let metrics = FontMetrics {
                cache: doc.font_cache(),
                styles: &styles,
            };
            lay_out(
                text,
                &self.settings,
                &metrics,
                self.logo.as_ref().map(|logo| logo.size()),
                signature.as_ref().map(PreparedImage::size),
            )
        };
        debug!("Composing {} page(s)", layout.pages.len());

        doc.push(PlannedPages {
            pages: layout.pages,
            next: 0,
            styles,
            logo: self.logo.clone(),
            signature,
        });

        let mut rendered = Vec::new();
        doc.render(&mut rendered)?;
        compact(&rendered)
    }
}
