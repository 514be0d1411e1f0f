//! # Page Layout
//!
//! Turns rendered template text into a list of pages with absolutely
//! positioned text lines and images. This module does not know anything about
//! PDF; it only needs a way to measure text, supplied through [`TextMetrics`].
//! The compositor feeds it genpdf font metrics, tests feed it a fixed-width
//! measure.
//!
//! ## Rules
//!
//! - Coordinates are millimetres from the top-left corner of the page, `y`
//!   grows downwards and is the top of the line box.
//! - Each source line is trimmed. Blank lines advance the cursor by one line
//!   height. `**TEXT**` lines become centered bold headings. Everything else is
//!   left-aligned body text, greedily word-wrapped to the content width.
//! - A line is placed only if its bottom edge stays above the bottom margin;
//!   otherwise a page is opened first. Pages are opened lazily, right before a
//!   line needs one, so there is never a trailing empty page.
//! - A logo, when present, is drawn at the top-left of every page and pushes
//!   the first line down. A signature, when present, goes to the bottom-right
//!   corner of the last page.

use serde::Deserialize;

const MM_PER_INCH: f64 = 25.4;
const HEADING_MARKER: &str = "**";

/// Geometry and typography of generated documents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_left_mm: f64,
    pub margin_right_mm: f64,
    pub margin_top_mm: f64,
    pub margin_bottom_mm: f64,
    pub line_height_mm: f64,
    pub body_font_size: u8,
    pub heading_font_size: u8,
    /// The logo is fitted inside this box, aspect ratio preserved.
    pub logo_box_mm: (f64, f64),
    /// Space between the logo and the first line of text.
    pub logo_gap_mm: f64,
    pub signature_max_width_mm: f64,
    /// Distance between the bottom margin and the signature's bottom edge.
    pub signature_offset_mm: f64,
    /// Resolution used to derive a signature's natural size from its pixels.
    pub signature_dpi: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_left_mm: 25.0,
            margin_right_mm: 25.0,
            margin_top_mm: 30.0,
            margin_bottom_mm: 30.0,
            line_height_mm: 6.0,
            body_font_size: 12,
            heading_font_size: 14,
            logo_box_mm: (50.0, 50.0),
            logo_gap_mm: 10.0,
            signature_max_width_mm: 60.0,
            signature_offset_mm: 10.0,
            signature_dpi: 72.0,
        }
    }
}

impl LayoutSettings {
    pub fn content_width(&self) -> f64 {
        self.page_width_mm - self.margin_left_mm - self.margin_right_mm
    }

    fn content_bottom(&self) -> f64 {
        self.page_height_mm - self.margin_bottom_mm
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Body,
    Heading,
}

/// Measures the rendered width of a string in millimetres.
pub trait TextMetrics {
    fn text_width(&self, text: &str, style: TextStyle) -> f64;
}

/// Pixel dimensions of an image that will be placed on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Text {
        x: f64,
        y: f64,
        width: f64,
        text: String,
        style: TextStyle,
    },
    Logo {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Signature {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePlan {
    pub placements: Vec<Placement>,
}

impl PagePlan {
    pub fn text_lines(&self) -> impl Iterator<Item = (&str, TextStyle)> {
        self.placements.iter().filter_map(|p| match p {
            Placement::Text { text, style, .. } => Some((text.as_str(), *style)),
            _ => None,
        })
    }

    pub fn has_logo(&self) -> bool {
        self.placements
            .iter()
            .any(|p| matches!(p, Placement::Logo { .. }))
    }

    pub fn has_signature(&self) -> bool {
        self.placements
            .iter()
            .any(|p| matches!(p, Placement::Signature { .. }))
    }
}

/// The finished layout; always holds at least one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub pages: Vec<PagePlan>,
}

/// Width and height, in millimetres, of `image` scaled to fit inside `bounds`.
pub fn fit_into(image: PixelSize, bounds: (f64, f64)) -> (f64, f64) {
    if image.width == 0 || image.height == 0 {
        return (0.0, 0.0);
    }
    let (w, h) = (image.width as f64, image.height as f64);
    let scale = (bounds.0 / w).min(bounds.1 / h);
    (w * scale, h * scale)
}

/// Natural size at `dpi`, shrunk proportionally to at most `max_width_mm`.
/// Images are never enlarged.
pub fn shrink_to_width(image: PixelSize, dpi: f64, max_width_mm: f64) -> (f64, f64) {
    let natural_w = image.width as f64 / dpi * MM_PER_INCH;
    let natural_h = image.height as f64 / dpi * MM_PER_INCH;
    if natural_w <= 0.0 {
        return (0.0, 0.0);
    }
    let scale = (max_width_mm / natural_w).min(1.0);
    (natural_w * scale, natural_h * scale)
}

/// Greedy word wrap.
///
/// A line that already fits is returned untouched. Otherwise words are
/// accumulated until the next one would overflow `max_width`. A single word
/// wider than `max_width` is placed alone and allowed to overflow.
pub fn wrap_words(line: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    if measure(line) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Strips the heading markers from `line` if it is a `**heading**`.
fn heading_text(line: &str) -> Option<&str> {
    if line.len() > 2 * HEADING_MARKER.len() {
        line.strip_prefix(HEADING_MARKER)?
            .strip_suffix(HEADING_MARKER)
    } else {
        None
    }
}

struct Cursor<'a> {
    settings: &'a LayoutSettings,
    logo: Option<(f64, f64)>,
    pages: Vec<PagePlan>,
    y: f64,
}

impl<'a> Cursor<'a> {
    fn new(settings: &'a LayoutSettings, logo: Option<(f64, f64)>) -> Self {
        let mut cursor = Self {
            settings,
            logo,
            pages: Vec::new(),
            y: 0.0,
        };
        cursor.open_page();
        cursor
    }

    fn open_page(&mut self) {
        let mut page = PagePlan::default();
        self.y = self.settings.margin_top_mm;
        if let Some((width, height)) = self.logo {
            page.placements.push(Placement::Logo {
                x: self.settings.margin_left_mm,
                y: self.settings.margin_top_mm,
                width,
                height,
            });
            self.y += height + self.settings.logo_gap_mm;
        }
        self.pages.push(page);
    }

    fn skip_line(&mut self) {
        self.y += self.settings.line_height_mm;
    }

    fn place(&mut self, x: f64, width: f64, text: String, style: TextStyle) {
        if self.y + self.settings.line_height_mm > self.settings.content_bottom() {
            self.open_page();
        }
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.placements.push(Placement::Text {
                x,
                y,
                width,
                text,
                style,
            });
        }
        self.skip_line();
    }

    fn place_signature(&mut self, width: f64, height: f64) {
        let x = self.settings.page_width_mm - self.settings.margin_right_mm - width;
        let y = self.settings.content_bottom() - self.settings.signature_offset_mm - height;
        if let Some(page) = self.pages.last_mut() {
            page.placements.push(Placement::Signature {
                x,
                y,
                width,
                height,
            });
        }
    }
}

/// Lays `text` out on pages.
///
/// # Arguments
/// * `text` - Rendered template text.
/// * `settings` - Page geometry and typography.
/// * `metrics` - Text measurement for both styles.
/// * `logo` - Pixel size of the deployment logo, if one is configured.
/// * `signature` - Pixel size of the uploaded signature, if any.
pub fn lay_out(
    text: &str,
    settings: &LayoutSettings,
    metrics: &dyn TextMetrics,
    logo: Option<PixelSize>,
    signature: Option<PixelSize>,
) -> Layout {
    let logo_size = logo.map(|size| fit_into(size, settings.logo_box_mm));
    let mut cursor = Cursor::new(settings, logo_size);
    let content_width = settings.content_width();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            cursor.skip_line();
            continue;
        }

        if let Some(heading) = heading_text(line) {
            let measure = |s: &str| metrics.text_width(s, TextStyle::Heading);
            for piece in wrap_words(heading, content_width, measure) {
                let width = measure(&piece);
                let x = (settings.page_width_mm - width) / 2.0;
                cursor.place(x, width, piece, TextStyle::Heading);
            }
            continue;
        }

        let measure = |s: &str| metrics.text_width(s, TextStyle::Body);
        for piece in wrap_words(line, content_width, measure) {
            let width = measure(&piece);
            cursor.place(settings.margin_left_mm, width, piece, TextStyle::Body);
        }
    }

    if let Some(size) = signature {
        let (width, height) =
            shrink_to_width(size, settings.signature_dpi, settings.signature_max_width_mm);
        cursor.place_signature(width, height);
    }

    Layout {
        pages: cursor.pages,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every character is `char_mm` wide; headings are 20% wider.
    pub(crate) struct FixedWidth {
        pub char_mm: f64,
    }

    impl TextMetrics for FixedWidth {
        fn text_width(&self, text: &str, style: TextStyle) -> f64 {
            let base = text.chars().count() as f64 * self.char_mm;
            match style {
                TextStyle::Body => base,
                TextStyle::Heading => base * 1.2,
            }
        }
    }

    const METRICS: FixedWidth = FixedWidth { char_mm: 2.0 };

    /// Page that fits exactly 40 body lines below an optional 50 mm logo.
    fn forty_line_settings(with_logo: bool) -> LayoutSettings {
        let defaults = LayoutSettings::default();
        let logo_block = if with_logo {
            defaults.logo_box_mm.1 + defaults.logo_gap_mm
        } else {
            0.0
        };
        LayoutSettings {
            page_height_mm: 30.0 + logo_block + 40.0 * 6.0 + 30.0,
            ..defaults
        }
    }

    fn square(px: u32) -> PixelSize {
        PixelSize {
            width: px,
            height: px,
        }
    }

    #[test]
    fn empty_text_is_one_empty_page() {
        let layout = lay_out("", &LayoutSettings::default(), &METRICS, None, None);
        assert_eq!(layout.pages.len(), 1);
        assert!(layout.pages[0].placements.is_empty());
    }

    #[test]
    fn two_hundred_lines_make_five_pages() {
        let text: String = (1..=200).map(|i| format!("line {i}\n")).collect();
        let layout = lay_out(&text, &forty_line_settings(false), &METRICS, None, None);
        assert_eq!(layout.pages.len(), 5);
        for page in &layout.pages {
            assert_eq!(page.text_lines().count(), 40);
        }
        assert_eq!(layout.pages[4].text_lines().last().unwrap().0, "line 200");
    }

    #[test]
    fn logo_on_every_page_signature_only_on_last() {
        let text: String = (1..=200).map(|i| format!("line {i}\n")).collect();
        let layout = lay_out(
            &text,
            &forty_line_settings(true),
            &METRICS,
            Some(square(400)),
            Some(PixelSize {
                width: 300,
                height: 100,
            }),
        );
        assert_eq!(layout.pages.len(), 5);
        assert!(layout.pages.iter().all(PagePlan::has_logo));
        let with_signature: Vec<usize> = layout
            .pages
            .iter()
            .enumerate()
            .filter(|(_, p)| p.has_signature())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(with_signature, vec![4]);
    }

    #[test]
    fn text_starts_below_the_logo() {
        let settings = LayoutSettings::default();
        let layout = lay_out("first", &settings, &METRICS, Some(square(100)), None);
        let first_y = layout.pages[0]
            .placements
            .iter()
            .find_map(|p| match p {
                Placement::Text { y, .. } => Some(*y),
                _ => None,
            })
            .unwrap();
        assert_eq!(first_y, 30.0 + 50.0 + 10.0);
    }

    #[test]
    fn heading_is_centered_and_body_style_resumes() {
        let settings = LayoutSettings::default();
        let layout = lay_out("**TITLE**\nbody", &settings, &METRICS, None, None);
        let placements = &layout.pages[0].placements;
        match &placements[0] {
            Placement::Text {
                x,
                width,
                text,
                style,
                ..
            } => {
                assert_eq!(text, "TITLE");
                assert_eq!(*style, TextStyle::Heading);
                assert!((x + width / 2.0 - settings.page_width_mm / 2.0).abs() < 1e-9);
            }
            other => panic!("unexpected placement {other:?}"),
        }
        match &placements[1] {
            Placement::Text { x, style, text, .. } => {
                assert_eq!(text, "body");
                assert_eq!(*style, TextStyle::Body);
                assert_eq!(*x, settings.margin_left_mm);
            }
            other => panic!("unexpected placement {other:?}"),
        }
    }

    #[test]
    fn wide_heading_wraps_into_centered_pieces() {
        let settings = LayoutSettings::default();
        let heading = format!("**{}**", vec!["word"; 30].join(" "));
        let layout = lay_out(&heading, &settings, &METRICS, None, None);
        let mut pieces = 0;
        for placement in &layout.pages[0].placements {
            if let Placement::Text {
                x,
                width,
                text,
                style,
                ..
            } = placement
            {
                pieces += 1;
                assert_eq!(*style, TextStyle::Heading, "{text}");
                assert!(*width <= settings.content_width(), "{text}");
                assert!((x + width / 2.0 - settings.page_width_mm / 2.0).abs() < 1e-9);
            }
        }
        assert!(pieces > 1);
    }

    #[test]
    fn carriage_returns_are_dropped() {
        let layout = lay_out("a\r\nb\r\n", &LayoutSettings::default(), &METRICS, None, None);
        let texts: Vec<&str> = layout.pages[0].text_lines().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["a", "b"]);

        let layout = lay_out("**TITLE**\r\nbody\r", &LayoutSettings::default(), &METRICS, None, None);
        let lines: Vec<_> = layout.pages[0].text_lines().collect();
        assert_eq!(
            lines,
            vec![("TITLE", TextStyle::Heading), ("body", TextStyle::Body)]
        );
    }

    #[test]
    fn bare_markers_are_body_text() {
        let layout = lay_out("**\n****", &LayoutSettings::default(), &METRICS, None, None);
        let lines: Vec<_> = layout.pages[0].text_lines().collect();
        assert_eq!(
            lines,
            vec![("**", TextStyle::Body), ("****", TextStyle::Body)]
        );
    }

    #[test]
    fn blank_lines_advance_the_cursor() {
        let layout = lay_out("a\n\n\nb", &LayoutSettings::default(), &METRICS, None, None);
        let ys: Vec<f64> = layout.pages[0]
            .placements
            .iter()
            .filter_map(|p| match p {
                Placement::Text { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![30.0, 48.0]);
    }

    #[test]
    fn wrapped_lines_never_exceed_content_width() {
        let settings = LayoutSettings::default();
        let long = "lorem ipsum dolor sit amet ".repeat(40);
        let layout = lay_out(&long, &settings, &METRICS, None, None);
        let mut count = 0;
        for page in &layout.pages {
            for placement in &page.placements {
                if let Placement::Text { width, text, .. } = placement {
                    count += 1;
                    assert!(*width <= settings.content_width(), "{text}");
                }
            }
        }
        assert!(count > 1);
    }

    #[test]
    fn overlong_word_is_placed_alone() {
        let word = "x".repeat(200);
        let line = format!("short {word} tail");
        let wrapped = wrap_words(&line, 160.0, |s| METRICS.text_width(s, TextStyle::Body));
        assert_eq!(wrapped, vec!["short".to_string(), word, "tail".to_string()]);
    }

    #[test]
    fn fitting_line_keeps_inner_spacing() {
        let wrapped = wrap_words("a   b", 160.0, |s| METRICS.text_width(s, TextStyle::Body));
        assert_eq!(wrapped, vec!["a   b".to_string()]);
    }

    #[test]
    fn signature_is_never_enlarged() {
        let small = shrink_to_width(square(72), 72.0, 60.0);
        assert!((small.0 - 25.4).abs() < 1e-9);
        assert!((small.1 - 25.4).abs() < 1e-9);

        let wide = shrink_to_width(
            PixelSize {
                width: 720,
                height: 360,
            },
            72.0,
            60.0,
        );
        assert!((wide.0 - 60.0).abs() < 1e-9);
        assert!((wide.1 - 30.0).abs() < 1e-9);
    }

    #[test]
    fn signature_sits_bottom_right_of_last_page() {
        let settings = LayoutSettings::default();
        let layout = lay_out(
            "text",
            &settings,
            &METRICS,
            None,
            Some(PixelSize {
                width: 720,
                height: 360,
            }),
        );
        let signature = layout.pages[0]
            .placements
            .iter()
            .find_map(|p| match p {
                Placement::Signature {
                    x,
                    y,
                    width,
                    height,
                } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .unwrap();
        let (x, y, w, h) = signature;
        assert!((x + w - (210.0 - 25.0)).abs() < 1e-9);
        assert!((y + h - (297.0 - 30.0 - 10.0)).abs() < 1e-9);
    }

    #[test]
    fn logo_keeps_aspect_ratio_inside_its_box() {
        let (w, h) = fit_into(
            PixelSize {
                width: 200,
                height: 100,
            },
            (50.0, 50.0),
        );
        assert_eq!((w, h), (50.0, 25.0));
    }
}
