//! Font resolution for generated documents.
//!
//! A deployment may point at a directory with its own TrueType family. When
//! that family cannot be loaded, the DejaVu Sans family compiled into the
//! binary is used instead and the result says so through
//! [`ResolvedFonts::used_fallback`].

use genpdf::fonts::{FontData, FontFamily};
use include_dir::{include_dir, Dir};
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static BUILTIN_FONTS: Dir = include_dir!("$CARGO_MANIFEST_DIR/fonts");
const BUILTIN_FAMILY: &str = "DejaVuSans";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    /// Directory holding `<family>.ttf`, `<family>-Bold.ttf`, ...
    pub dir: Option<PathBuf>,
    pub family: String,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            dir: None,
            family: BUILTIN_FAMILY.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("no regular face for font family `{family}`")]
    MissingRegular { family: String },
    #[error("invalid font data: {0}")]
    Invalid(#[from] genpdf::error::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Directory(PathBuf),
    Builtin,
}

pub struct ResolvedFonts {
    pub family: FontFamily<FontData>,
    pub source: FontSource,
    pub used_fallback: bool,
}

fn regular_names(family: &str) -> [String; 2] {
    [format!("{family}.ttf"), format!("{family}-Regular.ttf")]
}

fn bold_names(family: &str) -> [String; 1] {
    [format!("{family}-Bold.ttf")]
}

fn italic_names(family: &str) -> [String; 2] {
    [format!("{family}-Oblique.ttf"), format!("{family}-Italic.ttf")]
}

fn bold_italic_names(family: &str) -> [String; 2] {
    [
        format!("{family}-BoldOblique.ttf"),
        format!("{family}-BoldItalic.ttf"),
    ]
}

fn first_found(names: &[String], read: &impl Fn(&str) -> Option<Vec<u8>>) -> Option<Vec<u8>> {
    names.iter().find_map(|name| read(name.as_str()))
}

fn face(bytes: Option<Vec<u8>>) -> Result<Option<FontData>, FontError> {
    Ok(bytes.map(|b| FontData::new(b, None)).transpose()?)
}

/// Assembles a family from whatever faces `read` can find. Bold and italic
/// borrow the regular face when missing, bold italic borrows bold.
fn load_family(
    family: &str,
    read: impl Fn(&str) -> Option<Vec<u8>>,
) -> Result<FontFamily<FontData>, FontError> {
    let regular = face(first_found(&regular_names(family), &read))?.ok_or_else(|| {
        FontError::MissingRegular {
            family: family.to_string(),
        }
    })?;
    let bold = face(first_found(&bold_names(family), &read))?.unwrap_or_else(|| regular.clone());
    let italic =
        face(first_found(&italic_names(family), &read))?.unwrap_or_else(|| regular.clone());
    let bold_italic =
        face(first_found(&bold_italic_names(family), &read))?.unwrap_or_else(|| bold.clone());

    Ok(FontFamily {
        regular,
        bold,
        italic,
        bold_italic,
    })
}

fn load_from_dir(dir: &Path, family: &str) -> Result<FontFamily<FontData>, FontError> {
    load_family(family, |name| fs::read(dir.join(name)).ok())
}

fn load_builtin() -> Result<FontFamily<FontData>, FontError> {
    load_family(BUILTIN_FAMILY, |name| {
        BUILTIN_FONTS.get_file(name).map(|f| f.contents().to_vec())
    })
}

/// Resolves the font family described by `settings`.
///
/// Only a broken built-in family is an error; a missing or unreadable
/// configured family falls back to the built-in one with a warning.
pub fn resolve_fonts(settings: &FontSettings) -> Result<ResolvedFonts, FontError> {
    if let Some(dir) = &settings.dir {
        match load_from_dir(dir, &settings.family) {
            Ok(family) => {
                info!("Using font family {} from {}", settings.family, dir.display());
                return Ok(ResolvedFonts {
                    family,
                    source: FontSource::Directory(dir.clone()),
                    used_fallback: false,
                });
            }
            Err(e) => warn!(
                "Font family {} unavailable in {} ({}), using built-in {}",
                settings.family,
                dir.display(),
                e,
                BUILTIN_FAMILY
            ),
        }
    }

    Ok(ResolvedFonts {
        family: load_builtin()?,
        source: FontSource::Builtin,
        used_fallback: settings.dir.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fonts")
    }

    #[test]
    fn no_configuration_uses_builtin_without_fallback() {
        let fonts = resolve_fonts(&FontSettings::default()).unwrap();
        assert_eq!(fonts.source, FontSource::Builtin);
        assert!(!fonts.used_fallback);
    }

    #[test]
    fn missing_directory_falls_back_to_builtin() {
        let settings = FontSettings {
            dir: Some(PathBuf::from("/nonexistent/fonts")),
            family: "Arial".to_string(),
        };
        let fonts = resolve_fonts(&settings).unwrap();
        assert_eq!(fonts.source, FontSource::Builtin);
        assert!(fonts.used_fallback);
    }

    #[test]
    fn configured_directory_is_used_when_readable() {
        let settings = FontSettings {
            dir: Some(bundled_dir()),
            family: BUILTIN_FAMILY.to_string(),
        };
        let fonts = resolve_fonts(&settings).unwrap();
        assert_eq!(fonts.source, FontSource::Directory(bundled_dir()));
        assert!(!fonts.used_fallback);
    }

    #[test]
    fn regular_face_alone_is_enough() {
        let dir = tempfile::tempdir().unwrap();
        fs::copy(
            bundled_dir().join("DejaVuSans.ttf"),
            dir.path().join("Custom-Regular.ttf"),
        )
        .unwrap();
        assert!(load_from_dir(dir.path(), "Custom").is_ok());
    }

    #[test]
    fn corrupt_face_is_not_silently_accepted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Broken.ttf"), b"not a font").unwrap();
        assert!(matches!(
            load_from_dir(dir.path(), "Broken"),
            Err(FontError::Invalid(_))
        ));

        let settings = FontSettings {
            dir: Some(dir.path().to_path_buf()),
            family: "Broken".to_string(),
        };
        assert!(resolve_fonts(&settings).unwrap().used_fallback);
    }
}
