//! Image preparation for the PDF backend.
//!
//! genpdf refuses images with an alpha channel and reads images from disk, so
//! every logo or signature is decoded, flattened over a white background,
//! re-encoded as an 8-bit RGB PNG and kept in a temporary file for as long as
//! the [`PreparedImage`] lives.

use crate::pipeline::layout::PixelSize;
use genpdf::elements::Image as PdfImage;
use genpdf::Position;
use image::{load_from_memory, DynamicImage, GenericImageView};
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("cannot encode image: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("image has no pixels")]
    Empty,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An image normalized to an RGB PNG on disk.
#[derive(Debug)]
pub struct PreparedImage {
    file: NamedTempFile,
    size: PixelSize,
}

impl PreparedImage {
    /// Decodes `bytes` (PNG or JPEG) and writes the flattened copy.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let img = load_from_memory(bytes)?;
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(ImageError::Empty);
        }

        // Flatten alpha channel over white background and convert to RGB
        let rgba = img.to_rgba8();
        let mut background = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
        image::imageops::overlay(&mut background, &rgba, 0, 0);
        let raw = DynamicImage::ImageRgba8(background).to_rgb8().into_raw();

        let mut file = tempfile::Builder::new().suffix(".png").tempfile()?;
        {
            let mut encoder = PngEncoder::new(file.as_file_mut(), w, h);
            encoder.set_color(PngColorType::Rgb);
            encoder.set_depth(PngBitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&raw)?;
        }

        Ok(Self {
            file,
            size: PixelSize {
                width: w,
                height: h,
            },
        })
    }

    /// Reads and prepares the image at `path`.
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Builds a genpdf image element drawn `width_mm` wide with its top-left
    /// corner at `position`. The height follows from the aspect ratio.
    pub fn element(&self, position: Position, width_mm: f64) -> Result<PdfImage, genpdf::error::Error> {
        let dpi = self.size.width as f64 * MM_PER_INCH / width_mm;
        let mut img = PdfImage::from_path(self.file.path())?;
        img.set_dpi(dpi);
        img.set_position(position);
        Ok(img)
    }
}
