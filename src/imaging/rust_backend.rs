//! Pure Rust backend on the `image` crate.
//!
//! | Operation | Implementation |
//! |---|---|
//! | Decode JPEG / PNG / WebP | `image::ImageReader` |
//! | Identify | `image::image_dimensions` (header only) |
//! | Resize | `DynamicImage::resize_exact`, Lanczos3 |
//! | Thumbnail | `resize_to_fill` + `imageops::unsharpen` |
//! | Encode | `AvifEncoder` (rav1e), speed 6 |

use super::backend::{BackendError, Dimensions, ImageBackend, ResizeParams, ThumbnailParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Source extensions the scanner accepts, all decodable by this backend.
pub const SOURCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// AVIF encoder speed (1 = slowest/best, 10 = fastest).
const AVIF_SPEED: u8 = 6;

#[derive(Debug, Default, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

fn decode(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| BackendError::ProcessingFailed(format!("decode {}: {e}", path.display())))
}

fn encode_avif(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let is_avif = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("avif"));
    if !is_avif {
        return Err(BackendError::ProcessingFailed(format!(
            "unsupported output format: {}",
            path.display()
        )));
    }
    let writer = BufWriter::new(File::create(path)?);
    let encoder = image::codecs::avif::AvifEncoder::new_with_speed_quality(
        writer,
        AVIF_SPEED,
        quality.min(100) as u8,
    );
    // AVIF encoding wants 8-bit RGB(A); normalise palette/grey/16-bit sources.
    let img = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("encode {}: {e}", path.display())))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("identify {}: {e}", path.display()))
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = decode(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        encode_avif(&resized, &params.output, params.quality.value())
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let img = decode(&params.source)?;
        let cropped = img.resize_to_fill(params.crop_width, params.crop_height, FilterType::Lanczos3);
        let finished = match params.sharpening {
            Some(s) => DynamicImage::from(image::imageops::unsharpen(&cropped, s.sigma, s.threshold)),
            None => cropped,
        };
        encode_avif(&finished, &params.output, params.quality.value())
    }
}
