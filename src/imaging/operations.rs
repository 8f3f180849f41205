//! Planning the encoded outputs for one source image.
//!
//! [`plan_outputs`] turns a source image, its dimensions, and the configured
//! settings into a list of [`PlannedOutput`]s: one per display variant plus
//! one card thumbnail. Planning is pure; [`execute`] hands a plan to a
//! backend. The process stage sits between the two and consults the cache.

use super::backend::{BackendError, ImageBackend, Quality, ResizeParams, Sharpening, ThumbnailParams};
use super::sizing::{DisplaySize, display_sizes, thumbnail_box};
use crate::cache::{hash_display_params, hash_thumbnail_params};
use std::path::Path;

/// Encoding settings shared by every image in a build.
#[derive(Debug, Clone)]
pub struct ImageSettings {
    pub sizes: Vec<u32>,
    pub quality: Quality,
    pub thumbnail_aspect: (u32, u32),
    pub thumbnail_short_edge: u32,
    pub sharpening: Option<Sharpening>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            sizes: vec![800, 1400],
            quality: Quality::default(),
            thumbnail_aspect: (16, 10),
            thumbnail_short_edge: 400,
            sharpening: Some(Sharpening::light()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannedOp {
    Display {
        size: DisplaySize,
        params: ResizeParams,
    },
    Thumbnail(ThumbnailParams),
}

/// One file to produce, with the key the cache knows it by.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedOutput {
    /// Path relative to the processed directory, `/`-separated.
    pub rel_path: String,
    pub params_hash: String,
    pub op: PlannedOp,
}

/// Plan display variants and the thumbnail for `source`.
///
/// Outputs are named `<stem>-<target>.avif` and `<stem>-thumb.avif` inside
/// `rel_dir` (relative to `output_dir`).
pub fn plan_outputs(
    source: &Path,
    output_dir: &Path,
    rel_dir: &str,
    stem: &str,
    dimensions: (u32, u32),
    settings: &ImageSettings,
) -> Vec<PlannedOutput> {
    let quality = settings.quality;
    let mut planned: Vec<PlannedOutput> = display_sizes(dimensions, &settings.sizes)
        .into_iter()
        .map(|size| {
            let rel_path = format!("{rel_dir}/{stem}-{}.avif", size.target);
            PlannedOutput {
                params_hash: hash_display_params(size.target, quality.value()),
                op: PlannedOp::Display {
                    size,
                    params: ResizeParams {
                        source: source.to_path_buf(),
                        output: output_dir.join(&rel_path),
                        width: size.width,
                        height: size.height,
                        quality,
                    },
                },
                rel_path,
            }
        })
        .collect();

    let (crop_width, crop_height) =
        thumbnail_box(settings.thumbnail_aspect, settings.thumbnail_short_edge);
    let rel_path = format!("{rel_dir}/{stem}-thumb.avif");
    planned.push(PlannedOutput {
        params_hash: hash_thumbnail_params(
            settings.thumbnail_aspect,
            settings.thumbnail_short_edge,
            quality.value(),
            settings.sharpening.map(|s| (s.sigma, s.threshold)),
        ),
        op: PlannedOp::Thumbnail(ThumbnailParams {
            source: source.to_path_buf(),
            output: output_dir.join(&rel_path),
            crop_width,
            crop_height,
            quality,
            sharpening: settings.sharpening,
        }),
        rel_path,
    });
    planned
}

/// Run a planned operation, creating the output's parent directory first.
pub fn execute(backend: &impl ImageBackend, op: &PlannedOp) -> Result<(), BackendError> {
    let output = match op {
        PlannedOp::Display { params, .. } => &params.output,
        PlannedOp::Thumbnail(params) => &params.output,
    };
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    match op {
        PlannedOp::Display { params, .. } => backend.resize(params),
        PlannedOp::Thumbnail(params) => backend.thumbnail(params),
    }
}
