//! Thumbnail and display-variant generation.
//!
//! Stage 2 of the build pipeline. Reads the scan manifest, encodes every
//! gallery image and case-study cover, and returns the same manifest with
//! [`ImageRef::variants`], [`ImageRef::thumbnail`], and dimensions filled in.
//!
//! ## Output Structure
//!
//! ```text
//! processed/
//! ├── manifest.json
//! ├── .cache-manifest.json
//! ├── projects/
//! │   └── sales-dashboard/
//! │       ├── 001-800.avif       # Display variants (longer edge)
//! │       ├── 001-1400.avif
//! │       └── 001-thumb.avif     # Card thumbnail, [thumbnails] aspect
//! └── case-studies/
//!     └── checkout-friction/
//!         └── 001-...
//! ```
//!
//! Images within a project are encoded in parallel on the global rayon pool
//! (sized from `[processing]` by the caller). Progress is reported through an
//! optional channel of [`ProcessEvent`]s so the CLI can print while work runs.

use crate::cache::{self, CacheManifest, CacheStats, Lookup};
use crate::config::SiteConfig;
use crate::imaging::{
    BackendError, ImageBackend, ImageSettings, PlannedOp, Quality, RustBackend, Sharpening,
    execute, plan_outputs,
};
use crate::types::{ImageRef, ImageVariant, Manifest};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Source image not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Progress notifications, sent as work completes.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    GroupStarted {
        title: String,
        image_count: usize,
    },
    ImageProcessed {
        /// 1-based position within the group.
        index: usize,
        title: String,
        source_path: String,
        variants: Vec<VariantInfo>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantInfo {
    /// `800px`, `thumbnail`, …
    pub label: String,
    pub status: VariantStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    Cached,
    Copied,
    Encoded,
}

impl From<&Lookup> for VariantStatus {
    fn from(lookup: &Lookup) -> Self {
        match lookup {
            Lookup::Hit => VariantStatus::Cached,
            Lookup::CopyFrom(_) => VariantStatus::Copied,
            Lookup::Miss => VariantStatus::Encoded,
        }
    }
}

pub struct ProcessResult {
    pub manifest: Manifest,
    pub cache_stats: CacheStats,
}

/// Encoding settings from `[images]` and `[thumbnails]`.
pub fn image_settings(config: &SiteConfig) -> ImageSettings {
    let [aw, ah] = config.thumbnails.aspect_ratio;
    ImageSettings {
        sizes: config.images.sizes.clone(),
        quality: Quality::new(config.images.quality),
        thumbnail_aspect: (aw, ah),
        thumbnail_short_edge: config.thumbnails.size,
        sharpening: Some(Sharpening::light()),
    }
}

pub fn process(
    manifest_path: &Path,
    source_root: &Path,
    output_dir: &Path,
    use_cache: bool,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    process_with_backend(
        &RustBackend::new(),
        manifest_path,
        source_root,
        output_dir,
        use_cache,
        progress,
    )
}

/// One group of images sharing an output directory.
struct Group<'a> {
    title: String,
    rel_dir: String,
    images: Vec<&'a mut ImageRef>,
}

/// Process images using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    manifest_path: &Path,
    source_root: &Path,
    output_dir: &Path,
    use_cache: bool,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<ProcessResult, ProcessError> {
    let content = std::fs::read_to_string(manifest_path)?;
    let mut manifest: Manifest = serde_json::from_str(&content)?;

    std::fs::create_dir_all(output_dir)?;

    let cache = Mutex::new(if use_cache {
        CacheManifest::load(output_dir)
    } else {
        CacheManifest::empty()
    });
    let settings = image_settings(&manifest.config);
    let ctx = Context {
        backend,
        source_root,
        output_dir,
        settings: &settings,
        cache: &cache,
    };

    let mut groups: Vec<Group> = manifest
        .projects
        .iter_mut()
        .filter(|p| !p.images.is_empty())
        .map(|p| Group {
            title: p.title.clone(),
            rel_dir: format!("projects/{}", p.slug),
            images: p.images.iter_mut().collect(),
        })
        .collect();
    for study in manifest.case_studies.iter_mut() {
        if let Some(cover) = study.cover.as_mut() {
            groups.push(Group {
                title: study.title.clone(),
                rel_dir: format!("case-studies/{}", study.slug),
                images: vec![cover],
            });
        }
    }

    let mut stats = CacheStats::default();
    for group in groups {
        if let Some(tx) = &progress {
            tx.send(ProcessEvent::GroupStarted {
                title: group.title.clone(),
                image_count: group.images.len(),
            })
            .ok();
        }

        let rel_dir = group.rel_dir;
        let results: Vec<CacheStats> = group
            .images
            .into_par_iter()
            .enumerate()
            .map(|(i, image)| {
                let (image_stats, variants) = ctx.process_image(image, &rel_dir)?;
                if let Some(tx) = &progress {
                    tx.send(ProcessEvent::ImageProcessed {
                        index: i + 1,
                        title: image.title.clone(),
                        source_path: image.source_path.clone(),
                        variants,
                    })
                    .ok();
                }
                Ok::<_, ProcessError>(image_stats)
            })
            .collect::<Result<_, _>>()?;

        for s in results {
            stats.merge(s);
        }
    }

    lock(&cache).save(output_dir)?;
    tracing::info!("processed images: {stats}");

    Ok(ProcessResult {
        manifest,
        cache_stats: stats,
    })
}

fn lock(cache: &Mutex<CacheManifest>) -> MutexGuard<'_, CacheManifest> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Context<'a, B: ImageBackend> {
    backend: &'a B,
    source_root: &'a Path,
    output_dir: &'a Path,
    settings: &'a ImageSettings,
    cache: &'a Mutex<CacheManifest>,
}

impl<B: ImageBackend> Context<'_, B> {
    /// Produce every planned output for `image`, reusing cached files, and
    /// record the results on the image.
    fn process_image(
        &self,
        image: &mut ImageRef,
        rel_dir: &str,
    ) -> Result<(CacheStats, Vec<VariantInfo>), ProcessError> {
        let source = self.source_root.join(&image.source_path);
        if !source.exists() {
            return Err(ProcessError::SourceNotFound(source));
        }

        let dimensions: (u32, u32) = self.backend.identify(&source)?.into();
        let source_hash = cache::hash_file(&source)?;
        let stem = format!("{:03}", image.number);

        let mut stats = CacheStats::default();
        let mut infos = Vec::new();
        image.dimensions = Some(dimensions);
        image.variants.clear();
        image.thumbnail = None;

        for planned in plan_outputs(
            &source,
            self.output_dir,
            rel_dir,
            &stem,
            dimensions,
            self.settings,
        ) {
            let lookup = lock(self.cache).lookup(
                &planned.rel_path,
                &source_hash,
                &planned.params_hash,
                self.output_dir,
            );
            match &lookup {
                Lookup::Hit => {
                    tracing::debug!("cache hit {}", planned.rel_path);
                }
                Lookup::CopyFrom(from) => {
                    let target = self.output_dir.join(&planned.rel_path);
                    if let Some(parent) = target.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::copy(self.output_dir.join(from), &target)?;
                    tracing::debug!("cache copy {from} -> {}", planned.rel_path);
                }
                Lookup::Miss => execute(self.backend, &planned.op)?,
            }
            stats.count(&lookup);
            lock(self.cache).record(
                planned.rel_path.clone(),
                source_hash.clone(),
                planned.params_hash.clone(),
            );

            let label = match &planned.op {
                PlannedOp::Display { size, .. } => {
                    image.variants.insert(
                        size.target,
                        ImageVariant {
                            path: planned.rel_path.clone(),
                            width: size.width,
                            height: size.height,
                        },
                    );
                    format!("{}px", size.target)
                }
                PlannedOp::Thumbnail(_) => {
                    image.thumbnail = Some(planned.rel_path.clone());
                    "thumbnail".to_string()
                }
            };
            infos.push(VariantInfo {
                label,
                status: VariantStatus::from(&lookup),
            });
        }

        Ok((stats, infos))
    }
}
