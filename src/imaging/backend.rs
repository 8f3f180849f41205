//! The backend seam between "what images to produce" and "how pixels move".
//!
//! [`operations`](super::operations) decides sizes and output names, then
//! hands fully-specified [`ResizeParams`] / [`ThumbnailParams`] to an
//! [`ImageBackend`]. Production uses [`RustBackend`](super::RustBackend);
//! tests use a recording mock so the pipeline can be exercised on text files
//! posing as images.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<Dimensions> for (u32, u32) {
    fn from(d: Dimensions) -> Self {
        (d.width, d.height)
    }
}

/// Lossy encoding quality, clamped to 1-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Unsharp-mask settings applied after a thumbnail crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpening {
    pub sigma: f32,
    pub threshold: i32,
}

impl Sharpening {
    pub fn light() -> Self {
        Self {
            sigma: 0.5,
            threshold: 0,
        }
    }
}

/// Scale `source` to exactly `width` x `height` and encode to `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

/// Fill-resize `source` to cover the crop box, center-crop, optionally sharpen.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub crop_width: u32,
    pub crop_height: u32,
    pub quality: Quality,
    pub sharpening: Option<Sharpening>,
}

/// Pixel operations the process stage needs.
///
/// `Sync` so one backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Records every call and writes a placeholder file for each output so
    /// cache lookups see it on disk.
    #[derive(Default)]
    pub struct MockBackend {
        /// Dimensions by source file name; anything else gets `fallback`.
        dimensions: HashMap<String, Dimensions>,
        fallback: Option<Dimensions>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Resize {
            output: String,
            width: u32,
            height: u32,
            quality: u32,
        },
        Thumbnail {
            output: String,
            crop_width: u32,
            crop_height: u32,
            sharpened: bool,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every source reports the same dimensions.
        pub fn uniform(width: u32, height: u32) -> Self {
            Self {
                fallback: Some(Dimensions { width, height }),
                ..Self::default()
            }
        }

        pub fn with_file(mut self, file_name: &str, width: u32, height: u32) -> Self {
            self.dimensions
                .insert(file_name.to_string(), Dimensions { width, height });
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn count(&self, pred: impl Fn(&RecordedOp) -> bool) -> usize {
            self.operations.lock().unwrap().iter().filter(|op| pred(op)).count()
        }

        fn touch(path: &Path) -> Result<(), BackendError> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, b"mock")?;
            Ok(())
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            self.dimensions
                .get(&name)
                .copied()
                .or(self.fallback)
                .ok_or_else(|| BackendError::ProcessingFailed(format!("no mock dimensions for {name}")))
        }

        fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            Self::touch(&params.output)
        }

        fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Thumbnail {
                output: params.output.to_string_lossy().to_string(),
                crop_width: params.crop_width,
                crop_height: params.crop_height,
                sharpened: params.sharpening.is_some(),
            });
            Self::touch(&params.output)
        }
    }

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn mock_identify_by_file_name() {
        let backend = MockBackend::uniform(100, 100).with_file("001-wide.jpg", 1600, 900);
        let wide = backend.identify(Path::new("/a/001-wide.jpg")).unwrap();
        let other = backend.identify(Path::new("/a/002.jpg")).unwrap();
        assert_eq!((wide.width, wide.height), (1600, 900));
        assert_eq!((other.width, other.height), (100, 100));
    }

    #[test]
    fn mock_identify_without_dimensions_fails() {
        assert!(MockBackend::new().identify(Path::new("/x.jpg")).is_err());
    }

    #[test]
    fn mock_writes_placeholder_outputs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("nested/out.avif");
        MockBackend::new()
            .resize(&ResizeParams {
                source: "/src.jpg".into(),
                output: output.clone(),
                width: 10,
                height: 10,
                quality: Quality::default(),
            })
            .unwrap();
        assert!(output.exists());
    }
}
