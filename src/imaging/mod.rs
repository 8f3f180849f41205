//! Image processing, pure Rust.
//!
//! - [`backend`]: the [`ImageBackend`] trait and the parameter types it consumes
//! - `sizing`: dimension math (display variants, thumbnail crop box)
//! - [`operations`]: plan the outputs for one source image, run a plan
//! - [`rust_backend`]: the production backend on the `image` crate

pub mod backend;
pub mod operations;
pub mod rust_backend;
mod sizing;

pub use backend::{BackendError, Dimensions, ImageBackend, Quality, Sharpening};
pub use operations::{ImageSettings, PlannedOp, PlannedOutput, execute, plan_outputs};
pub use rust_backend::{RustBackend, SOURCE_EXTENSIONS};
pub use sizing::{DisplaySize, display_sizes, thumbnail_box};
