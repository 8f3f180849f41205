//! Shared test utilities.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//! let project = find_project(&manifest, "sales-dashboard");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{CaseStudy, GalleryItem, Manifest};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups, panicking with the available keys on a miss
// =========================================================================

pub fn find_project<'a>(manifest: &'a Manifest, slug: &str) -> &'a GalleryItem {
    manifest
        .projects
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.projects.iter().map(|p| p.slug.as_str()).collect();
            panic!("project '{slug}' not found. Available: {slugs:?}")
        })
}

pub fn find_case_study<'a>(manifest: &'a Manifest, slug: &str) -> &'a CaseStudy {
    manifest
        .case_studies
        .iter()
        .find(|c| c.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest
                .case_studies
                .iter()
                .map(|c| c.slug.as_str())
                .collect();
            panic!("case study '{slug}' not found. Available: {slugs:?}")
        })
}

pub fn project_titles(manifest: &Manifest) -> Vec<&str> {
    manifest.projects.iter().map(|p| p.title.as_str()).collect()
}

/// Every image source path across projects and case-study covers.
pub fn all_source_paths(manifest: &Manifest) -> Vec<&str> {
    manifest
        .projects
        .iter()
        .flat_map(|p| &p.images)
        .chain(manifest.case_studies.iter().filter_map(|c| c.cover.as_ref()))
        .map(|i| i.source_path.as_str())
        .collect()
}
