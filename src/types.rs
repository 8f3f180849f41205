//! Shared types used across all pipeline stages.
//!
//! These types are serialized to JSON between stages (scan → process → generate)
//! and must be identical across all three modules. Scan fills in everything
//! except [`ImageRef::variants`] and [`ImageRef::thumbnail`], which the
//! process stage adds.

use crate::config::SiteConfig;
use crate::filter::Categorized;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The manifest written by every stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Rendered-ready biography markdown from `about.md`.
    #[serde(default)]
    pub about: Option<String>,
    pub projects: Vec<GalleryItem>,
    #[serde(default)]
    pub case_studies: Vec<CaseStudy>,
    #[serde(default)]
    pub skills: Skills,
    /// Files under `content/assets/`, relative to that directory.
    #[serde(default)]
    pub assets: Vec<String>,
    pub config: SiteConfig,
}

/// A project card plus the images its gallery modal steps through.
///
/// Immutable once scanned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub slug: String,
    pub title: String,
    pub description: String,
    /// One of the tags declared in `[[projects.categories]]`.
    pub category: String,
    pub images: Vec<ImageRef>,
    /// External repository or demo. When set, "View Project" opens it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    pub sort_key: u32,
    /// Source directory relative to the content root.
    pub source_dir: String,
}

impl Categorized for GalleryItem {
    fn category(&self) -> &str {
        &self.category
    }
}

impl GalleryItem {
    /// Whether the card opens the gallery modal rather than an external link.
    pub fn opens_gallery(&self) -> bool {
        self.link.is_none() && !self.images.is_empty()
    }

    pub fn cover(&self) -> Option<&ImageRef> {
        self.images.first()
    }
}

/// A case-study card in the carousel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStudy {
    pub slug: String,
    pub title: String,
    pub context: String,
    pub problem: String,
    pub solution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<ImageRef>,
    pub sort_key: u32,
    pub source_dir: String,
}

/// One source image and, after processing, its generated outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    /// Position from the `NNN-` prefix.
    pub number: u32,
    /// Caption derived from the filename, empty for number-only names.
    #[serde(default)]
    pub title: String,
    /// Relative to the content root.
    pub source_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<(u32, u32)>,
    /// Display variants keyed by target width, ascending.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<u32, ImageVariant>,
    /// Card thumbnail, relative to the processed directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl ImageRef {
    /// The widest generated variant, used as the `src` fallback.
    pub fn largest(&self) -> Option<&ImageVariant> {
        self.variants.values().next_back()
    }

    /// `srcset` value for all generated variants.
    pub fn srcset(&self) -> String {
        self.variants
            .values()
            .map(|v| format!("{} {}w", v.path, v.width))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVariant {
    /// Relative to the processed directory (and to the site root once copied).
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Skills panel data from `skills.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Skills {
    #[serde(rename = "group")]
    pub groups: Vec<SkillGroup>,
    /// "Tools I use" strip under the panels.
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillGroup {
    pub name: String,
    #[serde(default)]
    pub accent: Accent,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Skill {
    pub name: String,
    /// Proficiency 0-100, drawn as a bar.
    pub level: u8,
}

/// Which palette accent a skill group is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Primary,
    Secondary,
}

impl Accent {
    pub fn css_class(&self) -> &'static str {
        match self {
            Accent::Primary => "accent-primary",
            Accent::Secondary => "accent-secondary",
        }
    }
}
