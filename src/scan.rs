//! Content directory scanning.
//!
//! Stage 1 of the build pipeline. Walks the content root and produces the
//! [`Manifest`] the process and generate stages consume.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                               # Content root
//! ├── config.toml                        # Site configuration (optional)
//! ├── about.md                           # Biography (optional, markdown)
//! ├── skills.toml                        # Skill groups and tools (optional)
//! ├── assets/                            # Copied verbatim to the site root
//! ├── projects/
//! │   ├── 010-Sales-Dashboard/           # Project card (numbered = published)
//! │   │   ├── project.toml               # category, description, tools, link
//! │   │   ├── 001-Overview.jpg           # Gallery images, in number order
//! │   │   └── 002-Filters.jpg
//! │   ├── 020-Churn-Model/               # Link-only project, no images
//! │   │   └── project.toml
//! │   └── wip-Notes/                     # Unnumbered = skipped
//! └── case-studies/
//!     └── 010-Checkout-Friction/
//!         ├── study.toml                 # context, problem, solution
//!         └── 001-cover.jpg              # First image is the card cover
//! ```
//!
//! ## Validation
//!
//! - Every project declares a category from `[[projects.categories]]`
//! - A project needs images, a link, or both
//! - No duplicate numbers among siblings, no duplicate slugs
//! - Skill levels are percentages (0-100)

use crate::config::{self, ProjectsConfig};
use crate::imaging::SOURCE_EXTENSIONS;
use crate::naming::{ParsedName, parse_entry_name, slugify};
use crate::types::{CaseStudy, GalleryItem, ImageRef, Manifest, Skills};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid {path}: {source}")]
    Metadata {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Missing {0}")]
    MissingMetadata(PathBuf),
    #[error("Duplicate number {0} in {1}")]
    DuplicateNumber(u32, PathBuf),
    #[error("Duplicate slug '{slug}' ({path})")]
    DuplicateSlug { slug: String, path: PathBuf },
    #[error("Category '{category}' in {path} is not declared in [[projects.categories]]")]
    UndeclaredCategory { category: String, path: PathBuf },
    #[error("Project has neither images nor a link: {0}")]
    EmptyProject(PathBuf),
    #[error("Skill group '{0}' needs at least one ASCII letter or digit in its name")]
    UnnamedSkillGroup(String),
    #[error("Skill '{skill}' has level {level}, expected 0-100")]
    InvalidSkillLevel { skill: String, level: u8 },
}

const PROJECTS_DIR: &str = "projects";
const CASE_STUDIES_DIR: &str = "case-studies";
const ASSETS_DIR: &str = "assets";

/// Sort offset for unnumbered images so they follow every numbered one.
const UNNUMBERED_BASE: u32 = 1_000_000;

/// `project.toml`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectMeta {
    title: Option<String>,
    category: String,
    description: Option<String>,
    #[serde(default)]
    tools: Vec<String>,
    link: Option<String>,
}

/// `study.toml`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StudyMeta {
    title: Option<String>,
    context: String,
    problem: String,
    solution: String,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    let projects = scan_projects(root, &config.projects)?;
    let case_studies = scan_case_studies(root)?;
    let about = read_optional(&root.join("about.md"))?;
    let skills = read_skills(&root.join("skills.toml"))?;
    let assets = list_assets(&root.join(ASSETS_DIR))?;

    tracing::debug!(
        projects = projects.len(),
        case_studies = case_studies.len(),
        "scanned {}",
        root.display()
    );

    Ok(Manifest {
        about,
        projects,
        case_studies,
        skills,
        assets,
        config,
    })
}

fn scan_projects(root: &Path, declared: &ProjectsConfig) -> Result<Vec<GalleryItem>, ScanError> {
    let mut projects = Vec::new();
    let mut slugs = HashSet::new();

    for (number, parsed, dir) in numbered_dirs(&root.join(PROJECTS_DIR))? {
        let meta_path = dir.join("project.toml");
        if !meta_path.exists() {
            return Err(ScanError::MissingMetadata(meta_path));
        }
        let meta: ProjectMeta = read_toml(&meta_path)?;

        if !declared.is_declared(&meta.category) {
            return Err(ScanError::UndeclaredCategory {
                category: meta.category,
                path: dir,
            });
        }

        let images = collect_images(root, &dir)?;
        if images.is_empty() && meta.link.is_none() {
            return Err(ScanError::EmptyProject(dir));
        }

        let description = match meta.description {
            Some(d) => d,
            None => read_optional(&dir.join("description.txt"))?.unwrap_or_default(),
        };

        let title = meta.title.unwrap_or_else(|| parsed.display_title.clone());
        let slug = claim_slug(&mut slugs, &parsed, number, &dir)?;

        projects.push(GalleryItem {
            slug,
            title,
            description: description.trim().to_string(),
            category: meta.category,
            images,
            link: meta.link,
            tools: meta.tools,
            sort_key: number,
            source_dir: rel_path(root, &dir),
        });
    }
    Ok(projects)
}

fn scan_case_studies(root: &Path) -> Result<Vec<CaseStudy>, ScanError> {
    let mut studies = Vec::new();
    let mut slugs = HashSet::new();

    for (number, parsed, dir) in numbered_dirs(&root.join(CASE_STUDIES_DIR))? {
        let meta_path = dir.join("study.toml");
        if !meta_path.exists() {
            return Err(ScanError::MissingMetadata(meta_path));
        }
        let meta: StudyMeta = read_toml(&meta_path)?;
        let cover = collect_images(root, &dir)?.into_iter().next();
        let slug = claim_slug(&mut slugs, &parsed, number, &dir)?;

        studies.push(CaseStudy {
            slug,
            title: meta.title.unwrap_or_else(|| parsed.display_title.clone()),
            context: meta.context.trim().to_string(),
            problem: meta.problem.trim().to_string(),
            solution: meta.solution.trim().to_string(),
            cover,
            sort_key: number,
            source_dir: rel_path(root, &dir),
        });
    }
    Ok(studies)
}

/// Numbered subdirectories of `dir` in number order. A missing `dir` is empty.
fn numbered_dirs(dir: &Path) -> Result<Vec<(u32, ParsedName, PathBuf)>, ScanError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let name = file_name(&path);
        let parsed = parse_entry_name(&name);
        match parsed.number {
            Some(number) => entries.push((number, parsed, path)),
            None => tracing::debug!("skipping unnumbered directory {}", path.display()),
        }
    }

    entries.sort_by_key(|(number, _, _)| *number);
    if let Some(dup) = entries.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(ScanError::DuplicateNumber(dup[0].0, dir.to_path_buf()));
    }
    Ok(entries)
}

/// Source images in `dir`: numbered ones by number, then unnumbered by name.
fn collect_images(root: &Path, dir: &Path) -> Result<Vec<ImageRef>, ScanError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_source_image(p))
        .collect();
    files.sort();

    let mut numbered = Vec::new();
    let mut unnumbered = Vec::new();
    for path in files {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let parsed = parse_entry_name(&stem);
        let image = |number: u32| ImageRef {
            number,
            title: parsed.display_title.trim().to_string(),
            source_path: rel_path(root, &path),
            dimensions: None,
            variants: Default::default(),
            thumbnail: None,
        };
        match parsed.number {
            Some(n) => numbered.push(image(n)),
            None => unnumbered.push(image(UNNUMBERED_BASE + unnumbered.len() as u32)),
        }
    }

    numbered.sort_by_key(|i| i.number);
    if let Some(dup) = numbered.windows(2).find(|w| w[0].number == w[1].number) {
        return Err(ScanError::DuplicateNumber(dup[0].number, dir.to_path_buf()));
    }
    numbered.extend(unnumbered);
    Ok(numbered)
}

fn is_source_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Slug from the display title, falling back to the number for
/// number-only names.
fn claim_slug(
    taken: &mut HashSet<String>,
    parsed: &ParsedName,
    number: u32,
    dir: &Path,
) -> Result<String, ScanError> {
    let slug = match slugify(&parsed.display_title) {
        s if s.is_empty() => format!("{number:03}"),
        s => s,
    };
    if !taken.insert(slug.clone()) {
        return Err(ScanError::DuplicateSlug {
            slug,
            path: dir.to_path_buf(),
        });
    }
    Ok(slug)
}

fn read_skills(path: &Path) -> Result<Skills, ScanError> {
    if !path.exists() {
        return Ok(Skills::default());
    }
    let skills: Skills = read_toml(path)?;
    // Group slugs are the panel anchors the scroller links between.
    let mut slugs = HashSet::new();
    for group in &skills.groups {
        let slug = slugify(&group.name);
        if slug.is_empty() {
            return Err(ScanError::UnnamedSkillGroup(group.name.clone()));
        }
        if !slugs.insert(slug.clone()) {
            return Err(ScanError::DuplicateSlug {
                slug,
                path: path.to_path_buf(),
            });
        }
    }
    for skill in skills.groups.iter().flat_map(|g| &g.skills) {
        if skill.level > 100 {
            return Err(ScanError::InvalidSkillLevel {
                skill: skill.name.clone(),
                level: skill.level,
            });
        }
    }
    Ok(skills)
}

/// Files under `assets/`, relative to it, sorted.
fn list_assets(dir: &Path) -> Result<Vec<String>, ScanError> {
    fn walk(base: &Path, dir: &Path, out: &mut Vec<String>) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                walk(base, &path, out)?;
            } else {
                out.push(rel_path(base, &path));
            }
        }
        Ok(())
    }

    let mut assets = Vec::new();
    if dir.is_dir() {
        walk(dir, dir, &mut assets)?;
    }
    assets.sort();
    Ok(assets)
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ScanError> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| ScanError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional(path: &Path) -> Result<Option<String>, ScanError> {
    if path.is_file() {
        Ok(Some(fs::read_to_string(path)?))
    } else {
        Ok(None)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// `/`-separated path of `path` relative to `base`.
fn rel_path(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
