//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output reads as a content inventory: every entity (project, image, case
//! study, skill group) leads with its positional index and title, with the
//! source path as an indented `Source:` line underneath.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Projects
//! 001 Sales Dashboard [data] (2 images)
//!     Source: projects/010-Sales-Dashboard/
//!     001 Overview
//!     002 Filters
//! 002 Churn Model [data] → https://github.com/…
//!     Source: projects/020-Churn-Model/
//!
//! Case Studies
//! 001 Checkout Friction (cover)
//!     Source: case-studies/010-Checkout-Friction/
//!
//! Skills
//!     Design (4), Technical (5), Soft Skills (4)
//!
//! Config
//!     config.toml
//!     assets/ (1 file)
//! ```
//!
//! ## Process
//!
//! ```text
//! Sales Dashboard (2 images)
//!     001 Overview
//!         Source: projects/010-Sales-Dashboard/001-Overview.jpg
//!         800px: cached
//!         thumbnail: encoded
//! ```
//!
//! ## Generate
//!
//! ```text
//! index.html
//!     #projects: 4 cards, 3 galleries
//!     #case-studies: 2 slides
//! ```
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::contact::{SubmitError, SubmitStatus};
use crate::process::{ProcessEvent, VariantStatus};
use crate::types::Manifest;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Titled images show the title, untitled ones the file name in parens.
///
/// ```text
/// 001 Overview
/// 002 (002.png)
/// ```
fn image_line(index: usize, title: &str, source_path: &str) -> String {
    if title.is_empty() {
        let filename = source_path.rsplit('/').next().unwrap_or(source_path);
        format!("{} ({})", format_index(index), filename)
    } else {
        format!("{} {}", format_index(index), title)
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Projects".to_string()];

    for (i, project) in manifest.projects.iter().enumerate() {
        let mut header = format!(
            "{} {} [{}]",
            format_index(i + 1),
            project.title,
            project.category
        );
        if !project.images.is_empty() {
            header.push_str(&format!(" ({})", plural(project.images.len(), "image", "images")));
        }
        if let Some(link) = &project.link {
            header.push_str(&format!(" \u{2192} {link}"));
        }
        lines.push(header);
        lines.push(format!("    Source: {}/", project.source_dir));

        let desc = truncate_desc(project.description.trim(), 60);
        if !desc.is_empty() {
            lines.push(format!("    {desc}"));
        }
        for (j, image) in project.images.iter().enumerate() {
            lines.push(format!(
                "    {}",
                image_line(j + 1, &image.title, &image.source_path)
            ));
        }
    }

    if !manifest.case_studies.is_empty() {
        lines.push(String::new());
        lines.push("Case Studies".to_string());
        for (i, study) in manifest.case_studies.iter().enumerate() {
            let cover = if study.cover.is_some() { " (cover)" } else { "" };
            lines.push(format!("{} {}{}", format_index(i + 1), study.title, cover));
            lines.push(format!("    Source: {}/", study.source_dir));
        }
    }

    let skills = &manifest.skills;
    if !skills.groups.is_empty() || !skills.tools.is_empty() {
        lines.push(String::new());
        lines.push("Skills".to_string());
        if !skills.groups.is_empty() {
            let groups: Vec<String> = skills
                .groups
                .iter()
                .map(|g| format!("{} ({})", g.name, g.skills.len()))
                .collect();
            lines.push(format!("    {}", groups.join(", ")));
        }
        if !skills.tools.is_empty() {
            lines.push(format!("    Tools: {}", skills.tools.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    }
    if manifest.about.is_some() {
        lines.push("    about.md".to_string());
    }
    if !manifest.assets.is_empty() {
        lines.push(format!(
            "    assets/ ({})",
            plural(manifest.assets.len(), "file", "files")
        ));
    }

    lines
}

pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Process output
// ============================================================================

/// Format a single process progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::GroupStarted { title, image_count } => {
            vec![format!("{} ({})", title, plural(*image_count, "image", "images"))]
        }
        ProcessEvent::ImageProcessed {
            index,
            title,
            source_path,
            variants,
        } => {
            let mut lines = vec![
                format!("    {}", image_line(*index, title, source_path)),
                format!("        Source: {}", source_path),
            ];
            for variant in variants {
                let status = match variant.status {
                    VariantStatus::Cached => "cached",
                    VariantStatus::Copied => "copied",
                    VariantStatus::Encoded => "encoded",
                };
                lines.push(format!("        {}: {}", variant.label, status));
            }
            lines
        }
    }
}

// ============================================================================
// Stage 3: Generate output
// ============================================================================

/// What landed on the page, section by section.
pub fn format_generate_output(manifest: &Manifest) -> Vec<String> {
    let galleries = manifest.projects.iter().filter(|p| p.opens_gallery()).count();
    let mut lines = vec!["index.html".to_string()];

    if manifest.about.is_some() {
        lines.push("    #about".to_string());
    }
    lines.push(format!(
        "    #projects: {}, {}",
        plural(manifest.projects.len(), "card", "cards"),
        plural(galleries, "gallery", "galleries")
    ));
    if !manifest.case_studies.is_empty() {
        lines.push(format!(
            "    #case-studies: {}",
            plural(manifest.case_studies.len(), "slide", "slides")
        ));
    }
    if !manifest.skills.groups.is_empty() {
        lines.push(format!(
            "    #skills: {}",
            plural(manifest.skills.groups.len(), "panel", "panels")
        ));
    }
    lines.push("    #contact".to_string());
    lines
}

pub fn print_generate_output(manifest: &Manifest) {
    for line in format_generate_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Contact
// ============================================================================

/// Status line for `folio contact`, plus the reason on failure.
pub fn format_contact_outcome(
    status: SubmitStatus,
    result: &Result<(), SubmitError>,
) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(message) = status.message() {
        lines.push(message.to_string());
    }
    if let Err(e) = result {
        lines.push(format!("    {e}"));
    }
    lines
}

pub fn print_contact_outcome(status: SubmitStatus, result: &Result<(), SubmitError>) {
    for line in format_contact_outcome(status, result) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
