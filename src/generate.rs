//! HTML site generation.
//!
//! Stage 3 of the build pipeline. Takes the processed manifest and renders
//! the single-page portfolio.
//!
//! ## Page Sections
//!
//! `home`, `about`, `projects`, `case-studies`, `skills`, `contact`, in that
//! order, each a scroll target of the fixed navbar.
//!
//! ## Navigation Without Script
//!
//! Every carousel is rendered from an
//! [`IndexNavigator`](crate::navigator::IndexNavigator) walk
//! ([`slide_links`]): each slide carries anchors to its wrapped previous and
//! next slides, so the gallery modal (`:target` overlays), the case-study
//! carousel, and the skills scroller all work with CSS alone. The category
//! filter is a radio group; the visible panel per tag is computed here with
//! a [`FilteredGallery`] and toggled by generated `:checked` rules.
//!
//! `static/site.js` layers on smooth scrolling with the configured offset,
//! the rotating hero roles, arrow-key navigation, and the particle canvas.
//! `static/contact.js` posts the form to the mail relay with the same
//! validation and status rules as [`crate::contact`].
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # The page, CSS and scripts inlined
//! ├── favicon.svg                # From content/assets/
//! ├── projects/<slug>/…avif      # Processed images (copied)
//! └── case-studies/<slug>/…avif
//! ```

use crate::config::{self, Category, SiteConfig};
use crate::contact::SubmitStatus;
use crate::filter::{FilterSet, FilteredGallery};
use crate::naming::slugify;
use crate::navigator::{SlideLinks, slide_links};
use crate::types::{CaseStudy, GalleryItem, ImageRef, Manifest, SkillGroup};
use chrono::Datelike;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const SITE_JS: &str = include_str!("../static/site.js");
const CONTACT_JS: &str = include_str!("../static/contact.js");

/// Anchor target that closes a gallery modal.
const CLOSE_TARGET: &str = "#projects";

pub fn generate(
    manifest_path: &Path,
    processed_dir: &Path,
    output_dir: &Path,
    source_root: &Path,
) -> Result<(), GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;

    fs::create_dir_all(output_dir)?;
    if processed_dir.is_dir() {
        copy_dir_recursive(processed_dir, output_dir)?;
    }
    let assets_dir = source_root.join("assets");
    if assets_dir.is_dir() {
        copy_dir_recursive(&assets_dir, output_dir)?;
    }

    let year = chrono::Local::now().year();
    let page = render_page(&manifest, year);
    fs::write(output_dir.join("index.html"), page.into_string())?;
    tracing::info!("wrote {}", output_dir.join("index.html").display());

    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else if src_path.extension().is_none_or(|e| e != "json") {
            // Manifests stay behind.
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Full stylesheet: palette variables, static rules, then filter rules.
pub fn site_css(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC,
        filter_css(&config.projects.categories)
    )
}

/// Show the panel whose radio is checked and highlight its tab.
///
/// ```css
/// #filter-data:checked ~ .filter-panels .panel-data { display: grid; }
/// #filter-data:checked ~ .filter-tabs label[for="filter-data"] { … }
/// ```
pub fn filter_css(categories: &[Category]) -> String {
    let mut css = String::new();
    for c in categories {
        let id = filter_id(&c.tag);
        css.push_str(&format!(
            "#{id}:checked ~ .filter-panels .panel-{tag} {{ display: grid; }}\n\
             #{id}:checked ~ .filter-tabs label[for=\"{id}\"] {{ background: var(--color-primary); color: var(--color-background); }}\n",
            tag = slugify(&c.tag),
        ));
    }
    css
}

fn filter_id(tag: &str) -> String {
    format!("filter-{}", slugify(tag))
}

fn slide_id(slug: &str, index: usize) -> String {
    format!("gallery-{slug}-{index}")
}

fn markdown_to_html(markdown: &str) -> String {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(markdown));
    out
}

// ============================================================================
// Page
// ============================================================================

pub fn render_page(manifest: &Manifest, year: i32) -> Markup {
    let config = &manifest.config;
    let css = site_css(config);

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.site.title) }
                @if !config.site.description.is_empty() {
                    meta name="description" content=(config.site.description);
                }
                @if manifest.assets.iter().any(|a| a == "favicon.svg") {
                    link rel="icon" type="image/svg+xml" href="favicon.svg";
                }
                style { (PreEscaped(css)) }
            }
            body {
                (render_nav(config, &visible_sections(manifest)))
                main {
                    (render_hero(config))
                    (render_about(manifest.about.as_deref()))
                    (render_projects(manifest))
                    (render_case_studies(&manifest.case_studies))
                    (render_skills(manifest))
                    (render_contact(config))
                }
                (render_footer(config, year))
                @if config.background.cursor {
                    div.custom-cursor aria-hidden="true" {}
                }
                script { (PreEscaped(SITE_JS)) }
                script { (PreEscaped(CONTACT_JS)) }
            }
        }
    }
}

const SECTIONS: &[(&str, &str)] = &[
    ("home", "Home"),
    ("about", "About"),
    ("projects", "Projects"),
    ("case-studies", "Case Studies"),
    ("skills", "Skills"),
    ("contact", "Contact"),
];

/// Sections that render for this manifest. The nav links only these.
fn visible_sections(manifest: &Manifest) -> Vec<(&'static str, &'static str)> {
    SECTIONS
        .iter()
        .copied()
        .filter(|(id, _)| match *id {
            "about" => manifest.about.is_some(),
            "case-studies" => !manifest.case_studies.is_empty(),
            "skills" => has_skills(manifest),
            _ => true,
        })
        .collect()
}

fn has_skills(manifest: &Manifest) -> bool {
    !manifest.skills.groups.is_empty() || !manifest.skills.tools.is_empty()
}

/// Fixed header with section links and a checkbox-driven mobile menu.
///
/// `data-offset` / `data-duration` feed the smooth-scroll script.
fn render_nav(config: &SiteConfig, sections: &[(&str, &str)]) -> Markup {
    html! {
        header.site-header #navbar
            data-offset=(config.scroll.offset)
            data-duration=(config.scroll.duration_ms) {
            a.brand href="#home" { (config.site.owner) }
            input.nav-toggle type="checkbox" id="nav-toggle";
            label.nav-hamburger for="nav-toggle" aria-label="Toggle menu" {
                span.hamburger-line {}
                span.hamburger-line {}
                span.hamburger-line {}
            }
            nav.site-nav {
                ul {
                    @for (id, label) in sections {
                        li { a href={ "#" (id) } data-section=(id) { (label) } }
                    }
                }
            }
        }
    }
}

fn render_hero(config: &SiteConfig) -> Markup {
    let hero = &config.hero;
    let bg = &config.background;
    html! {
        section.hero #home {
            @if bg.particles {
                canvas.particles #particles
                    data-colors=(bg.colors.join(","))
                    data-count=(bg.count)
                    data-link-distance=(bg.link_distance) {}
            }
            div.hero-content {
                p.greeting { (hero.greeting) }
                h1 { (config.site.owner) }
                @if !hero.roles.is_empty() {
                    p.roles data-rotate=(hero.rotate_ms) {
                        @for (i, role) in hero.roles.iter().enumerate() {
                            span.role.active[i == 0] { (role) }
                        }
                    }
                }
                @if !hero.tagline.is_empty() {
                    p.tagline { (hero.tagline) }
                }
                div.hero-actions {
                    a.button.primary href="#projects" { "View My Work" }
                    a.button href="#contact" { "Get In Touch" }
                }
            }
        }
    }
}

fn render_about(about: Option<&str>) -> Markup {
    html! {
        @if let Some(markdown) = about {
            section.about #about {
                h2.section-title { "About Me" }
                article.about-content { (PreEscaped(markdown_to_html(markdown))) }
            }
        }
    }
}

// ============================================================================
// Projects
// ============================================================================

fn render_projects(manifest: &Manifest) -> Markup {
    let projects = &manifest.config.projects;
    let set = FilterSet::new(manifest.projects.clone());
    let mut gallery = FilteredGallery::new(&set, &projects.default_filter);

    let panels: Vec<(&Category, Vec<&GalleryItem>)> = projects
        .categories
        .iter()
        .map(|category| {
            gallery.select(&category.tag);
            (category, gallery.visible())
        })
        .collect();

    html! {
        section.projects #projects {
            h2.section-title { "Projects" }
            div.filter {
                @for (category, _) in &panels {
                    input.filter-radio type="radio" name="project-filter"
                        id=(filter_id(&category.tag))
                        checked[category.tag == projects.default_filter];
                }
                div.filter-tabs {
                    @for (category, items) in &panels {
                        label.filter-tab for=(filter_id(&category.tag)) {
                            (category.label) " " span.count { (items.len()) }
                        }
                    }
                }
                div.filter-panels {
                    @for (category, items) in &panels {
                        div class={ "project-grid panel-" (slugify(&category.tag)) }
                            data-category=(category.tag) {
                            @if items.is_empty() {
                                p.empty { "Nothing here yet." }
                            }
                            @for item in items {
                                (render_project_card(item, &category.label))
                            }
                        }
                    }
                }
            }
            @for item in set.items().iter().filter(|i| i.opens_gallery()) {
                (render_gallery_modal(item))
            }
        }
    }
}

fn render_project_card(item: &GalleryItem, category_label: &str) -> Markup {
    html! {
        article.project-card id={ "project-" (item.slug) } {
            div.card-image {
                @if let Some(thumb) = item.cover().and_then(|c| c.thumbnail.as_deref()) {
                    img src=(thumb) alt=(item.title) loading="lazy";
                } @else {
                    div.placeholder { (item.title) }
                }
                span.badge { (category_label) }
            }
            div.card-body {
                h3 { (item.title) }
                @if !item.description.is_empty() {
                    p { (item.description) }
                }
                @if !item.tools.is_empty() {
                    ul.tools {
                        @for tool in &item.tools {
                            li { (tool) }
                        }
                    }
                }
                @if let Some(link) = &item.link {
                    a.view-project href=(link) target="_blank" rel="noopener" { "View Project" }
                } @else {
                    a.view-project href={ "#" (slide_id(&item.slug, 0)) } { "View Project" }
                }
            }
        }
    }
}

/// One `:target` overlay per image. Each overlay is a full modal showing its
/// image with wrapped previous/next anchors and the thumbnail strip.
fn render_gallery_modal(item: &GalleryItem) -> Markup {
    let count = item.images.len();
    html! {
        @for links in slide_links(count) {
            @let image = &item.images[links.index];
            div.gallery-modal id=(slide_id(&item.slug, links.index))
                data-prev={ "#" (slide_id(&item.slug, links.previous)) }
                data-next={ "#" (slide_id(&item.slug, links.next)) }
                role="dialog" aria-label=(item.title) {
                a.modal-backdrop href=(CLOSE_TARGET) aria-label="Close" {}
                div.modal {
                    header.modal-header {
                        h3 { (item.title) }
                        a.modal-close href=(CLOSE_TARGET) aria-label="Close modal" { "×" }
                    }
                    @if !item.description.is_empty() {
                        p.modal-description { (item.description) }
                    }
                    div.modal-stage {
                        (render_picture(image, &format!("{} - Image {}", item.title, links.index + 1)))
                        @if count > 1 {
                            (slide_arrows(&links, |i| slide_id(&item.slug, i)))
                        }
                    }
                    div.thumb-strip {
                        @for (i, thumb) in item.images.iter().enumerate() {
                            a.thumb.active[i == links.index] href={ "#" (slide_id(&item.slug, i)) } {
                                @if let Some(src) = &thumb.thumbnail {
                                    img src=(src) alt={ (item.title) " thumbnail " (i + 1) } loading="lazy";
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_picture(image: &ImageRef, alt: &str) -> Markup {
    html! {
        @if let Some(largest) = image.largest() {
            img.modal-image src=(largest.path) srcset=(image.srcset())
                sizes="(max-width: 900px) 100vw, 900px"
                width=(largest.width) height=(largest.height)
                alt=(alt) loading="lazy";
        }
        @if !image.title.is_empty() {
            p.caption { (image.title) }
        }
    }
}

/// Previous/next anchors for one slide, targets named by `id_of`.
fn slide_arrows(links: &SlideLinks, id_of: impl Fn(usize) -> String) -> Markup {
    html! {
        a.arrow.prev href={ "#" (id_of(links.previous)) } aria-label="Previous" { "‹" }
        a.arrow.next href={ "#" (id_of(links.next)) } aria-label="Next" { "›" }
    }
}

// ============================================================================
// Case studies and skills
// ============================================================================

fn render_case_studies(studies: &[CaseStudy]) -> Markup {
    let id_of = |i: usize| format!("case-{}", studies[i].slug);
    html! {
        @if !studies.is_empty() {
            section.case-studies #case-studies {
                h2.section-title { "Case Studies" }
                div.carousel {
                    div.carousel-track {
                        @for links in slide_links(studies.len()) {
                            @let study = &studies[links.index];
                            article.case-study.slide id=(id_of(links.index)) {
                                @if let Some(src) = study.cover.as_ref().and_then(|c| c.thumbnail.as_deref()) {
                                    img.cover src=(src) alt=(study.title) loading="lazy";
                                }
                                h3 { (study.title) }
                                div.case-block { h4 { "Context" } p { (study.context) } }
                                div.case-block { h4 { "Problem" } p { (study.problem) } }
                                div.case-block { h4 { "Solution" } p { (study.solution) } }
                                @if studies.len() > 1 {
                                    (slide_arrows(&links, id_of))
                                }
                            }
                        }
                    }
                    @if studies.len() > 1 {
                        nav.dots aria-label="Case studies" {
                            @for i in 0..studies.len() {
                                a.dot href={ "#" (id_of(i)) } aria-label={ "Case study " (i + 1) } {}
                            }
                        }
                    }
                }
            }
        }
    }
}

fn skill_panel_id(group: &SkillGroup) -> String {
    format!("skills-{}", slugify(&group.name))
}

fn render_skills(manifest: &Manifest) -> Markup {
    let groups = &manifest.skills.groups;
    let tools = &manifest.skills.tools;
    html! {
        @if has_skills(manifest) {
            section.skills #skills {
                h2.section-title { "Skills" }
                div.skills-track {
                    @for links in slide_links(groups.len()) {
                        @let group = &groups[links.index];
                        div class={ "skill-panel slide " (group.accent.css_class()) } id=(skill_panel_id(group)) {
                            h3 { (group.name) }
                            @for skill in &group.skills {
                                div.skill {
                                    div.skill-label {
                                        span { (skill.name) }
                                        span.level { (skill.level) "%" }
                                    }
                                    div.skill-bar {
                                        div.skill-level style={ "width: " (skill.level) "%" } {}
                                    }
                                }
                            }
                            @if groups.len() > 1 {
                                (slide_arrows(&links, |i| skill_panel_id(&groups[i])))
                            }
                        }
                    }
                }
                @if !tools.is_empty() {
                    div.tools-strip {
                        h3 { "Tools I use" }
                        ul.tools {
                            @for tool in tools {
                                li { (tool) }
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Contact and footer
// ============================================================================

fn render_contact(config: &SiteConfig) -> Markup {
    let contact = &config.contact;
    let relay = &config.relay;
    html! {
        section.contact #contact {
            h2.section-title { "Get In Touch" }
            div.contact-grid {
                div.contact-details {
                    @if !contact.intro.is_empty() {
                        p { (contact.intro) }
                    }
                    @if !contact.email.is_empty() {
                        p.detail { span { "Email" } a href={ "mailto:" (contact.email) } { (contact.email) } }
                    }
                    @if !contact.location.is_empty() {
                        p.detail { span { "Location" } (contact.location) }
                    }
                    @if !contact.socials.is_empty() {
                        ul.socials {
                            @for social in &contact.socials {
                                li { a href=(social.url) target="_blank" rel="noopener" { (social.label) } }
                            }
                        }
                    }
                }
                form #contact-form novalidate
                    data-endpoint=(relay.endpoint)
                    data-service-id=(relay.service_id)
                    data-template-id=(relay.template_id)
                    data-public-key=(relay.public_key)
                    data-payload=(contact.payload.as_str())
                    data-reset-delay=(contact.reset_delay_ms) {
                    div.field {
                        label for="contact-name" { "Name" }
                        input #contact-name type="text" name="name" required;
                    }
                    div.field {
                        label for="contact-email" { "Email" }
                        input #contact-email type="email" name="email" required;
                    }
                    div.field {
                        label for="contact-subject" { "Subject" }
                        input #contact-subject type="text" name="subject" required;
                    }
                    div.field {
                        label for="contact-message" { "Message" }
                        textarea #contact-message name="message" rows="5" required {}
                    }
                    button.button.primary type="submit" { "Send Message" }
                    @for (status, class) in [(SubmitStatus::Success, "success"), (SubmitStatus::Error, "error")] {
                        @if let Some(message) = status.message() {
                            p class={ "form-status " (class) } data-status=(class) hidden { (message) }
                        }
                    }
                }
            }
        }
    }
}

fn render_footer(config: &SiteConfig, year: i32) -> Markup {
    html! {
        footer.site-footer {
            a.brand href="#home" { (config.site.owner) }
            a.back-to-top href="#home" aria-label="Back to top" { "↑" }
            p.copyright { "© " (year) " " (config.site.owner) ". All rights reserved." }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageVariant, Skill, Skills};
    use std::collections::BTreeMap;

    fn image(slug: &str, number: u32) -> ImageRef {
        let path = |suffix: &str| format!("projects/{slug}/{number:03}-{suffix}.avif");
        ImageRef {
            number,
            title: String::new(),
            source_path: format!("projects/010-{slug}/{number:03}.jpg"),
            dimensions: Some((1600, 1000)),
            variants: BTreeMap::from([(
                800,
                ImageVariant {
                    path: path("800"),
                    width: 800,
                    height: 500,
                },
            )]),
            thumbnail: Some(path("thumb")),
        }
    }

    fn project(slug: &str, category: &str, images: usize, link: Option<&str>) -> GalleryItem {
        GalleryItem {
            slug: slug.into(),
            title: slug.to_uppercase(),
            description: format!("About {slug}"),
            category: category.into(),
            images: (1..=images as u32).map(|n| image(slug, n)).collect(),
            link: link.map(String::from),
            tools: vec!["Rust".into()],
            sort_key: 10,
            source_dir: format!("projects/010-{slug}"),
        }
    }

    fn study(slug: &str) -> CaseStudy {
        CaseStudy {
            slug: slug.into(),
            title: slug.into(),
            context: "ctx".into(),
            problem: "prob".into(),
            solution: "sol".into(),
            cover: None,
            sort_key: 1,
            source_dir: format!("case-studies/010-{slug}"),
        }
    }

    fn manifest() -> Manifest {
        Manifest {
            about: Some("# Hi\n\nI build **things**.".into()),
            projects: vec![
                project("dash", "data", 3, None),
                project("churn", "data", 0, Some("https://github.com/jane/churn")),
                project("api", "backend", 1, None),
            ],
            case_studies: vec![study("alpha"), study("beta")],
            skills: Skills {
                groups: vec![SkillGroup {
                    name: "Technical".into(),
                    accent: Default::default(),
                    skills: vec![Skill {
                        name: "Rust".into(),
                        level: 75,
                    }],
                }],
                tools: vec!["Git".into()],
            },
            assets: vec!["favicon.svg".into()],
            config: SiteConfig::default(),
        }
    }

    fn page() -> String {
        render_page(&manifest(), 2026).into_string()
    }

    // =========================================================================
    // Layout
    // =========================================================================

    #[test]
    fn page_has_every_section() {
        let html = page();
        assert!(html.starts_with("<!DOCTYPE html>"));
        for (id, _) in SECTIONS {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing section {id}");
            assert!(html.contains(&format!("href=\"#{id}\"")), "missing nav link {id}");
        }
    }

    #[test]
    fn nav_skips_sections_without_content() {
        let mut m = manifest();
        m.about = None;
        m.case_studies.clear();
        m.skills = Skills::default();
        let html = render_page(&m, 2026).into_string();
        for id in ["about", "case-studies", "skills"] {
            assert!(!html.contains(&format!("href=\"#{id}\"")), "dangling nav link {id}");
            assert!(!html.contains(&format!("id=\"{id}\"")));
        }
        assert!(html.contains("href=\"#projects\" data-section=\"projects\""));
        assert!(html.contains("id=\"navbar\""));
        assert!(html.contains("id=\"contact-form\""));
    }

    #[test]
    fn fixture_page_ids_are_unique() {
        let tmp = crate::test_helpers::setup_fixtures();
        let manifest = crate::scan::scan(tmp.path()).unwrap();
        let html = render_page(&manifest, 2026).into_string();
        let ids: Vec<&str> = html
            .split(" id=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .collect();
        let mut seen = std::collections::HashSet::new();
        for id in &ids {
            assert!(seen.insert(*id), "duplicate id {id}");
        }
        assert!(ids.contains(&"skills-soft-skills"));
        assert!(ids.contains(&"filter-backend"));
    }

    #[test]
    fn nav_carries_scroll_timing() {
        let html = page();
        assert!(html.contains("data-offset=\"-70\""));
        assert!(html.contains("data-duration=\"500\""));
    }

    #[test]
    fn about_markdown_rendered() {
        let html = page();
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("<strong>things</strong>"));
    }

    #[test]
    fn about_section_omitted_without_markdown() {
        let mut m = manifest();
        m.about = None;
        let html = render_page(&m, 2026).into_string();
        assert!(!html.contains("id=\"about\""));
    }

    #[test]
    fn hero_roles_first_active() {
        let html = page();
        assert!(html.contains("data-rotate=\"3000\""));
        assert!(html.contains("<span class=\"role active\">Visual Storyteller</span>"));
        assert!(html.contains("<span class=\"role\">Problem Solver</span>"));
    }

    #[test]
    fn cursor_follows_background_config() {
        assert!(page().contains("<div class=\"custom-cursor\" aria-hidden=\"true\"></div>"));
        let mut m = manifest();
        m.config.background.cursor = false;
        assert!(!render_page(&m, 2026).into_string().contains("class=\"custom-cursor\""));
    }

    #[test]
    fn particles_follow_background_config() {
        assert!(page().contains("data-count=\"60\""));
        let mut m = manifest();
        m.config.background.particles = false;
        assert!(!render_page(&m, 2026).into_string().contains("<canvas"));
    }

    // =========================================================================
    // Projects
    // =========================================================================

    #[test]
    fn default_filter_is_checked() {
        let html = page();
        assert!(html.contains("id=\"filter-data\" checked"));
        assert!(!html.contains("id=\"filter-backend\" checked"));
    }

    #[test]
    fn panels_hold_filtered_projects_in_order() {
        let html = page();
        let data = html.find("class=\"project-grid panel-data\"").unwrap();
        let backend = html.find("class=\"project-grid panel-backend\"").unwrap();
        let dash = html.find("id=\"project-dash\"").unwrap();
        let churn = html.find("id=\"project-churn\"").unwrap();
        let api = html.find("id=\"project-api\"").unwrap();
        assert!(data < dash && dash < churn && churn < backend && backend < api);
        // The ux category exists but is empty.
        assert!(html.contains("Nothing here yet."));
    }

    #[test]
    fn view_project_opens_link_or_gallery() {
        let html = page();
        assert!(html.contains("href=\"https://github.com/jane/churn\""));
        assert!(html.contains("href=\"#gallery-dash-0\""));
        assert!(!html.contains("gallery-churn-0"));
    }

    #[test]
    fn gallery_slides_wrap_around() {
        let html = page();
        assert!(html.contains("id=\"gallery-dash-0\" data-prev=\"#gallery-dash-2\" data-next=\"#gallery-dash-1\""));
        assert!(html.contains("id=\"gallery-dash-2\" data-prev=\"#gallery-dash-1\" data-next=\"#gallery-dash-0\""));
    }

    #[test]
    fn single_image_gallery_has_no_arrows() {
        let m = Manifest {
            projects: vec![project("solo", "data", 1, None)],
            case_studies: vec![],
            ..manifest()
        };
        let html = render_gallery_modal(&m.projects[0]).into_string();
        assert!(html.contains("gallery-solo-0"));
        assert!(!html.contains("class=\"arrow prev\""));
    }

    #[test]
    fn thumbnail_strip_marks_active() {
        let html = render_gallery_modal(&project("dash", "data", 2, None)).into_string();
        let second_slide = html.find("id=\"gallery-dash-1\"").unwrap();
        let tail = &html[second_slide..];
        let active = tail.find("class=\"thumb active\" href=\"#gallery-dash-1\"");
        assert!(active.is_some());
    }

    #[test]
    fn filter_css_per_category() {
        let css = filter_css(&[Category::new("data", "Data"), Category::new("ux", "UX")]);
        assert!(css.contains("#filter-data:checked ~ .filter-panels .panel-data"));
        assert!(css.contains("label[for=\"filter-ux\"]"));
    }

    // =========================================================================
    // Case studies, skills, contact
    // =========================================================================

    #[test]
    fn case_study_carousel_links() {
        let html = render_case_studies(&[study("alpha"), study("beta")]).into_string();
        assert!(html.contains("id=\"case-alpha\""));
        assert!(html.contains("href=\"#case-beta\""));
        assert!(html.contains("class=\"dot\""));
        assert!(html.contains("Problem"));
    }

    #[test]
    fn case_studies_omitted_when_empty() {
        assert!(render_case_studies(&[]).into_string().is_empty());
    }

    #[test]
    fn skills_bars_and_tools() {
        let html = page();
        assert!(html.contains("style=\"width: 75%\""));
        assert!(html.contains("skill-panel slide accent-primary"));
        assert!(html.contains("Tools I use"));
    }

    #[test]
    fn contact_form_carries_relay_settings() {
        let html = page();
        assert!(html.contains("data-service-id=\"service_pczntgr\""));
        assert!(html.contains("data-template-id=\"template_cubxa37\""));
        assert!(html.contains("data-public-key=\"AJH9lTR28X2cI5Lre\""));
        assert!(html.contains("data-payload=\"standard\""));
        assert!(html.contains("data-reset-delay=\"5000\""));
        assert!(html.contains("Message sent successfully!"));
        assert!(html.contains("Failed to send message. Please try again later."));
        assert!(html.contains("button.textContent = 'Sending...'"));
    }

    #[test]
    fn footer_has_year() {
        assert!(page().contains("© 2026"));
    }

    #[test]
    fn text_is_escaped() {
        let mut m = manifest();
        m.projects[0].title = "<script>".into();
        let html = render_page(&m, 2026).into_string();
        assert!(html.contains("&lt;script&gt;"));
    }

    // =========================================================================
    // Files
    // =========================================================================

    #[test]
    fn generate_writes_index_and_copies_images() {
        let tmp = tempfile::TempDir::new().unwrap();
        let processed = tmp.path().join("processed");
        let source = tmp.path().join("content");
        let out = tmp.path().join("dist");
        fs::create_dir_all(processed.join("projects/dash")).unwrap();
        fs::write(processed.join("projects/dash/001-800.avif"), "img").unwrap();
        fs::write(processed.join(".cache-manifest.json"), "{}").unwrap();
        fs::create_dir_all(source.join("assets")).unwrap();
        fs::write(source.join("assets/favicon.svg"), "<svg/>").unwrap();
        let manifest_path = processed.join("manifest.json");
        fs::write(&manifest_path, serde_json::to_string(&manifest()).unwrap()).unwrap();

        generate(&manifest_path, &processed, &out, &source).unwrap();

        assert!(out.join("index.html").exists());
        assert!(out.join("projects/dash/001-800.avif").exists());
        assert!(out.join("favicon.svg").exists());
        assert!(!out.join("manifest.json").exists());
        assert!(!out.join(".cache-manifest.json").exists());
    }
}
