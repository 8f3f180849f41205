//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is layered over the stock defaults, so it only needs
//! the keys the site owner wants to change:
//!
//! ```text
//! content/
//! ├── config.toml        # Overrides stock defaults
//! ├── about.md
//! ├── skills.toml
//! ├── projects/
//! └── case-studies/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! title = "Portfolio"
//! owner = "Your Name"
//!
//! [hero]
//! roles = ["Visual Storyteller", "Problem Solver"]
//! rotate_ms = 3000
//!
//! [contact]
//! payload = "standard"      # or "reply_to"
//! reset_delay_ms = 5000
//!
//! [relay]
//! service_id = "service_pczntgr"
//! template_id = "template_cubxa37"
//! public_key = "AJH9lTR28X2cI5Lre"
//!
//! [scroll]
//! offset = -70
//! duration_ms = 500
//!
//! [projects]
//! default_filter = "data"
//!
//! [[projects.categories]]
//! tag = "data"
//! label = "Data Projects"
//! ```
//!
//! Arrays (categories, socials, roles) replace the default list wholesale
//! rather than merging element by element. Unknown keys are rejected to catch
//! typos early.
//!
//! ## Environment Overrides
//!
//! The three relay identifiers can be supplied at build time instead of being
//! committed to the content repository:
//!
//! | Variable | Field |
//! |---|---|
//! | `FOLIO_EMAILJS_SERVICE_ID` | `relay.service_id` |
//! | `FOLIO_EMAILJS_TEMPLATE_ID` | `relay.template_id` |
//! | `FOLIO_EMAILJS_PUBLIC_KEY` | `relay.public_key` |

use crate::naming::slugify;
use crate::relay::PayloadShape;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

pub const ENV_SERVICE_ID: &str = "FOLIO_EMAILJS_SERVICE_ID";
pub const ENV_TEMPLATE_ID: &str = "FOLIO_EMAILJS_TEMPLATE_ID";
pub const ENV_PUBLIC_KEY: &str = "FOLIO_EMAILJS_PUBLIC_KEY";

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteMeta,
    pub hero: HeroConfig,
    pub contact: ContactConfig,
    pub relay: RelayConfig,
    pub scroll: ScrollConfig,
    pub background: BackgroundConfig,
    pub projects: ProjectsConfig,
    pub thumbnails: ThumbnailsConfig,
    pub images: ImagesConfig,
    pub colors: ColorConfig,
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Validation(msg.into()));

        if self.projects.categories.is_empty() {
            return invalid("projects.categories must declare at least one category");
        }
        // Tags become radio ids and panel classes through their slug.
        for (i, cat) in self.projects.categories.iter().enumerate() {
            let slug = slugify(&cat.tag);
            if slug.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "projects.categories tag \"{}\" needs at least one ASCII letter or digit",
                    cat.tag
                )));
            }
            if let Some(prev) = self.projects.categories[..i]
                .iter()
                .find(|c| slugify(&c.tag) == slug)
            {
                return Err(ConfigError::Validation(format!(
                    "projects.categories declares \"{}\" twice (as \"{}\" and \"{}\")",
                    slug, prev.tag, cat.tag
                )));
            }
        }
        if !self.projects.is_declared(&self.projects.default_filter) {
            return Err(ConfigError::Validation(format!(
                "projects.default_filter \"{}\" is not a declared category",
                self.projects.default_filter
            )));
        }
        if self.images.quality > 100 {
            return invalid("images.quality must be 0-100");
        }
        if self.thumbnails.aspect_ratio[0] == 0 || self.thumbnails.aspect_ratio[1] == 0 {
            return invalid("thumbnails.aspect_ratio values must be non-zero");
        }
        if self.thumbnails.size == 0 {
            return invalid("thumbnails.size must be non-zero");
        }
        if self.images.sizes.is_empty() {
            return invalid("images.sizes must not be empty");
        }
        if self.scroll.duration_ms == 0 {
            return invalid("scroll.duration_ms must be greater than 0");
        }
        if self.contact.reset_delay_ms == 0 {
            return invalid("contact.reset_delay_ms must be greater than 0");
        }
        if self.hero.rotate_ms == 0 {
            return invalid("hero.rotate_ms must be greater than 0");
        }
        if self.relay.endpoint.trim().is_empty() {
            return invalid("relay.endpoint must not be empty");
        }
        if self.background.particles && self.background.colors.is_empty() {
            return invalid("background.colors must not be empty when particles are enabled");
        }
        if self.colors.entries().iter().any(|(_, v)| v.trim().is_empty()) {
            return invalid("colors values must not be empty");
        }
        Ok(())
    }

    /// Replace relay identifiers with values from the environment, if set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with an
    /// injectable lookup.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (key, field) in [
            (ENV_SERVICE_ID, &mut self.relay.service_id),
            (ENV_TEMPLATE_ID, &mut self.relay.template_id),
            (ENV_PUBLIC_KEY, &mut self.relay.public_key),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                tracing::debug!("{key} overrides relay config");
                *field = value;
            }
        }
    }
}

/// Page-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    /// `<title>` and navbar brand.
    pub title: String,
    /// Name shown in the hero and the copyright line.
    pub owner: String,
    /// `<meta name="description">`.
    pub description: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            owner: "Your Name".to_string(),
            description: "Projects, case studies and skills.".to_string(),
        }
    }
}

/// Landing section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeroConfig {
    pub greeting: String,
    /// Rotating role lines, shown one at a time.
    pub roles: Vec<String>,
    /// Milliseconds each role stays on screen.
    pub rotate_ms: u64,
    pub tagline: String,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            greeting: "Hello, I'm".to_string(),
            roles: vec![
                "Visual Storyteller".to_string(),
                "A Developer in Progress".to_string(),
                "Problem Solver".to_string(),
                "Exploring the World of AI".to_string(),
            ],
            rotate_ms: 3000,
            tagline: "Growing into design, data, and development.".to_string(),
        }
    }
}

/// Contact section and form behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    pub email: String,
    pub location: String,
    pub intro: String,
    /// Field names the relay template expects.
    pub payload: PayloadShape,
    /// How long the success message stays before the form returns to idle.
    pub reset_delay_ms: u64,
    pub socials: Vec<SocialLink>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            location: String::new(),
            intro: "Have a project in mind or just want to say hello? Send a message.".to_string(),
            payload: PayloadShape::Standard,
            reset_delay_ms: 5000,
            socials: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

/// Mail-relay identifiers and transport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub endpoint: String,
    /// Request timeout for the `contact` command. The page uses the browser default.
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            service_id: "service_pczntgr".to_string(),
            template_id: "template_cubxa37".to_string(),
            public_key: "AJH9lTR28X2cI5Lre".to_string(),
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Smooth-scroll behaviour for in-page navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Pixel offset applied to the target section (negative clears the fixed header).
    pub offset: i32,
    pub duration_ms: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            offset: -70,
            duration_ms: 500,
        }
    }
}

/// Decorative particle canvas behind the hero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    pub particles: bool,
    pub colors: Vec<String>,
    pub count: u32,
    /// Maximum distance in pixels at which two particles are linked.
    pub link_distance: u32,
    /// Ring that trails the mouse pointer on wide, fine-pointer screens.
    pub cursor: bool,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            particles: true,
            colors: vec!["#00FF94".to_string(), "#FF00F5".to_string()],
            count: 60,
            link_distance: 150,
            cursor: true,
        }
    }
}

/// Project grid settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectsConfig {
    /// Tab selected when the page loads.
    pub default_filter: String,
    /// The closed set of category tags projects may use, in tab order.
    pub categories: Vec<Category>,
}

impl ProjectsConfig {
    pub fn is_declared(&self, tag: &str) -> bool {
        self.categories.iter().any(|c| c.tag == tag)
    }

    pub fn label(&self, tag: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.tag == tag)
            .map(|c| c.label.as_str())
    }
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            default_filter: "data".to_string(),
            categories: vec![
                Category::new("data", "Data Projects"),
                Category::new("backend", "Backend Projects"),
                Category::new("ux", "UX Projects"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub tag: String,
    pub label: String,
}

impl Category {
    pub fn new(tag: &str, label: &str) -> Self {
        Self {
            tag: tag.to_string(),
            label: label.to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Card thumbnail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Aspect ratio as `[width, height]`.
    pub aspect_ratio: [u32; 2],
    /// Width in pixels of the short side of the crop.
    pub size: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: [16, 10],
            size: 400,
        }
    }
}

/// Display image settings for the gallery modal and case-study covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Pixel widths (longer edge) to generate for `srcset`.
    pub sizes: Vec<u32>,
    /// AVIF encoding quality (0 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            sizes: vec![800, 1400],
            quality: 85,
        }
    }
}

/// The site's single dark palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_muted: String,
    pub border: String,
    /// Accent for links, active tabs, and the first skill group.
    pub primary: String,
    /// Second accent, used for alternate skill groups and highlights.
    pub secondary: String,
    pub success: String,
    pub error: String,
}

impl ColorConfig {
    fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("background", &self.background),
            ("surface", &self.surface),
            ("text", &self.text),
            ("text-muted", &self.text_muted),
            ("border", &self.border),
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("success", &self.success),
            ("error", &self.error),
        ]
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            surface: "#151515".to_string(),
            text: "#f5f5f5".to_string(),
            text_muted: "#a3a3a3".to_string(),
            border: "#262626".to_string(),
            primary: "#00FF94".to_string(),
            secondary: "#FF00F5".to_string(),
            success: "#4ade80".to_string(),
            error: "#f87171".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value and deserialize.
///
/// Does not validate: environment overrides are applied between resolving
/// and validating.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// applies environment overrides, and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let mut config = resolve_config(stock_defaults_value()?, load_raw_config(root)?)?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
# Lists (roles, socials, categories, colors) replace the default list entirely.

# ---------------------------------------------------------------------------
# Page metadata
# ---------------------------------------------------------------------------
[site]
title = "Portfolio"
owner = "Your Name"
description = "Projects, case studies and skills."

# ---------------------------------------------------------------------------
# Hero (landing section)
# ---------------------------------------------------------------------------
[hero]
greeting = "Hello, I'm"
# Shown one at a time, cycling every rotate_ms milliseconds.
roles = [
    "Visual Storyteller",
    "A Developer in Progress",
    "Problem Solver",
    "Exploring the World of AI",
]
rotate_ms = 3000
tagline = "Growing into design, data, and development."

# ---------------------------------------------------------------------------
# Contact section
# ---------------------------------------------------------------------------
[contact]
email = ""
location = ""
intro = "Have a project in mind or just want to say hello? Send a message."
# Field names sent to the mail relay template:
#   "standard" -> name, email, subject, message
#   "reply_to" -> from_name, reply_to, subject, message
payload = "standard"
# How long the success message stays before the form returns to idle.
reset_delay_ms = 5000
socials = []
# [[contact.socials]]
# label = "GitHub"
# url = "https://github.com/you"

# ---------------------------------------------------------------------------
# Mail relay (EmailJS)
# ---------------------------------------------------------------------------
# The three identifiers can also be set with FOLIO_EMAILJS_SERVICE_ID,
# FOLIO_EMAILJS_TEMPLATE_ID and FOLIO_EMAILJS_PUBLIC_KEY.
[relay]
service_id = "service_pczntgr"
template_id = "template_cubxa37"
public_key = "AJH9lTR28X2cI5Lre"
endpoint = "https://api.emailjs.com/api/v1.0/email/send"
# Request timeout for `folio contact`.
timeout_secs = 15

# ---------------------------------------------------------------------------
# In-page scrolling
# ---------------------------------------------------------------------------
[scroll]
# Negative offset keeps section headings clear of the fixed navbar.
offset = -70
duration_ms = 500

# ---------------------------------------------------------------------------
# Hero background
# ---------------------------------------------------------------------------
[background]
particles = true
colors = ["#00FF94", "#FF00F5"]
count = 60
link_distance = 150
# Ring that follows the mouse pointer (hidden on touch and narrow screens).
cursor = true

# ---------------------------------------------------------------------------
# Projects
# ---------------------------------------------------------------------------
[projects]
# Tab selected on page load. Must be one of the declared tags.
default_filter = "data"

# Every project's category must be one of these tags.
[[projects.categories]]
tag = "data"
label = "Data Projects"

[[projects.categories]]
tag = "backend"
label = "Backend Projects"

[[projects.categories]]
tag = "ux"
label = "UX Projects"

# ---------------------------------------------------------------------------
# Card thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Aspect ratio as [width, height] for thumbnail crops.
aspect_ratio = [16, 10]
# Short-edge size of the crop in pixels.
size = 400

# ---------------------------------------------------------------------------
# Display images (gallery modal, case-study covers)
# ---------------------------------------------------------------------------
[images]
# Pixel widths (longer edge) to generate for srcset.
sizes = [800, 1400]
# AVIF encoding quality (0 = worst, 100 = best).
quality = 85

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#0a0a0a"
surface = "#151515"
text = "#f5f5f5"
text_muted = "#a3a3a3"
border = "#262626"
primary = "#00FF94"
secondary = "#FF00F5"
success = "#4ade80"
error = "#f87171"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let mut css = String::from(":root {\n");
    for (name, value) in colors.entries() {
        css.push_str(&format!("    --color-{name}: {value};\n"));
    }
    css.push('}');
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_original_site() {
        let config = SiteConfig::default();
        assert_eq!(config.projects.default_filter, "data");
        assert_eq!(config.scroll.offset, -70);
        assert_eq!(config.scroll.duration_ms, 500);
        assert_eq!(config.contact.reset_delay_ms, 5000);
        assert_eq!(config.contact.payload, PayloadShape::Standard);
        assert_eq!(config.hero.rotate_ms, 3000);
        assert_eq!(config.background.link_distance, 150);
        assert_eq!(config.relay.service_id, "service_pczntgr");
    }

    #[test]
    fn default_categories_and_labels() {
        let projects = ProjectsConfig::default();
        let tags: Vec<_> = projects.categories.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["data", "backend", "ux"]);
        assert_eq!(projects.label("ux"), Some("UX Projects"));
        assert_eq!(projects.label("mobile"), None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[colors]
primary = "#33ccff"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.colors.primary, "#33ccff");
        assert_eq!(config.colors.secondary, "#FF00F5");
        assert_eq!(config.images.sizes, vec![800, 1400]);
    }

    #[test]
    fn parse_reply_to_payload() {
        let toml = r#"
[contact]
payload = "reply_to"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.contact.payload, PayloadShape::ReplyTo);
    }

    #[test]
    fn parse_socials() {
        let toml = r#"
[[contact.socials]]
label = "GitHub"
url = "https://github.com/jane"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.contact.socials.len(), 1);
        assert_eq!(config.contact.socials[0].label, "GitHub");
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.primary = "#123456".to_string();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-primary: #123456;"));
        assert!(css.contains("--color-text-muted: #a3a3a3;"));
        assert!(css.starts_with(":root {"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.projects.categories.len(), 3);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[site]
owner = "Jane Doe"

[scroll]
offset = -80
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.owner, "Jane Doe");
        assert_eq!(config.scroll.offset, -80);
        assert_eq!(config.scroll.duration_ms, 500);
    }

    #[test]
    fn categories_replace_defaults_wholesale() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[projects]
default_filter = "mobile"

[[projects.categories]]
tag = "mobile"
label = "Mobile Apps"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.projects.categories, vec![Category::new("mobile", "Mobile Apps")]);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Environment overrides
    // =========================================================================

    #[test]
    fn overrides_replace_relay_ids() {
        let env: HashMap<&str, &str> = [
            (ENV_SERVICE_ID, "service_env"),
            (ENV_PUBLIC_KEY, "pk_env"),
        ]
        .into();
        let mut config = SiteConfig::default();
        config.apply_overrides_from(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.relay.service_id, "service_env");
        assert_eq!(config.relay.template_id, "template_cubxa37");
        assert_eq!(config.relay.public_key, "pk_env");
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut config = SiteConfig::default();
        config.apply_overrides_from(|_| Some("  ".to_string()));
        assert_eq!(config.relay.service_id, "service_pczntgr");
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[images]
sizes = [800, 1400]
quality = 90
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[images]
quality = 70
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let images = merged.get("images").unwrap();
        assert_eq!(images.get("quality").unwrap().as_integer(), Some(70));
        assert_eq!(images.get("sizes").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str(r#"roles = ["a", "b", "c"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"roles = ["z"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("roles").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[scroll]\nofset = -70\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[theme]\ngap = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_payload_shape_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[contact]\npayload = \"fancy\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_default_filter_must_be_declared() {
        let mut config = SiteConfig::default();
        config.projects.default_filter = "mobile".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mobile"));
    }

    #[test]
    fn validate_duplicate_category() {
        let mut config = SiteConfig::default();
        config.projects.categories.push(Category::new("ux", "Again"));
        assert!(config.validate().unwrap_err().to_string().contains("twice"));
    }

    #[test]
    fn validate_categories_colliding_by_slug() {
        let mut config = SiteConfig::default();
        config.projects.categories.push(Category::new("Data", "Data Again"));
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("twice"), "{err}");
        assert!(err.contains("\"data\" and \"Data\""), "{err}");
    }

    #[test]
    fn validate_category_without_slug_rejected() {
        let mut config = SiteConfig::default();
        config.projects.categories.push(Category::new("数据", "Data"));
        assert!(config.validate().is_err());
        config.projects.categories.pop();
        config.projects.categories.push(Category::new("  ", "Blank"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_categories() {
        let mut config = SiteConfig::default();
        config.projects.categories.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_quality_too_high() {
        let mut config = SiteConfig::default();
        config.images.quality = 101;
        assert!(config.validate().unwrap_err().to_string().contains("quality"));
    }

    #[test]
    fn validate_aspect_ratio_zero() {
        let mut config = SiteConfig::default();
        config.thumbnails.aspect_ratio = [0, 5];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_durations() {
        let mut config = SiteConfig::default();
        config.scroll.duration_ms = 0;
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.contact.reset_delay_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_particles_need_colors() {
        let mut config = SiteConfig::default();
        config.background.colors.clear();
        assert!(config.validate().is_err());
        config.background.particles = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_empty_color_rejected() {
        let mut config = SiteConfig::default();
        config.colors.surface = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[images]\nquality = 200\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.hero.roles, defaults.hero.roles);
        assert_eq!(config.projects.categories, defaults.projects.categories);
        assert_eq!(config.relay, defaults.relay);
        assert_eq!(config.images.sizes, defaults.images.sizes);
        assert_eq!(config.thumbnails.aspect_ratio, defaults.thumbnails.aspect_ratio);
        assert_eq!(config.colors.primary, defaults.colors.primary);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        for section in [
            "site",
            "hero",
            "contact",
            "relay",
            "scroll",
            "background",
            "projects",
            "thumbnails",
            "images",
            "colors",
            "processing",
        ] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }
}
