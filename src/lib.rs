//! # Folio
//!
//! A static site generator for single-page personal portfolios. One content
//! directory becomes one `index.html`: a hero with rotating roles, an about
//! section, a filterable project grid whose cards open image galleries, a
//! case-study carousel, skill panels and a contact form wired to a mail relay.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (filesystem → structured data)
//! 2. Process   manifest  →  processed/       (display sizes + thumbnails)
//! 3. Generate  manifest  →  dist/            (index.html + images + assets)
//! ```
//!
//! Each stage reads and writes a human-readable JSON manifest, so any stage can
//! be re-run alone and inspected.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks projects, case studies, skills and assets into a [`types::Manifest`] |
//! | [`process`] | Stage 2: AVIF display variants and card thumbnails, cached by content hash |
//! | [`generate`] | Stage 3: renders the page with Maud, copies images and assets |
//! | [`config`] | `config.toml` loading, stock defaults, env overrides, palette CSS |
//! | [`types`] | Manifest types shared by all stages |
//! | [`naming`] | `NNN-name` convention parser and slugs |
//! | [`filter`] | Category filter state and the filtered project view |
//! | [`navigator`] | Wrap-around index stepping for galleries and carousels |
//! | [`contact`] | Contact form validation and submission state machine |
//! | [`relay`] | Mail relay seam and its EmailJS client |
//! | [`cache`] | Content-addressed cache manifest for processed images |
//! | [`imaging`] | Pure-Rust resize, thumbnail and AVIF encode |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## No JavaScript Required for Navigation
//!
//! Filter tabs are radio inputs and gallery or carousel slides are `:target`
//! anchors, so filtering and stepping work with scripts disabled. The inline
//! script only adds smooth scrolling, keyboard shortcuts, role rotation, the
//! particle canvas and the asynchronous contact submission.
//!
//! ## Categories Are Declared
//!
//! Project categories are a closed set from `[[projects.categories]]`. A project
//! naming an undeclared tag fails the scan instead of producing a card that no
//! filter tab can reach.

pub mod cache;
pub mod config;
pub mod contact;
pub mod filter;
pub mod generate;
pub mod imaging;
pub mod naming;
pub mod navigator;
pub mod output;
pub mod process;
pub mod relay;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
