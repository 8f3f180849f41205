//! The `NNN-name` ordering convention and slug derivation.
//!
//! Project directories, case-study directories, and gallery images are all
//! ordered by a numeric prefix:
//!
//! ```text
//! projects/010-Sales-Dashboard/   → #10, "Sales Dashboard", slug "sales-dashboard"
//! projects/010-Sales-Dashboard/002-Filters.png → image #2, caption "Filters"
//! ```
//!
//! Entries without a prefix are skipped by the scanner so drafts can sit next
//! to published work.

/// Result of parsing a numbered entry name like `020-Sales-Dashboard`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present.
    pub number: Option<u32>,
    /// Raw name part after `NNN-`, dashes preserved. Empty if number-only.
    /// For unnumbered entries, this is the full input.
    pub name: String,
    /// Name with dashes converted to spaces.
    pub display_title: String,
}

/// Parse an entry name following the `NNN-name` convention.
///
/// - `"020-Sales-Dashboard"` → number=Some(20), display_title="Sales Dashboard"
/// - `"001"` / `"001-"` → number=Some(1), empty name
/// - `"drafts"` → number=None, name="drafts"
pub fn parse_entry_name(name: &str) -> ParsedName {
    let (prefix, rest) = name.split_once('-').unwrap_or((name, ""));
    match prefix.parse::<u32>() {
        Ok(number) => ParsedName {
            number: Some(number),
            name: rest.to_string(),
            display_title: rest.replace('-', " "),
        },
        Err(_) => ParsedName {
            number: None,
            name: name.to_string(),
            display_title: name.replace('-', " "),
        },
    }
}

/// URL- and id-safe slug: lowercase ASCII alphanumerics separated by single dashes.
///
/// Used for element ids (`#project-sales-dashboard`) and processed output paths.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
