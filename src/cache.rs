//! Content-addressed cache of encoded images.
//!
//! AVIF encoding dominates build time. Each encoded file is recorded under
//! two SHA-256 hashes: the source file's contents and the encoding
//! parameters. A later build that asks for the same pair can reuse the file
//! instead of encoding again:
//!
//! - same pair, same output path, file still on disk → **hit**
//! - same pair, file on disk under a different path (project renamed,
//!   image renumbered) → **copy** to the new path
//! - anything else → **miss**, encode and record
//!
//! Hashing contents rather than mtimes keeps the cache valid across
//! `git checkout`. The record lives at `<processed>/.cache-manifest.json`;
//! `--no-cache` starts from an empty record.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

const MANIFEST_FILENAME: &str = ".cache-manifest.json";

/// Bump to invalidate every existing cache.
const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
}

impl CacheEntry {
    fn key(&self) -> String {
        content_key(&self.source_hash, &self.params_hash)
    }
}

fn content_key(source_hash: &str, params_hash: &str) -> String {
    format!("{source_hash}:{params_hash}")
}

/// Output path → hashes, plus a reverse index built on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
    #[serde(skip)]
    by_content: HashMap<String, String>,
}

/// How a planned output was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    /// Reusable file exists at this other relative path.
    CopyFrom(String),
    Miss,
}

impl CacheManifest {
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
            by_content: HashMap::new(),
        }
    }

    /// Load from `output_dir`. Missing, unreadable, or outdated records
    /// yield an empty cache.
    pub fn load(output_dir: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(output_dir.join(MANIFEST_FILENAME)) else {
            return Self::empty();
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(mut manifest) if manifest.version == MANIFEST_VERSION => {
                manifest.by_content = manifest
                    .entries
                    .iter()
                    .map(|(path, entry)| (entry.key(), path.clone()))
                    .collect();
                manifest
            }
            Ok(_) => {
                tracing::debug!("cache manifest version changed, starting fresh");
                Self::empty()
            }
            Err(e) => {
                tracing::warn!("ignoring unreadable cache manifest: {e}");
                Self::empty()
            }
        }
    }

    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(output_dir.join(MANIFEST_FILENAME), json)
    }

    /// Decide whether `rel_path` needs encoding.
    pub fn lookup(
        &self,
        rel_path: &str,
        source_hash: &str,
        params_hash: &str,
        output_dir: &Path,
    ) -> Lookup {
        let Some(stored) = self.by_content.get(&content_key(source_hash, params_hash)) else {
            return Lookup::Miss;
        };
        if !output_dir.join(stored).exists() {
            return Lookup::Miss;
        }
        if stored == rel_path {
            Lookup::Hit
        } else {
            Lookup::CopyFrom(stored.clone())
        }
    }

    /// Record that `rel_path` now holds the output for this hash pair.
    ///
    /// A previous path for the same content is forgotten.
    pub fn record(&mut self, rel_path: String, source_hash: String, params_hash: String) {
        let entry = CacheEntry {
            source_hash,
            params_hash,
        };
        let key = entry.key();
        if let Some(old) = self.by_content.get(&key)
            && *old != rel_path
        {
            self.entries.remove(old.as_str());
        }
        self.by_content.insert(key, rel_path.clone());
        self.entries.insert(rel_path, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// SHA-256 of a file's contents as lowercase hex.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// Parameter hash for a display variant: target width and quality.
pub fn hash_display_params(target: u32, quality: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"display\0");
    hasher.update(target.to_le_bytes());
    hasher.update(quality.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Parameter hash for a card thumbnail: crop shape, quality, sharpening.
pub fn hash_thumbnail_params(
    aspect: (u32, u32),
    short_edge: u32,
    quality: u32,
    sharpening: Option<(f32, i32)>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"thumbnail\0");
    for n in [aspect.0, aspect.1, short_edge, quality] {
        hasher.update(n.to_le_bytes());
    }
    if let Some((sigma, threshold)) = sharpening {
        hasher.update([1u8]);
        hasher.update(sigma.to_le_bytes());
        hasher.update(threshold.to_le_bytes());
    } else {
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

/// Per-build cache tally.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub copies: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn count(&mut self, lookup: &Lookup) {
        match lookup {
            Lookup::Hit => self.hits += 1,
            Lookup::CopyFrom(_) => self.copies += 1,
            Lookup::Miss => self.misses += 1,
        }
    }

    pub fn merge(&mut self, other: CacheStats) {
        self.hits += other.hits;
        self.copies += other.copies;
        self.misses += other.misses;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.copies + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.hits, self.copies) {
            (0, 0) => write!(f, "{} encoded", self.misses),
            (_, 0) => write!(
                f,
                "{} cached, {} encoded ({} total)",
                self.hits,
                self.misses,
                self.total()
            ),
            _ => write!(
                f,
                "{} cached, {} copied, {} encoded ({} total)",
                self.hits,
                self.copies,
                self.misses,
                self.total()
            ),
        }
    }
}
