//! Knowledge Store - the static question/answer table.
//!
//! Loads a JSON array of knowledge entries once and shares it read-only
//! across all requests. A missing or malformed resource is fatal: the
//! process must refuse to serve rather than answer from nothing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AppError;

/// One stored question/answer record.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeEntry {
    /// Opaque record identifier.
    pub id: String,
    /// Example phrasings this entry should match.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Subject tokens for the fast-path lookup, if declared.
    #[serde(default)]
    pub subject: Option<Vec<String>>,
    /// The reply text; may contain inline markup.
    pub answer: String,
}

/// Read-only knowledge table with an idempotent lazy load.
pub struct KnowledgeStore {
    path: PathBuf,
    entries: OnceLock<Vec<KnowledgeEntry>>,
}

impl KnowledgeStore {
    /// Create a store backed by the given resource path. Nothing is read
    /// until the first `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: OnceLock::new(),
        }
    }

    /// Load and return the knowledge table. Safe to call repeatedly; the
    /// first successful parse wins and later calls return the same slice.
    pub fn load(&self) -> Result<&[KnowledgeEntry], AppError> {
        if let Some(entries) = self.entries.get() {
            return Ok(entries);
        }

        let parsed = Self::read_entries(&self.path)?;
        Ok(self.entries.get_or_init(|| parsed))
    }

    fn read_entries(path: &Path) -> Result<Vec<KnowledgeEntry>, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("cannot read {}: {}", path.display(), e))
        })?;

        let records: Vec<KnowledgeEntry> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Knowledge(format!("malformed resource {}: {}", path.display(), e))
        })?;

        let total = records.len();
        let entries: Vec<KnowledgeEntry> = records
            .into_iter()
            .filter(|entry| {
                if entry.patterns.is_empty() {
                    warn!(id = %entry.id, "skipping knowledge entry without patterns");
                    false
                } else {
                    true
                }
            })
            .collect();

        if entries.is_empty() {
            warn!(path = %path.display(), "knowledge table is empty, every question will fall back");
        } else {
            info!(
                loaded = entries.len(),
                skipped = total - entries.len(),
                "knowledge table loaded"
            );
        }

        Ok(entries)
    }
}
