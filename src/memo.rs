//! Durable translation memoization store.
//!
//! Unlike the TTL caches in [`crate::cache`], this store never expires:
//! a translation of a given text between a given language pair is
//! assumed stable forever, so records are written once and reread across
//! process restarts. Keyed on `(content hash, source lang, target lang)`
//! with upsert semantics — a second successful translation of the same
//! triple overwrites in place instead of duplicating, including under
//! concurrent writers (single lock around the map).
//!
//! Persistence is a JSON file written atomically (tmp + rename). Load is
//! tolerant: a missing file starts empty, a corrupt file logs a warning
//! and starts empty rather than failing startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::{Result, VitrineError};

/// One memoized translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// SHA-256 of the original text, hex-encoded.
    pub hash: String,
    pub source_lang: String,
    pub target_lang: String,
    pub original_text: String,
    pub translated_text: String,
}

impl TranslationRecord {
    fn key(&self) -> String {
        record_key(&self.hash, &self.source_lang, &self.target_lang)
    }
}

fn record_key(hash: &str, source: &str, target: &str) -> String {
    format!("{hash}:{source}:{target}")
}

/// Hex-encoded SHA-256 of a text — the memoization key component.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Default on-disk location: `{cache_dir}/vitrine/translations.json`.
pub fn default_store_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("vitrine")
        .join("translations.json")
}

/// Durable memoization table for translations.
pub struct TranslationStore {
    path: Option<PathBuf>,
    records: Mutex<HashMap<String, TranslationRecord>>,
}

impl TranslationStore {
    /// Open a file-backed store, loading any existing records.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load_records(&path);
        Self {
            path: Some(path),
            records: Mutex::new(records),
        }
    }

    /// An in-memory store with no persistence (tests, ephemeral use).
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a memoized translation.
    pub fn get(&self, hash: &str, source: &str, target: &str) -> Option<String> {
        let records = self.lock_records();
        records
            .get(&record_key(hash, source, target))
            .map(|r| r.translated_text.clone())
    }

    /// Insert or overwrite the record for its `(hash, source, target)`
    /// triple, then persist.
    ///
    /// The map insert and the file write happen under one lock, so two
    /// concurrent upserts of the same triple cannot interleave into a
    /// duplicate or a torn file.
    pub fn upsert(&self, record: TranslationRecord) -> Result<()> {
        let mut records = self.lock_records();
        records.insert(record.key(), record);
        if let Some(path) = &self.path {
            save_records(path, &records)?;
        }
        Ok(())
    }

    /// Number of memoized translations.
    pub fn len(&self) -> usize {
        self.lock_records().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A poisoned lock only means another thread panicked mid-write;
    /// the map itself is still valid, so keep serving instead of
    /// propagating the panic.
    fn lock_records(&self) -> MutexGuard<'_, HashMap<String, TranslationRecord>> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Load records from disk. Missing file → empty; corrupt file → warn +
/// empty.
fn load_records(path: &Path) -> HashMap<String, TranslationRecord> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read translation store");
            return HashMap::new();
        }
    };
    match serde_json::from_str::<Vec<TranslationRecord>>(&content) {
        Ok(list) => {
            debug!(count = list.len(), path = %path.display(), "loaded translation store");
            list.into_iter().map(|r| (r.key(), r)).collect()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt translation store, starting empty");
            HashMap::new()
        }
    }
}

/// Persist records to disk (atomic write via tmp + rename).
fn save_records(path: &Path, records: &HashMap<String, TranslationRecord>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            VitrineError::Storage(format!(
                "failed to create store dir {}: {e}",
                parent.display()
            ))
        })?;
    }

    let mut list: Vec<&TranslationRecord> = records.values().collect();
    // Stable on-disk order keeps diffs readable.
    list.sort_by(|a, b| a.key().cmp(&b.key()));

    let json = serde_json::to_string_pretty(&list)
        .map_err(|e| VitrineError::Storage(format!("failed to serialize store: {e}")))?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json).map_err(|e| {
        VitrineError::Storage(format!(
            "failed to write store file {}: {e}",
            tmp_path.display()
        ))
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        VitrineError::Storage(format!(
            "failed to rename store file {} → {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })?;

    Ok(())
}
