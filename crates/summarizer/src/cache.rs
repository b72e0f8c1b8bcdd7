use indexmap::IndexMap;
use noter_common::Result;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Maximum number of cached summaries
pub const CACHE_SIZE: usize = 1000;

/// Persisted memoization cache for summaries
///
/// Keys combine the backend's model key with a content digest of the input,
/// so different models never share entries. When full, the entry inserted
/// earliest is evicted (FIFO by insertion order, not LRU). Saves overwrite
/// the whole file; concurrent writers race with last-write-wins, which only
/// ever costs redundant work.
#[derive(Debug)]
pub struct SummaryCache {
    entries: IndexMap<String, String>,
    file_path: PathBuf,
    capacity: usize,
}

impl SummaryCache {
    /// Load the cache from a file, starting empty if absent
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!("Discarding unreadable summary cache: {}", e);
                IndexMap::new()
            }),
            Err(_) => IndexMap::new(),
        };

        Self {
            entries,
            file_path: path.to_path_buf(),
            capacity: CACHE_SIZE,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_capacity(path: &Path, capacity: usize) -> Self {
        let mut cache = Self::load(path);
        cache.capacity = capacity;
        cache
    }

    /// Cache key for a text + optional context under a model key
    pub fn key(model_key: &str, text: &str, context: Option<&str>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        if let Some(context) = context {
            hasher.update(context.as_bytes());
        }
        format!("{}__{}", model_key, hex::encode(hasher.finalize()))
    }

    /// Look up a cached summary
    pub fn get(&self, key: &str) -> Option<&String> {
        self.entries.get(key)
    }

    /// Insert a summary, evicting the oldest entry when full, and persist
    pub fn insert(&mut self, key: String, value: String) -> Result<()> {
        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, value);
        self.save()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn save(&self) -> Result<()> {
        let data = serde_json::to_string(&self.entries)?;
        std::fs::write(&self.file_path, data)?;
        Ok(())
    }
}
