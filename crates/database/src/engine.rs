use indexmap::IndexMap;
use noter_common::{NoterError, Result, Storage};
use noter_embedder::Embedder;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::index::AngularIndex;
use crate::types::DocumentRecord;

/// Incremental vector database over the note collection
///
/// Maintains a persisted hash cache of `path -> {content digest, embedding}`
/// and an angular-distance index over the current embeddings. Change
/// detection is purely digest-based; the index is rebuilt from scratch
/// whenever any document is added, updated or removed, and always before it
/// is queried.
pub struct NoteDatabase {
    storage: Storage,
    embedder: Box<dyn Embedder>,
    documents: IndexMap<String, DocumentRecord>,
    index: AngularIndex,
    cache_file: PathBuf,
    index_file: PathBuf,
    need_rebuild: bool,
}

impl NoteDatabase {
    /// Create a database for the given storage and embedder
    ///
    /// Loads the persisted hash cache and index for this embedder's
    /// identifier if present. The index still counts as stale until the
    /// first rebuild.
    pub fn new(storage: Storage, embedder: Box<dyn Embedder>) -> Result<Self> {
        let embedder_id = embedder.identifier();
        let cache_file = storage.embedding_cache_file(&embedder_id);
        let index_file = storage.built_index_file(&embedder_id);

        let documents = Self::load_documents(&cache_file);
        let index = if index_file.exists() {
            AngularIndex::load(&index_file).unwrap_or_else(|e| {
                warn!("Discarding unreadable index file: {}", e);
                AngularIndex::new(embedder.dimension())
            })
        } else {
            AngularIndex::new(embedder.dimension())
        };

        info!(
            "Note database initialized - {} cached documents ({})",
            documents.len(),
            embedder_id
        );

        Ok(Self {
            storage,
            embedder,
            documents,
            index,
            cache_file,
            index_file,
            need_rebuild: true,
        })
    }

    /// Scan the note set, re-embed what changed, and refresh the index
    ///
    /// Reads every note and compares content digests against the cache;
    /// only changed or new notes are re-embedded. Entries for notes that no
    /// longer exist are dropped, which also marks the index stale - removed
    /// vectors would otherwise linger in it until the next unrelated change.
    /// An unreadable note aborts the whole call; the on-disk cache keeps its
    /// previous consistent state because it is only persisted at the end.
    pub fn build_or_update_index(&mut self) -> Result<()> {
        let all_notes = self.storage.all_notes()?;
        let mut updated = 0usize;

        for path in &all_notes {
            let abs_path = self.storage.note_abs_path(path);
            let text = std::fs::read_to_string(&abs_path).map_err(|e| {
                NoterError::file_system(format!(
                    "Failed to read note {}: {}",
                    abs_path.display(),
                    e
                ))
            })?;

            let hash = content_hash(&text);
            let stale = match self.documents.get(path) {
                Some(record) => record.hash != hash,
                None => true,
            };

            if stale {
                debug!("Embedding changed note: {}", path);
                let embedding = self.embedder.embed_text(&text)?;
                self.documents
                    .insert(path.clone(), DocumentRecord { hash, embedding });
                self.need_rebuild = true;
                updated += 1;
            }
        }

        // Prune entries for deleted or renamed notes
        let current: HashSet<&str> = all_notes.iter().map(|s| s.as_str()).collect();
        let before = self.documents.len();
        self.documents.retain(|path, _| current.contains(path.as_str()));
        let removed = before - self.documents.len();
        if removed > 0 {
            self.need_rebuild = true;
        }

        if self.need_rebuild {
            self.rebuild_index()?;
        }

        // Persisted unconditionally; a no-change run rewrites identical bytes
        self.save_documents()?;

        info!(
            "Index update complete - {} notes, {} embedded, {} removed",
            all_notes.len(),
            updated,
            removed
        );
        Ok(())
    }

    /// Rebuild the index from the cache and persist it
    ///
    /// Full rebuild: the old structure is discarded and every cached
    /// embedding is inserted in cache iteration order at slots `0..N-1`.
    pub fn rebuild_index(&mut self) -> Result<()> {
        debug!("Rebuilding vector index - {} documents", self.documents.len());

        let mut index = AngularIndex::new(self.embedder.dimension());
        for record in self.documents.values() {
            index.add_item(record.embedding.clone())?;
        }
        index.build();
        index.save(&self.index_file)?;

        self.index = index;
        self.need_rebuild = false;
        Ok(())
    }

    /// The `n` notes most similar to the query text
    ///
    /// Returns `(path, similarity)` pairs with similarity `1 / (1 + d)` over
    /// angular distance `d`, descending. The first retrieved neighbor is
    /// always dropped: when the query text is itself an indexed note, that
    /// neighbor is the note itself. When the query text is novel this drops
    /// the true nearest neighbor as well - a long-standing quirk kept for
    /// compatibility; use [`find_similar_excluding`](Self::find_similar_excluding)
    /// for exact path-based exclusion.
    pub fn find_similar(&mut self, query_text: &str, n: usize) -> Result<Vec<(String, f32)>> {
        if query_text.is_empty() {
            return Ok(Vec::new());
        }

        if self.need_rebuild {
            self.rebuild_index()?;
        }

        let query = self.embedder.embed_text(query_text)?;
        let neighbors = self.index.nearest(&query, n + 1)?;

        let mut results: Vec<(String, f32)> = neighbors
            .into_iter()
            .filter_map(|(slot, distance)| {
                self.documents
                    .get_index(slot)
                    .map(|(path, _)| (path.clone(), 1.0 / (1.0 + distance)))
            })
            .collect();

        if !results.is_empty() {
            results.remove(0); // exclude self
        }
        Ok(results)
    }

    /// Like [`find_similar`](Self::find_similar), but excludes by path
    ///
    /// Alternate self-exclusion mode: drops any result whose path equals
    /// `exclude_path` instead of dropping the first neighbor, so novel query
    /// text keeps its true nearest neighbor.
    pub fn find_similar_excluding(
        &mut self,
        query_text: &str,
        exclude_path: &str,
        n: usize,
    ) -> Result<Vec<(String, f32)>> {
        if query_text.is_empty() {
            return Ok(Vec::new());
        }

        if self.need_rebuild {
            self.rebuild_index()?;
        }

        let query = self.embedder.embed_text(query_text)?;
        let neighbors = self.index.nearest(&query, n + 1)?;

        let mut results: Vec<(String, f32)> = neighbors
            .into_iter()
            .filter_map(|(slot, distance)| {
                self.documents
                    .get_index(slot)
                    .map(|(path, _)| (path.clone(), 1.0 / (1.0 + distance)))
            })
            .filter(|(path, _)| path != exclude_path)
            .collect();

        results.truncate(n);
        Ok(results)
    }

    /// The `n` notes most similar to the contents of a file
    ///
    /// A nonexistent path yields an empty result, not an error.
    pub fn find_similar_to_file(&mut self, path: &Path, n: usize) -> Result<Vec<(String, f32)>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(path)?;
        self.find_similar(&text, n)
    }

    /// Number of documents in the hash cache
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Identifier of the embedder backing this database
    pub fn embedder_identifier(&self) -> String {
        self.embedder.identifier()
    }

    /// Whether the index is stale relative to the cache
    pub fn needs_rebuild(&self) -> bool {
        self.need_rebuild
    }

    fn load_documents(cache_file: &Path) -> IndexMap<String, DocumentRecord> {
        match std::fs::read_to_string(cache_file) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!("Discarding unreadable embedding cache: {}", e);
                IndexMap::new()
            }),
            Err(_) => IndexMap::new(),
        }
    }

    fn save_documents(&self) -> Result<()> {
        let data = serde_json::to_vec(&self.documents)?;
        crate::write_atomic(&self.cache_file, &data)?;
        Ok(())
    }
}

/// Content digest used for change detection
///
/// Not a security boundary; any collision-resistant digest of the raw text
/// is sufficient.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_deterministic() {
        assert_eq!(content_hash("dogs"), content_hash("dogs"));
        assert_ne!(content_hash("dogs"), content_hash("cats"));
    }
}
