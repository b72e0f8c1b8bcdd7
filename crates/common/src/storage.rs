use crate::config::AppConfig;
use crate::error::NoterError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default cache directory name, relative to the notes root
pub const DEFAULT_CACHE_DIR: &str = ".noter";

/// Note storage layout
///
/// Resolves the notes root and cache directories and enumerates the note
/// files. All persisted state (embedding caches, built indices, summary
/// cache) lives under the cache directory.
#[derive(Debug, Clone)]
pub struct Storage {
    root_path: PathBuf,
    cache_path: PathBuf,
}

impl Storage {
    /// Create storage rooted at `root` with cache at `cache`
    ///
    /// Falls back to `NOTER_NOTES_DIR` / `NOTER_CACHE_DIR` when an argument
    /// is `None`; the cache defaults to `<root>/.noter/`. A missing or
    /// nonexistent root is a fatal configuration error.
    pub fn new(root: Option<PathBuf>, cache: Option<PathBuf>) -> Result<Self, NoterError> {
        let root_path = root
            .or_else(|| std::env::var("NOTER_NOTES_DIR").ok().map(PathBuf::from))
            .ok_or_else(|| NoterError::config("No notes root path set"))?;

        if !root_path.is_dir() {
            return Err(NoterError::config(format!(
                "Notes root '{}' does not exist",
                root_path.display()
            )));
        }

        let cache_path = cache
            .or_else(|| std::env::var("NOTER_CACHE_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| root_path.join(DEFAULT_CACHE_DIR));

        std::fs::create_dir_all(&cache_path).map_err(|e| {
            NoterError::file_system(format!(
                "Failed to create cache directory {}: {}",
                cache_path.display(),
                e
            ))
        })?;

        Ok(Self {
            root_path,
            cache_path,
        })
    }

    /// Create storage from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, NoterError> {
        Self::new(config.notes_dir.clone(), config.cache_dir.clone())
    }

    /// Notes root directory
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Cache directory
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Enumerate all notes as sorted relative paths
    ///
    /// Collects `*.txt` files under the root, skipping dot-files and
    /// dot-directories. The ordering is stable and deterministic.
    pub fn all_notes(&self) -> Result<Vec<String>, NoterError> {
        let mut notes = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = entry.map_err(|e| {
                NoterError::file_system(format!(
                    "Failed to walk notes root {}: {}",
                    self.root_path.display(),
                    e
                ))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root_path)
                .map_err(|e| NoterError::internal(format!("Path outside root: {}", e)))?;
            notes.push(relative.to_string_lossy().into_owned());
        }

        notes.sort();
        Ok(notes)
    }

    /// Absolute path of a note given its relative path
    pub fn note_abs_path(&self, note: &str) -> PathBuf {
        self.root_path.join(note)
    }

    /// Embedding hash-cache file for the given embedder identifier
    ///
    /// Parameterized by embedder so caches from different embedders are
    /// never mixed.
    pub fn embedding_cache_file(&self, embedder_id: &str) -> PathBuf {
        self.cache_path
            .join(format!("embeddings_{}.json", embedder_id))
    }

    /// Built vector-index file for the given embedder identifier
    pub fn built_index_file(&self, embedder_id: &str) -> PathBuf {
        self.cache_path.join(format!("index_{}.bin", embedder_id))
    }

    /// Summary cache file
    pub fn summary_cache_file(&self) -> PathBuf {
        self.cache_path.join("file_summaries.json")
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_note(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_all_notes_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "b.txt", "b");
        write_note(dir.path(), "a.txt", "a");
        write_note(dir.path(), "sub/c.txt", "c");
        write_note(dir.path(), ".hidden.txt", "hidden");
        write_note(dir.path(), ".secret/d.txt", "d");
        write_note(dir.path(), "image.png", "not a note");

        let storage = Storage::new(Some(dir.path().to_path_buf()), None).unwrap();
        let notes = storage.all_notes().unwrap();
        assert_eq!(notes, vec!["a.txt", "b.txt", "sub/c.txt"]);
    }

    #[test]
    fn test_cache_dir_created_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(Some(dir.path().to_path_buf()), None).unwrap();
        assert!(storage.cache_path().is_dir());
        assert_eq!(storage.cache_path(), dir.path().join(DEFAULT_CACHE_DIR));
    }

    #[test]
    fn test_missing_root_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        let result = Storage::new(Some(missing), None);
        assert!(matches!(result, Err(NoterError::Config(_))));
    }

    #[test]
    fn test_cache_files_parameterized_by_embedder() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(Some(dir.path().to_path_buf()), None).unwrap();
        let a = storage.embedding_cache_file("ollama_nomic-embed-text");
        let b = storage.embedding_cache_file("openai_text-embedding-ada-002");
        assert_ne!(a, b);
        assert_ne!(
            storage.built_index_file("ollama_nomic-embed-text"),
            storage.built_index_file("openai_text-embedding-ada-002")
        );
    }

    #[test]
    fn test_note_abs_path() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "sub/c.txt", "c");
        let storage = Storage::new(Some(dir.path().to_path_buf()), None).unwrap();
        assert_eq!(
            storage.note_abs_path("sub/c.txt"),
            dir.path().join("sub/c.txt")
        );
    }
}
