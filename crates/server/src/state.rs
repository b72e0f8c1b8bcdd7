use noter_common::{AppConfig, Result, Storage};
use noter_database::NoteDatabase;
use noter_embedder::embedder_from_config;
use noter_searcher::{searcher_from_storage, Searcher};
use noter_summarizer::{summarizer_from_config, Summarizer};
use std::sync::RwLock;
use tracing::info;

/// Shared application state
///
/// Constructed once at startup and injected into request handlers; nothing
/// here is a process-wide global. The note database is synchronous, so the
/// server serializes access through a lock and runs engine calls on the
/// blocking pool.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Note storage layout
    pub storage: Storage,

    /// Vector database
    pub database: RwLock<NoteDatabase>,

    /// Caching summarizer
    pub summarizer: Summarizer,

    /// Full-text searcher
    pub searcher: Box<dyn Searcher>,
}

impl AppState {
    /// Create application state and build the index
    pub fn new(config: AppConfig) -> Result<Self> {
        let storage = Storage::from_config(&config)?;
        let embedder = embedder_from_config(&config)?;
        let summarizer = summarizer_from_config(&config, &storage)?;
        let searcher = searcher_from_storage(&storage);

        let mut database = NoteDatabase::new(storage.clone(), embedder)?;
        database.build_or_update_index()?;
        info!(
            "Application state ready - {} notes indexed",
            database.document_count()
        );

        Ok(Self {
            config,
            storage,
            database: RwLock::new(database),
            summarizer,
            searcher,
        })
    }
}
