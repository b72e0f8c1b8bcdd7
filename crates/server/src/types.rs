use serde::{Deserialize, Serialize};

/// Request body for saving a note
#[derive(Debug, Deserialize)]
pub struct SaveNoteRequest {
    /// New note content
    pub content: String,
}

/// A note's content
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    /// Relative note path
    pub path: String,

    /// Note content
    pub content: String,
}

/// One similar-note hit
#[derive(Debug, Serialize)]
pub struct SimilarNoteItem {
    /// Relative note path
    pub path: String,

    /// Similarity score in (0, 1]
    pub similarity: f32,
}

/// Similar-notes result list
#[derive(Debug, Serialize)]
pub struct SimilarResponse {
    /// Hits, most similar first
    pub results: Vec<SimilarNoteItem>,

    /// Number of hits
    pub count: usize,
}

impl SimilarResponse {
    /// Build from engine output
    pub fn from_results(results: Vec<(String, f32)>) -> Self {
        let results: Vec<SimilarNoteItem> = results
            .into_iter()
            .map(|(path, similarity)| SimilarNoteItem { path, similarity })
            .collect();
        let count = results.len();
        Self { results, count }
    }
}

/// Query parameters for similar-note lookups
#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    /// Number of results to return
    pub n: Option<usize>,
}

/// Request body for similarity search over raw text
#[derive(Debug, Deserialize)]
pub struct SimilarTextRequest {
    /// Query text
    pub text: String,

    /// Number of results to return
    pub n: Option<usize>,
}

/// Request body for summarizing raw text
#[derive(Debug, Deserialize)]
pub struct SummaryTextRequest {
    /// Text to summarize
    pub text: String,
}

/// A produced summary
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Summary text
    pub summary: String,
}

/// Query parameters for full-text search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Query text or pattern
    pub q: String,

    /// Treat the query as a regex
    #[serde(default)]
    pub regex: bool,
}

/// Full-text search results
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Matching notes as relative paths
    pub results: Vec<String>,

    /// Echoed query
    pub query: String,

    /// Number of matches
    pub count: usize,
}

/// Index statistics
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Number of indexed documents
    pub total_documents: usize,

    /// Identifier of the embedder backing the index
    pub embedder: String,
}

/// Result of an explicit index rebuild
#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    /// Whether the rebuild completed
    pub success: bool,

    /// Number of indexed documents afterwards
    pub total_documents: usize,
}

/// Result of deleting a note
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether the note was deleted
    pub success: bool,
}
