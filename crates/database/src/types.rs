use serde::{Deserialize, Serialize};

/// Cached embedding record for a single note
///
/// `hash` is the content digest of the note text and `embedding` is the
/// embedder's output for that exact text. The two fields are always written
/// together; a record is never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Content digest of the note text
    pub hash: String,

    /// Embedding vector for the note text
    pub embedding: Vec<f32>,
}
