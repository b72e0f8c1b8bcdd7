//! Incremental vector-index maintenance and similarity search
//!
//! The note database layers a rebuildable angular-distance index over a
//! pluggable embedder. Change detection is content-addressed: every note is
//! digested on each update pass and only changed notes are re-embedded. The
//! hash cache and built index are persisted per embedder identifier so
//! different models never share state.

mod engine;
mod index;
mod types;

use noter_common::Result;
use std::path::Path;

pub use engine::{content_hash, NoteDatabase};
pub use index::AngularIndex;
pub use types::DocumentRecord;

/// Write a file atomically via a temp file in the same directory
///
/// A crash mid-write leaves the previous file contents intact.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
