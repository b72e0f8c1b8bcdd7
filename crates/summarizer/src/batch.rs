use indicatif::ProgressBar;
use noter_common::{Result, Storage};
use rayon::prelude::*;
use tracing::info;

use crate::Summarizer;

/// Summarizes every note in storage, warming the summary cache
///
/// Per-file calls are independent and order-insensitive, so the parallel
/// variant fans them out over a worker pool bounded by available hardware
/// threads. Workers share only the memoization cache, which tolerates
/// last-write-wins races.
pub struct BatchSummarizer<'a> {
    summarizer: &'a Summarizer,
    storage: &'a Storage,
}

impl<'a> BatchSummarizer<'a> {
    /// Create new batch summarizer
    pub fn new(summarizer: &'a Summarizer, storage: &'a Storage) -> Self {
        Self {
            summarizer,
            storage,
        }
    }

    /// Summarize all notes sequentially
    pub fn summarize_all_notes(&self) -> Result<()> {
        let notes = self.storage.all_notes()?;
        info!("Summarizing {} notes", notes.len());

        let bar = ProgressBar::new(notes.len() as u64);
        for note in &notes {
            self.summarizer
                .summarize_file(&self.storage.note_abs_path(note), None)?;
            bar.inc(1);
        }
        bar.finish();
        Ok(())
    }

    /// Summarize all notes across a worker pool
    pub fn parallel_summarize_all_notes(&self) -> Result<()> {
        let notes = self.storage.all_notes()?;
        info!("Summarizing {} notes in parallel", notes.len());

        let bar = ProgressBar::new(notes.len() as u64);
        notes.par_iter().try_for_each(|note| -> Result<()> {
            self.summarizer
                .summarize_file(&self.storage.note_abs_path(note), None)?;
            bar.inc(1);
            Ok(())
        })?;
        bar.finish();
        Ok(())
    }
}
