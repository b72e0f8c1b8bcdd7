use noter_common::{NoterError, Result, Storage};
use regex::RegexBuilder;

use crate::{is_smart_case_sensitive, Searcher};

/// Full-text search over the note files using the regex crate
///
/// The always-available fallback when ripgrep is not installed.
pub struct NativeSearcher {
    storage: Storage,
}

impl NativeSearcher {
    /// Create new native searcher
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    fn search(&self, query: &str, is_regex: bool) -> Result<Vec<String>> {
        let case_sensitive = is_smart_case_sensitive(query);

        let pattern = if is_regex {
            query.to_string()
        } else {
            regex::escape(query)
        };
        let matcher = RegexBuilder::new(&pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| NoterError::search(format!("Invalid pattern '{}': {}", query, e)))?;

        let mut matches = Vec::new();
        for note in self.storage.all_notes()? {
            let text = std::fs::read_to_string(self.storage.note_abs_path(&note))?;
            if text.lines().any(|line| matcher.is_match(line)) {
                matches.push(note);
            }
        }

        matches.sort();
        Ok(matches)
    }
}

impl Searcher for NativeSearcher {
    fn text_search(&self, text: &str) -> Result<Vec<String>> {
        self.search(text, false)
    }

    fn regex_search(&self, pattern: &str) -> Result<Vec<String>> {
        self.search(pattern, true)
    }

    fn is_available(&self) -> bool {
        true
    }
}
