//! Full-text and regex search over the note collection
//!
//! Two implementations share one trait: an external ripgrep runner and an
//! always-available native fallback. Both use smart-case matching: a query
//! containing an uppercase letter searches case-sensitively.

mod native;
mod ripgrep;

use noter_common::{Result, Storage};

pub use native::NativeSearcher;
pub use ripgrep::RipgrepSearcher;

/// Full text search over the notes
pub trait Searcher: Send + Sync {
    /// Notes containing the literal text, as sorted relative paths
    fn text_search(&self, text: &str) -> Result<Vec<String>>;

    /// Notes matching the regex pattern, as sorted relative paths
    fn regex_search(&self, pattern: &str) -> Result<Vec<String>>;

    /// Whether this searcher is available for immediate use
    fn is_available(&self) -> bool;
}

/// Select the preferred available searcher
///
/// Ripgrep when installed, the native scanner otherwise.
pub fn searcher_from_storage(storage: &Storage) -> Box<dyn Searcher> {
    let ripgrep = RipgrepSearcher::new(storage.clone());
    if ripgrep.is_available() {
        return Box::new(ripgrep);
    }
    Box::new(NativeSearcher::new(storage.clone()))
}

/// Case sensitive iff any uppercase letter is present in the query
pub(crate) fn is_smart_case_sensitive(query: &str) -> bool {
    query.chars().any(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("car.txt"),
            "My car is red.\nCars are useful.",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("google.txt"),
            "Google built a self-driving Car prototype.",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("plane.txt"),
            "A plane is faster than a car.",
        )
        .unwrap();
        std::fs::write(dir.path().join("cat.txt"), "Cats chase mice.").unwrap();
        let storage = Storage::new(Some(dir.path().to_path_buf()), None).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_text_search_is_case_insensitive_for_lowercase_query() {
        let (_dir, storage) = fixture();
        let searcher = NativeSearcher::new(storage);
        let results = searcher.text_search("car").unwrap();
        assert_eq!(results, vec!["car.txt", "google.txt", "plane.txt"]);
    }

    #[test]
    fn test_text_search_smart_case_sensitive() {
        let (_dir, storage) = fixture();
        let searcher = NativeSearcher::new(storage);
        let results = searcher.text_search("Car").unwrap();
        assert_eq!(results, vec!["car.txt", "google.txt"]);
    }

    #[test]
    fn test_regex_search() {
        let (_dir, storage) = fixture();
        let searcher = NativeSearcher::new(storage);
        let results = searcher.regex_search(r"c.ts").unwrap();
        assert_eq!(results, vec!["cat.txt"]);
    }

    #[test]
    fn test_regex_search_smart_case_sensitive() {
        let (_dir, storage) = fixture();
        let searcher = NativeSearcher::new(storage);
        let results = searcher.regex_search(r"C.rs").unwrap();
        assert_eq!(results, vec!["car.txt"]);
    }

    #[test]
    fn test_invalid_regex_is_error() {
        let (_dir, storage) = fixture();
        let searcher = NativeSearcher::new(storage);
        assert!(searcher.regex_search("(unclosed").is_err());
    }

    #[test]
    fn test_native_searcher_always_available() {
        let (_dir, storage) = fixture();
        assert!(NativeSearcher::new(storage).is_available());
    }

    #[test]
    fn test_factory_returns_some_searcher() {
        let (_dir, storage) = fixture();
        let searcher = searcher_from_storage(&storage);
        assert!(searcher.is_available());
    }
}
