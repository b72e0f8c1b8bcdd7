use noter_common::{NoterError, Result, Storage};
use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::Searcher;

/// Full-text search using the external ripgrep (rg) command
pub struct RipgrepSearcher {
    storage: Storage,
}

impl RipgrepSearcher {
    /// Create new ripgrep searcher
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    fn search(&self, pattern: &str, is_regex: bool) -> Result<Vec<String>> {
        let mut command = Command::new("rg");
        command
            .arg("--files-with-matches")
            .arg("--smart-case")
            .arg("--glob")
            .arg("*.txt");
        if !is_regex {
            command.arg("--fixed-strings");
        }
        command.arg("--").arg(pattern).arg(self.storage.root_path());

        debug!("Running ripgrep: {:?}", command);
        let output = command
            .output()
            .map_err(|e| NoterError::search(format!("Failed to run rg: {}", e)))?;

        // rg exits 1 when nothing matched; only 2+ signals an error
        match output.status.code() {
            Some(0) | Some(1) => {}
            _ => {
                return Err(NoterError::search(format!(
                    "rg failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                )))
            }
        }

        let mut matches: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(|line| {
                Path::new(line)
                    .strip_prefix(self.storage.root_path())
                    .ok()
                    .map(|rel| rel.to_string_lossy().into_owned())
            })
            .collect();

        matches.sort();
        Ok(matches)
    }
}

impl Searcher for RipgrepSearcher {
    fn text_search(&self, text: &str) -> Result<Vec<String>> {
        self.search(text, false)
    }

    fn regex_search(&self, pattern: &str) -> Result<Vec<String>> {
        self.search(pattern, true)
    }

    fn is_available(&self) -> bool {
        Command::new("rg")
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}
