//! Runtime configuration

use std::path::{Path, PathBuf};

/// Reference file used when none is configured
pub const DEFAULT_FILE_PATH: &str = "references.bib";

/// Reference manager configuration
///
/// Built once at start-up and handed to the store and the session; nothing
/// reads the file path from global state.
///
/// # Example
///
/// ```
/// use bibtex_refman::Config;
///
/// let config = Config::new("thesis.bib");
/// assert_eq!(config.file_path().to_str(), Some("thesis.bib"));
/// assert_eq!(Config::default().file_path().to_str(), Some("references.bib"));
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// BibTeX file records are appended to and loaded from
    pub file_path: PathBuf,
}

impl Config {
    /// Create a configuration for the given reference file
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Reference file path
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_PATH)
    }
}
