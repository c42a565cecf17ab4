//! Flat-file persistence
//!
//! Records are appended one block at a time and read back by re-parsing the
//! whole file. Nothing here locks the file: a single process is assumed to
//! own it for the duration of a run.

use crate::parser::{self, LoadReport};
use crate::{writer, Config, Reference, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Source of previously stored references
pub trait ReferenceLoader {
    /// Load all stored references.
    ///
    /// Unavailable storage yields an empty list, never an error.
    fn load_references(&self) -> Vec<Reference>;
}

/// Destination for new references
pub trait ReferenceSink {
    /// Persist one reference. Nothing is written if it cannot be serialized.
    fn append(&mut self, reference: &Reference) -> Result<()>;
}

/// A BibTeX file used as both loader and sink
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store over `path`; the file is created on first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store over the configured reference file
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.file_path())
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file, surfacing I/O failures.
    ///
    /// A missing file is not an error: it reads as empty.
    pub fn load_report(&self) -> Result<LoadReport> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "reference file does not exist yet");
                return Ok(LoadReport::default());
            }
            Err(e) => return Err(e.into()),
        };

        let report = parser::parse_lines_with_report(content.lines());
        debug!(
            path = %self.path.display(),
            loaded = report.references.len(),
            skipped = report.skipped.len(),
            "loaded reference file"
        );
        Ok(report)
    }
}

impl ReferenceLoader for FileStore {
    fn load_references(&self) -> Vec<Reference> {
        if !self.path.exists() {
            warn!(path = %self.path.display(), "References file not found");
            return Vec::new();
        }

        match self.load_report() {
            Ok(report) => report.references,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "Error reading references from file");
                Vec::new()
            }
        }
    }
}

impl ReferenceSink for FileStore {
    fn append(&mut self, reference: &Reference) -> Result<()> {
        // serialize before touching the file so a failure leaves it as it was
        let block = writer::to_string(reference)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format!("{block}\n\n").as_bytes())?;
        file.flush()?;

        debug!(path = %self.path.display(), key = %reference.key(), "appended reference");
        Ok(())
    }
}

/// In-memory store, useful for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Stored references
    pub references: Vec<Reference>,
    /// Serialized blocks, in append order
    pub blocks: Vec<String>,
}

impl ReferenceLoader for MemoryStore {
    fn load_references(&self) -> Vec<Reference> {
        self.references.clone()
    }
}

impl ReferenceSink for MemoryStore {
    fn append(&mut self, reference: &Reference) -> Result<()> {
        let block = writer::to_string(reference)?;
        self.blocks.push(block);
        self.references.push(reference.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldName;
    use crate::Error;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample() -> Reference {
        Reference::article()
            .with(FieldName::Author, "John Doe")
            .and_then(|r| r.with(FieldName::Title, "Sample Title"))
            .and_then(|r| r.with(FieldName::Journal, "Tech Journal"))
            .and_then(|r| r.with(FieldName::Year, "2024"))
            .unwrap()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.bib"));
        assert!(store.load_references().is_empty());
        assert!(store.load_report().unwrap().references.is_empty());
    }

    #[test]
    fn test_unreadable_path_loads_empty() {
        // a directory exists but cannot be read as a file
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.load_references().is_empty());
        assert!(store.load_report().is_err());
    }

    #[test]
    fn test_append_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("refs.bib");
        let mut store = FileStore::new(&path);

        store.append(&sample()).unwrap();
        store.append(&sample().with(FieldName::Key, "second").unwrap()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("@article{John2024S,\n"));
        assert!(content.ends_with("}\n\n"));

        let loaded = store.load_references();
        assert_eq!(loaded.len(), 2);
        // a header key equal to the derived one is not pinned
        assert_eq!(loaded[0].get(FieldName::Key), None);
        assert_eq!(loaded[0].key(), "John2024S");
        assert_eq!(loaded[1].get(FieldName::Key), Some("second"));
        assert_eq!(loaded[0].to_bibtex(), sample().to_bibtex());
        assert_eq!(loaded[1].key(), "second");
    }

    #[test]
    fn test_incomplete_reference_is_not_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("refs.bib");
        let mut store = FileStore::new(&path);

        let incomplete = sample().with(FieldName::Journal, "").unwrap();
        assert!(matches!(
            store.append(&incomplete),
            Err(Error::MissingRequiredField { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_from_config() {
        let store = FileStore::from_config(&Config::new("x.bib"));
        assert_eq!(store.path(), Path::new("x.bib"));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::default();
        store.append(&sample()).unwrap();
        assert!(store.append(&Reference::article()).is_err());
        assert_eq!(store.load_references().len(), 1);
        assert_eq!(store.blocks.len(), 1);
    }
}
