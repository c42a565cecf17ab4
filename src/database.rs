//! In-memory bibliography

use crate::filter::Query;
use crate::model::{Reference, ReferenceKind};
use crate::parser::{self, LoadReport};
use ahash::AHashMap;
use serde::Serialize;

/// An ordered collection of references.
///
/// Insertion order is display order. Keys are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bibliography {
    references: Vec<Reference>,
}

impl Bibliography {
    /// Create a new empty bibliography
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder
    #[must_use]
    pub fn builder() -> BibliographyBuilder {
        BibliographyBuilder::new()
    }

    /// Parse references from text, dropping malformed records
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self::from(parser::parse_references(input))
    }

    /// Parse references from text, also returning the records that were dropped
    #[must_use]
    pub fn parse_with_report(input: &str) -> (Self, LoadReport) {
        let mut report = parser::parse_lines_with_report(input.lines());
        let references = std::mem::take(&mut report.references);
        (Self { references }, report)
    }

    /// Get all references
    #[must_use]
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Number of references
    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Whether there are no references
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Append a reference
    pub fn push(&mut self, reference: Reference) {
        self.references.push(reference);
    }

    /// Append all references of another bibliography
    pub fn merge(&mut self, other: Self) {
        self.references.extend(other.references);
    }

    /// First reference with the given key
    #[must_use]
    pub fn find_by_key(&self, key: &str) -> Option<&Reference> {
        self.references.iter().find(|r| r.key() == key)
    }

    /// References of one kind
    #[must_use]
    pub fn find_by_kind(&self, kind: ReferenceKind) -> Vec<&Reference> {
        self.references.iter().filter(|r| r.kind() == kind).collect()
    }

    /// References matching every clause of `query`
    #[must_use]
    pub fn filter(&self, query: &Query) -> Vec<&Reference> {
        query.apply(&self.references)
    }

    /// Get statistics about the bibliography
    #[must_use]
    pub fn stats(&self) -> BibliographyStats {
        let mut by_kind = AHashMap::new();
        let mut incomplete = 0;
        for reference in &self.references {
            *by_kind.entry(reference.kind()).or_insert(0) += 1;
            if !reference.is_complete() {
                incomplete += 1;
            }
        }

        BibliographyStats {
            total: self.references.len(),
            incomplete,
            by_kind,
        }
    }

    /// Consume into the underlying references
    #[must_use]
    pub fn into_references(self) -> Vec<Reference> {
        self.references
    }
}

impl From<Vec<Reference>> for Bibliography {
    fn from(references: Vec<Reference>) -> Self {
        Self { references }
    }
}

impl<'a> IntoIterator for &'a Bibliography {
    type Item = &'a Reference;
    type IntoIter = std::slice::Iter<'a, Reference>;

    fn into_iter(self) -> Self::IntoIter {
        self.references.iter()
    }
}

/// Statistics about a bibliography
#[derive(Debug, Clone)]
pub struct BibliographyStats {
    /// Total number of references
    pub total: usize,
    /// References missing a required field
    pub incomplete: usize,
    /// Reference counts by kind
    pub by_kind: AHashMap<ReferenceKind, usize>,
}

/// Builder for creating bibliographies programmatically
#[derive(Debug, Default)]
pub struct BibliographyBuilder {
    bibliography: Bibliography,
}

impl BibliographyBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference
    #[must_use]
    pub fn reference(mut self, reference: Reference) -> Self {
        self.bibliography.references.push(reference);
        self
    }

    /// Build the bibliography
    #[must_use]
    pub fn build(self) -> Bibliography {
        self.bibliography
    }
}
