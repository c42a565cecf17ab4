//! # bibtex-refman
//!
//! A small reference manager for BibTeX files holding journal articles and
//! conference papers.
//!
//! ## Features
//!
//! - Fail-fast field validation: invalid years, volumes and page ranges are
//!   rejected at assignment
//! - Deterministic citation keys derived from author, year and title
//! - Exact, stable serialization of `@article` and `@inproceedings` blocks
//! - A forgiving line-oriented reader for files written by this crate
//! - Conjunctive filtering by author, journal, year and title, with exact
//!   (quoted) and substring matching
//!
//! ## Example
//!
//! ```
//! use bibtex_refman::{Bibliography, Criterion, FieldName, Query, Reference};
//!
//! let reference = Reference::inproceedings()
//!     .with(FieldName::Author, "Vihavainen, Arto")?
//!     .with(FieldName::Title, "Extreme Apprenticeship Method in Teaching Programming for Beginners.")?
//!     .with(FieldName::BookTitle, "SIGCSE '11")?
//!     .with(FieldName::Year, "2011")?;
//!
//! let text = reference.to_bibtex();
//! assert!(text.starts_with("@inproceedings{Vihavainen2011E,"));
//!
//! let bib = Bibliography::parse(&text);
//! let query = Query::new().with(Criterion::Author, "\"Vihavainen\"");
//! assert_eq!(bib.filter(&query).len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs,
    missing_debug_implementations
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::multiple_crate_versions
)]

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod store;
pub mod validation;

mod database;
mod writer;

pub use config::Config;
pub use database::{Bibliography, BibliographyBuilder, BibliographyStats};
pub use error::{Error, Result};
pub use filter::{Criterion, Matcher, Query};
pub use model::{Article, FieldName, InProceedings, Reference, ReferenceKind};
pub use parser::LoadReport;
pub use store::{FileStore, ReferenceLoader, ReferenceSink};
pub use writer::{to_file, to_string, Writer, WriterConfig};

/// Re-export of common types
pub mod prelude {
    pub use crate::{
        Bibliography, Criterion, Error, FieldName, Query, Reference, ReferenceKind, Result,
    };
}

/// Parse references from text, dropping malformed records
#[must_use]
pub fn parse(input: &str) -> Bibliography {
    Bibliography::parse(input)
}

/// Parse references from a file.
///
/// Unlike [`FileStore`], I/O failures (including a missing file) are errors.
pub fn parse_file(path: impl AsRef<std::path::Path>) -> Result<Bibliography> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse(&content))
}
