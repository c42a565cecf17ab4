//! Line-oriented reader for the reference file
//!
//! The reader is deliberately forgiving: lines that are not a record header
//! or a `name = value` pair are skipped, and unknown field names are ignored.
//! Field values still go through the validators, and a record with a value
//! they reject is dropped as a whole (see [`LoadReport::skipped`]).

pub mod entry;
pub mod lexer;
pub mod utils;

use crate::model::{derive_key, FieldName, Reference, ReferenceKind};
use crate::Error;
use tracing::{debug, trace, warn};

pub use entry::{parse_header, Header};

/// Internal parser result type
pub type PResult<'a, O> = winnow::PResult<O, winnow::error::ContextError>;

/// Outcome of reading a reference file
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records read successfully, in file order
    pub references: Vec<Reference>,
    /// Records dropped because a field value failed validation
    pub skipped: Vec<SkippedRecord>,
}

/// A record that was dropped while reading
#[derive(Debug)]
pub struct SkippedRecord {
    /// Kind announced by the record header
    pub kind: ReferenceKind,
    /// Citation key from the header, if any
    pub key: Option<String>,
    /// Line (1-indexed) of the offending field
    pub line: usize,
    /// Validation error raised by the field
    pub error: Error,
}

/// A record being assembled from consecutive lines
struct Pending {
    reference: Reference,
    header_key: Option<String>,
    failure: Option<(usize, Error)>,
}

impl Pending {
    fn open(header: Header<'_>, line: usize) -> Self {
        let mut reference = Reference::new(header.kind);
        let failure = header
            .key
            .and_then(|key| reference.common_mut().set_key(key).err())
            .map(|error| (line, error));
        Self {
            reference,
            header_key: header.key.map(str::to_string),
            failure,
        }
    }

    fn apply(&mut self, name: &str, raw: &str, line: usize) {
        if self.failure.is_some() {
            return;
        }

        let Some(field) = FieldName::parse(name) else {
            trace!(line, name = name.trim(), "ignoring unknown field");
            return;
        };
        if !self.reference.kind().supports(field) {
            trace!(line, %field, "ignoring field not carried by this kind");
            return;
        }

        if let Err(error) = self.reference.assign(field, lexer::clean_value(raw)) {
            self.failure = Some((line, error));
        }
    }
}

impl LoadReport {
    fn finish(&mut self, pending: Pending) {
        match pending.failure {
            None => {
                let mut reference = pending.reference;
                // a key equal to the derived one stays derived, so later edits update it
                let common = reference.common();
                if common.explicit_key()
                    == Some(derive_key(common.author(), common.year(), common.title()).as_str())
                {
                    reference.common_mut().clear_key();
                }
                self.references.push(reference);
            }
            Some((line, error)) => {
                warn!(
                    line,
                    kind = %pending.reference.kind(),
                    key = pending.header_key.as_deref().unwrap_or(""),
                    %error,
                    "skipping malformed record"
                );
                self.skipped.push(SkippedRecord {
                    kind: pending.reference.kind(),
                    key: pending.header_key,
                    line,
                    error,
                });
            }
        }
    }
}

/// Read references from lines of text, reporting skipped records
pub fn parse_lines_with_report<'a, I>(lines: I) -> LoadReport
where
    I: IntoIterator<Item = &'a str>,
{
    let mut report = LoadReport::default();
    let mut current: Option<Pending> = None;

    for (index, line) in lines.into_iter().enumerate() {
        let line_no = index + 1;

        let mut rest = line;
        if let Ok(header) = parse_header(&mut rest) {
            if let Some(pending) = current.take() {
                report.finish(pending);
            }
            current = Some(Pending::open(header, line_no));
            continue;
        }

        // an unrecognised block closes the current record and is ignored
        if entry::is_block_start(line) {
            if let Some(pending) = current.take() {
                report.finish(pending);
            }
            trace!(line = line_no, "ignoring unsupported block");
            continue;
        }

        let Some(pending) = current.as_mut() else {
            continue;
        };
        if let Some((name, raw)) = lexer::split_field(line) {
            pending.apply(name, raw, line_no);
        }
    }

    if let Some(pending) = current {
        report.finish(pending);
    }

    debug!(
        read = report.references.len(),
        skipped = report.skipped.len(),
        "parsed reference text"
    );
    report
}

/// Read references from text, dropping malformed records
#[must_use]
pub fn parse_references(input: &str) -> Vec<Reference> {
    parse_lines_with_report(input.lines()).references
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_RECORDS: &str = "@article{CBH91,
  author = {Allan Collins and John Seely Brown and Ann Holum},
  title = {Cognitive apprenticeship: making thinking visible},
  journal = {American Educator},
  year = {1991},
  volume = {6},
  pages = {38--46}
}

@inproceedings{Vihavainen2011E,
  author = {Vihavainen, Arto},
  title = {Extreme Apprenticeship Method in Teaching Programming for Beginners.},
  booktitle = {SIGCSE '11: Proceedings},
  year = {2011}
}
";

    #[test]
    fn test_parse_two_records() {
        let references = parse_references(TWO_RECORDS);
        assert_eq!(references.len(), 2);

        let article = &references[0];
        assert_eq!(article.kind(), ReferenceKind::Article);
        assert_eq!(article.key(), "CBH91");
        assert_eq!(article.author(), "Allan Collins and John Seely Brown and Ann Holum");
        assert_eq!(article.journal(), Some("American Educator"));
        assert_eq!(article.get(FieldName::Pages), Some("38--46"));
        assert_eq!(article.get(FieldName::Volume), Some("6"));

        let paper = &references[1];
        assert_eq!(paper.kind(), ReferenceKind::InProceedings);
        assert_eq!(paper.author(), "Vihavainen, Arto");
        assert_eq!(paper.book_title(), Some("SIGCSE '11: Proceedings"));
        assert_eq!(paper.year(), "2011");
    }

    #[test]
    fn test_kind_specific_fields_are_not_crossed() {
        let text = "@inproceedings{p,\n  journal = {Nature},\n  booktitle = {Proc},\n}\n\
                    @article{a,\n  booktitle = {Proc},\n  journal = {Nature},\n}";
        let references = parse_references(text);
        assert_eq!(references[0].journal(), None);
        assert_eq!(references[0].book_title(), Some("Proc"));
        assert_eq!(references[1].book_title(), None);
        assert_eq!(references[1].journal(), Some("Nature"));
    }

    #[test]
    fn test_forgiving_lines() {
        let text = "stray text before any record\n\
                    title = {ignored, no record yet}\n\
                    @article{x,\n\
                    this line has no pair\n\
                    Abstract = {unknown field}\n\
                    TITLE = {Upper}\n\
                    }";
        let references = parse_references(text);
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].title(), "Upper");
    }

    #[test]
    fn test_unsupported_block_closes_record() {
        let text = "@article{a,\n  title = {First}\n}\n@book{b,\n  title = {Book}\n}";
        let references = parse_references(text);
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].title(), "First");
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        let text = "@article{bad,\n  year = {abcd},\n  title = {Bad}\n}\n\
                    @article{good,\n  year = {2001},\n  title = {Good}\n}";
        let report = parse_lines_with_report(text.lines());

        assert_eq!(report.references.len(), 1);
        assert_eq!(report.references[0].key(), "good");

        assert_eq!(report.skipped.len(), 1);
        let skipped = &report.skipped[0];
        assert_eq!(skipped.kind, ReferenceKind::Article);
        assert_eq!(skipped.key.as_deref(), Some("bad"));
        assert_eq!(skipped.line, 2);
        assert_eq!(skipped.error.to_string(), "Invalid year");
    }

    #[test]
    fn test_header_key_with_space_survives() {
        let text = "@article{John Doe2020S,\n  author = {Someone Else},\n  title = {T},\n}";
        let references = parse_references(text);
        assert_eq!(references[0].key(), "John Doe2020S");
        assert_eq!(references[0].get(FieldName::Key), Some("John Doe2020S"));
    }

    #[test]
    fn test_derived_header_key_is_not_pinned() {
        let text = "@article{John Doe2020S,\n  author = {John Doe, Jane Roe},\n  \
                    title = {Sample Title},\n  journal = {J},\n  year = {2020}\n}";
        let mut references = parse_references(text);
        assert_eq!(references[0].get(FieldName::Key), None);
        assert_eq!(references[0].key(), "John Doe2020S");

        references[0].assign(FieldName::Year, "2021").unwrap();
        assert_eq!(references[0].key(), "John Doe2021S");
    }

    #[test]
    fn test_unreadable_header_key_skips_record() {
        let text = "@article{a{b,\n  title = {T}\n}\n@article{ok,\n  title = {U}\n}";
        let report = parse_lines_with_report(text.lines());
        assert_eq!(report.references.len(), 1);
        assert_eq!(report.references[0].key(), "ok");
        assert_eq!(report.skipped[0].line, 1);
        assert!(report.skipped[0].error.is_invalid_field());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_references("").is_empty());
        assert!(parse_references("\n\n").is_empty());
    }
}
