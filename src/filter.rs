//! Filter evaluator for loaded references.
//!
//! A [`Query`] is a set of per-criterion predicates, all of which must hold.
//!
//! # Syntax
//!
//! ```text
//! "John Doe", Liisa
//! ```
//!
//! - `"..."` is an exact, case-insensitive match on the whole value
//! - anything else is a case-insensitive substring match
//! - the author filter takes several comma-separated sub-filters, each quoted
//!   or not; every one must match some author of the reference
//! - a quoted sub-filter containing a comma, such as `"Vihavainen, Arto"`, is
//!   compared with the whole author field instead
//! - the year filter always compares for equality
//! - the journal filter never matches inproceedings references

use crate::{Error, Reference, Result};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// A filter dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// Any one of the listed authors
    Author,
    /// Journal name (articles only)
    Journal,
    /// Publication year
    Year,
    /// Title
    Title,
}

impl Criterion {
    /// All criteria in prompt order
    pub const ALL: [Self; 4] = [Self::Author, Self::Journal, Self::Year, Self::Title];

    /// Parse a criterion name (case-insensitive)
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "author" => Ok(Self::Author),
            "journal" => Ok(Self::Journal),
            "year" => Ok(Self::Year),
            "title" => Ok(Self::Title),
            _ => Err(Error::UnknownCriterion(name.trim().to_string())),
        }
    }

    /// Parse a comma-separated selection such as `"author, year"`.
    ///
    /// Blank input selects nothing. Repeated names are kept once.
    pub fn parse_list(input: &str) -> Result<Vec<Self>> {
        let mut criteria = Vec::new();
        for name in input.split(',').filter(|n| !n.trim().is_empty()) {
            let criterion = Self::parse(name)?;
            if !criteria.contains(&criterion) {
                criteria.push(criterion);
            }
        }
        Ok(criteria)
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Journal => "journal",
            Self::Year => "year",
            Self::Title => "title",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single predicate over a text value. Stored needles are already folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Whole-value equality
    Exact(String),
    /// Containment
    Substring(String),
}

impl Matcher {
    /// Parse a filter value: quoted means exact, unquoted means substring.
    ///
    /// Returns `None` for a blank value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (text, exact) = match strip_quotes(raw) {
            Some(inner) => (inner.trim(), true),
            None => (raw, false),
        };
        if text.is_empty() {
            return None;
        }

        let needle = fold(text);
        Some(if exact {
            Self::Exact(needle)
        } else {
            Self::Substring(needle)
        })
    }

    /// Parse a value that is always compared for equality, quoted or not
    #[must_use]
    pub fn parse_exact(raw: &str) -> Option<Self> {
        Self::parse(raw).map(|m| match m {
            Self::Exact(s) | Self::Substring(s) => Self::Exact(s),
        })
    }

    /// Folded text this matcher compares against
    #[must_use]
    pub fn needle(&self) -> &str {
        match self {
            Self::Exact(needle) | Self::Substring(needle) => needle,
        }
    }

    fn spans_names(&self) -> bool {
        self.needle().contains(AUTHOR_SEPARATORS)
    }

    /// Whether `candidate` satisfies this matcher
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = fold(candidate.trim());
        match self {
            Self::Exact(needle) => candidate == *needle,
            Self::Substring(needle) => candidate.contains(needle.as_str()),
        }
    }
}

/// One criterion together with its matchers (all must match)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    criterion: Criterion,
    matchers: Vec<Matcher>,
}

impl Clause {
    /// Build a clause from the user's filter text, or `None` if it is blank
    #[must_use]
    pub fn parse(criterion: Criterion, filter: &str) -> Option<Self> {
        let matchers: Vec<Matcher> = match criterion {
            Criterion::Author => split_sub_filters(filter)
                .into_iter()
                .filter_map(Matcher::parse)
                .collect(),
            Criterion::Year => Matcher::parse_exact(filter).into_iter().collect(),
            Criterion::Journal | Criterion::Title => Matcher::parse(filter).into_iter().collect(),
        };

        if matchers.is_empty() {
            None
        } else {
            Some(Self { criterion, matchers })
        }
    }

    /// The criterion this clause applies to
    #[must_use]
    pub const fn criterion(&self) -> Criterion {
        self.criterion
    }

    /// Matchers of this clause
    #[must_use]
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Whether `reference` satisfies every matcher of this clause
    #[must_use]
    pub fn matches(&self, reference: &Reference) -> bool {
        match self.criterion {
            Criterion::Author => {
                let author = reference.author();
                let names = author_names(author);
                // "Vihavainen, Arto" spans a separator, so it is compared with the whole field
                self.matchers.iter().all(|m| {
                    if m.spans_names() {
                        m.matches(author)
                    } else {
                        names.iter().any(|name| m.matches(name))
                    }
                })
            }
            Criterion::Journal => reference
                .journal()
                .is_some_and(|journal| self.all_match(journal)),
            Criterion::Year => self.all_match(reference.year()),
            Criterion::Title => self.all_match(reference.title()),
        }
    }

    fn all_match(&self, value: &str) -> bool {
        self.matchers.iter().all(|m| m.matches(value))
    }
}

/// A conjunction of clauses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Query {
    /// Create an empty query, which matches everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion with its filter text; blank text skips the criterion
    #[must_use]
    pub fn with(mut self, criterion: Criterion, filter: &str) -> Self {
        self.push(criterion, filter);
        self
    }

    /// Add a criterion in place; blank text skips the criterion
    pub fn push(&mut self, criterion: Criterion, filter: &str) {
        if let Some(clause) = Clause::parse(criterion, filter) {
            self.clauses.push(clause);
        }
    }

    /// Active clauses
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Whether no clause is active
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether `reference` satisfies every clause
    #[must_use]
    pub fn matches(&self, reference: &Reference) -> bool {
        self.clauses.iter().all(|clause| clause.matches(reference))
    }

    /// Matching references, in input order
    #[must_use]
    pub fn apply<'r>(&self, references: &'r [Reference]) -> Vec<&'r Reference> {
        references.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Filter `references` with `query`; an empty query returns everything
#[must_use]
pub fn filter<'r>(references: &'r [Reference], query: &Query) -> Vec<&'r Reference> {
    query.apply(references)
}

/// Separators between names in an author field
const AUTHOR_SEPARATORS: [char; 2] = [',', ';'];

/// Individual names of an author field (`,` or `;` separated)
#[must_use]
pub fn author_names(author: &str) -> Vec<&str> {
    author
        .split(AUTHOR_SEPARATORS)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Split on commas that are outside double quotes
fn split_sub_filters(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);

    parts
}

fn strip_quotes(s: &str) -> Option<&str> {
    s.strip_prefix('"')?.strip_suffix('"')
}

/// Case folding used on both sides of every comparison
fn fold(s: &str) -> String {
    s.nfc().collect::<String>().to_lowercase()
}
