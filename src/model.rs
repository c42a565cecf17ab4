//! Data models for references

use crate::{validation, Error, Result};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Kind of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// Article from a journal
    Article,
    /// Article in conference proceedings
    InProceedings,
}

impl ReferenceKind {
    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "article" => Ok(Self::Article),
            "inproceedings" => Ok(Self::InProceedings),
            _ => Err(Error::InvalidEntryType(s.to_string())),
        }
    }

    /// Name used in the `@kind{` header
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::InProceedings => "inproceedings",
        }
    }

    /// Fields that must be non-empty for serialization, in output order
    #[must_use]
    pub const fn required_fields(self) -> &'static [FieldName] {
        match self {
            Self::Article => &[
                FieldName::Author,
                FieldName::Title,
                FieldName::Journal,
                FieldName::Year,
            ],
            Self::InProceedings => &[
                FieldName::Author,
                FieldName::Title,
                FieldName::BookTitle,
                FieldName::Year,
            ],
        }
    }

    /// Optional fields in output order
    #[must_use]
    pub const fn optional_fields(self) -> &'static [FieldName] {
        match self {
            Self::Article => &[
                FieldName::Month,
                FieldName::Volume,
                FieldName::Number,
                FieldName::Pages,
                FieldName::Note,
                FieldName::Doi,
            ],
            Self::InProceedings => &[
                FieldName::Editor,
                FieldName::Volume,
                FieldName::Number,
                FieldName::Series,
                FieldName::Pages,
                FieldName::Address,
                FieldName::Month,
                FieldName::Organization,
                FieldName::Publisher,
                FieldName::Note,
            ],
        }
    }

    /// Whether references of this kind carry `field`
    #[must_use]
    pub fn supports(self, field: FieldName) -> bool {
        field == FieldName::Key
            || self.required_fields().contains(&field)
            || self.optional_fields().contains(&field)
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a field a reference can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    /// Explicit citation key
    Key,
    /// Author list
    Author,
    /// Title
    Title,
    /// Publication year
    Year,
    /// Journal (articles)
    Journal,
    /// Proceedings title (inproceedings)
    BookTitle,
    /// Month
    Month,
    /// Volume
    Volume,
    /// Issue number
    Number,
    /// Single page or `lo--hi` range
    Pages,
    /// Free-form note
    Note,
    /// Digital object identifier
    Doi,
    /// Editors
    Editor,
    /// Series
    Series,
    /// Publisher address
    Address,
    /// Organizing body
    Organization,
    /// Publisher
    Publisher,
}

impl FieldName {
    /// Parse a field name as it appears in a BibTeX line (case-insensitive)
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let field = match name.trim().to_lowercase().as_str() {
            "key" => Self::Key,
            "author" => Self::Author,
            "title" => Self::Title,
            "year" => Self::Year,
            "journal" => Self::Journal,
            "booktitle" => Self::BookTitle,
            "month" => Self::Month,
            "volume" => Self::Volume,
            "number" => Self::Number,
            "pages" => Self::Pages,
            "note" => Self::Note,
            "doi" => Self::Doi,
            "editor" => Self::Editor,
            "series" => Self::Series,
            "address" => Self::Address,
            "organization" => Self::Organization,
            "publisher" => Self::Publisher,
            _ => return None,
        };
        Some(field)
    }

    /// Name used in BibTeX output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Author => "author",
            Self::Title => "title",
            Self::Year => "year",
            Self::Journal => "journal",
            Self::BookTitle => "booktitle",
            Self::Month => "month",
            Self::Volume => "volume",
            Self::Number => "number",
            Self::Pages => "pages",
            Self::Note => "note",
            Self::Doi => "doi",
            Self::Editor => "editor",
            Self::Series => "series",
            Self::Address => "address",
            Self::Organization => "organization",
            Self::Publisher => "publisher",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive a citation key from author, year and title.
///
/// The surname is the text before the first comma (`"Vihavainen, Arto"`) or,
/// without a comma, the first space-separated word (`"John Doe"`). An empty
/// title contributes `X`.
///
/// ```
/// use bibtex_refman::model::derive_key;
///
/// assert_eq!(derive_key("Vihavainen, Arto", "2011", "Extreme..."), "Vihavainen2011E");
/// assert_eq!(derive_key("John Doe", "2024", "Sample Title"), "John2024S");
/// ```
#[must_use]
pub fn derive_key(author: &str, year: &str, title: &str) -> String {
    let surname = author.split_once(',').map_or_else(
        || author.split(' ').next().unwrap_or_default().trim(),
        |(before, _)| before.trim(),
    );
    let initial = title.chars().next().unwrap_or('X');

    format!("{surname}{year}{initial}")
}

/// Fields shared by every reference kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Common {
    key: Option<String>,
    author: String,
    title: String,
    year: String,
}

impl Common {
    /// Citation key: the explicit one if non-blank, derived otherwise.
    /// Derivation is recomputed on every call.
    #[must_use]
    pub fn key(&self) -> Cow<'_, str> {
        match &self.key {
            Some(key) if !key.trim().is_empty() => Cow::Borrowed(key),
            _ => Cow::Owned(derive_key(&self.author, &self.year, &self.title)),
        }
    }

    /// Explicit key, if one was set
    #[must_use]
    pub fn explicit_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Author list as entered
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Year
    #[must_use]
    pub fn year(&self) -> &str {
        &self.year
    }

    /// Set the explicit key; a blank value clears it.
    ///
    /// Rejects keys that could not be read back from a record header.
    pub fn set_key(&mut self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        validation::key(&key)?;
        self.key = if key.trim().is_empty() { None } else { Some(key) };
        Ok(())
    }

    /// Drop the explicit key so the derived one is used
    pub fn clear_key(&mut self) {
        self.key = None;
    }

    /// Set the author list (not validated here)
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// Set the title; rejects an empty value
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        validation::title(&title)?;
        self.title = title;
        Ok(())
    }

    /// Set the year; rejects anything outside `1..=9999`
    pub fn set_year(&mut self, year: impl Into<String>) -> Result<()> {
        let year = year.into();
        validation::year(&year)?;
        self.year = year;
        Ok(())
    }
}

impl Serialize for Common {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Common", 4)?;
        state.serialize_field("key", &self.key())?;
        state.serialize_field("author", &self.author)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("year", &self.year)?;
        state.end()
    }
}

/// A journal article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Article {
    #[serde(flatten)]
    common: Common,
    journal: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    month: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    volume: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pages: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    note: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    doi: String,
}

impl Article {
    /// Create an empty article
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Journal name
    #[must_use]
    pub fn journal(&self) -> &str {
        &self.journal
    }

    /// Set the journal; emptiness is only checked at serialization
    pub fn set_journal(&mut self, journal: impl Into<String>) {
        self.journal = journal.into();
    }

    /// Set the volume; must be an integer when non-empty
    pub fn set_volume(&mut self, volume: impl Into<String>) -> Result<()> {
        let volume = volume.into();
        validation::volume(&volume)?;
        self.volume = volume;
        Ok(())
    }

    /// Set the pages; a single page or a `lo--hi` range when non-empty
    pub fn set_pages(&mut self, pages: impl Into<String>) -> Result<()> {
        let pages = pages.into();
        validation::pages(&pages)?;
        self.pages = pages;
        Ok(())
    }

    fn slot(&self, field: FieldName) -> Option<&str> {
        let value = match field {
            FieldName::Journal => &self.journal,
            FieldName::Month => &self.month,
            FieldName::Volume => &self.volume,
            FieldName::Number => &self.number,
            FieldName::Pages => &self.pages,
            FieldName::Note => &self.note,
            FieldName::Doi => &self.doi,
            _ => return None,
        };
        Some(value)
    }

    fn assign(&mut self, field: FieldName, value: String) -> Result<()> {
        match field {
            FieldName::Journal => self.set_journal(value),
            FieldName::Volume => self.set_volume(value)?,
            FieldName::Pages => self.set_pages(value)?,
            FieldName::Month => self.month = value,
            FieldName::Number => self.number = value,
            FieldName::Note => self.note = value,
            FieldName::Doi => self.doi = value,
            _ => {
                return Err(Error::UnsupportedField {
                    kind: ReferenceKind::Article,
                    field,
                })
            }
        }
        Ok(())
    }
}

/// A paper in conference proceedings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InProceedings {
    #[serde(flatten)]
    common: Common,
    #[serde(rename = "booktitle")]
    book_title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    editor: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    volume: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    series: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pages: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    month: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    organization: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    publisher: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    note: String,
}

impl InProceedings {
    /// Create an empty inproceedings reference
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Proceedings title
    #[must_use]
    pub fn book_title(&self) -> &str {
        &self.book_title
    }

    /// Set the proceedings title; rejected immediately when empty
    pub fn set_book_title(&mut self, book_title: impl Into<String>) -> Result<()> {
        let book_title = book_title.into();
        validation::book_title(&book_title)?;
        self.book_title = book_title;
        Ok(())
    }

    /// Set the volume; must be an integer when non-empty
    pub fn set_volume(&mut self, volume: impl Into<String>) -> Result<()> {
        let volume = volume.into();
        validation::volume(&volume)?;
        self.volume = volume;
        Ok(())
    }

    /// Set the pages; a single page or a `lo--hi` range when non-empty
    pub fn set_pages(&mut self, pages: impl Into<String>) -> Result<()> {
        let pages = pages.into();
        validation::pages(&pages)?;
        self.pages = pages;
        Ok(())
    }

    fn slot(&self, field: FieldName) -> Option<&str> {
        let value = match field {
            FieldName::BookTitle => &self.book_title,
            FieldName::Editor => &self.editor,
            FieldName::Volume => &self.volume,
            FieldName::Number => &self.number,
            FieldName::Series => &self.series,
            FieldName::Pages => &self.pages,
            FieldName::Address => &self.address,
            FieldName::Month => &self.month,
            FieldName::Organization => &self.organization,
            FieldName::Publisher => &self.publisher,
            FieldName::Note => &self.note,
            _ => return None,
        };
        Some(value)
    }

    fn assign(&mut self, field: FieldName, value: String) -> Result<()> {
        match field {
            FieldName::BookTitle => self.set_book_title(value)?,
            FieldName::Volume => self.set_volume(value)?,
            FieldName::Pages => self.set_pages(value)?,
            FieldName::Editor => self.editor = value,
            FieldName::Number => self.number = value,
            FieldName::Series => self.series = value,
            FieldName::Address => self.address = value,
            FieldName::Month => self.month = value,
            FieldName::Organization => self.organization = value,
            FieldName::Publisher => self.publisher = value,
            FieldName::Note => self.note = value,
            _ => {
                return Err(Error::UnsupportedField {
                    kind: ReferenceKind::InProceedings,
                    field,
                })
            }
        }
        Ok(())
    }
}

/// A single bibliographic record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Reference {
    /// Journal article
    Article(Article),
    /// Conference paper
    InProceedings(InProceedings),
}

impl Reference {
    /// Create an empty reference of the given kind
    #[must_use]
    pub fn new(kind: ReferenceKind) -> Self {
        match kind {
            ReferenceKind::Article => Self::Article(Article::new()),
            ReferenceKind::InProceedings => Self::InProceedings(InProceedings::new()),
        }
    }

    /// Create an empty journal article
    #[must_use]
    pub fn article() -> Self {
        Self::new(ReferenceKind::Article)
    }

    /// Create an empty inproceedings reference
    #[must_use]
    pub fn inproceedings() -> Self {
        Self::new(ReferenceKind::InProceedings)
    }

    /// Get the reference kind
    #[must_use]
    pub const fn kind(&self) -> ReferenceKind {
        match self {
            Self::Article(_) => ReferenceKind::Article,
            Self::InProceedings(_) => ReferenceKind::InProceedings,
        }
    }

    /// Shared fields
    #[must_use]
    pub const fn common(&self) -> &Common {
        match self {
            Self::Article(a) => &a.common,
            Self::InProceedings(p) => &p.common,
        }
    }

    /// Mutable shared fields
    pub fn common_mut(&mut self) -> &mut Common {
        match self {
            Self::Article(a) => &mut a.common,
            Self::InProceedings(p) => &mut p.common,
        }
    }

    /// Get the citation key, deriving it when no explicit key is set
    #[must_use]
    pub fn key(&self) -> Cow<'_, str> {
        self.common().key()
    }

    /// Get the author list
    #[must_use]
    pub fn author(&self) -> &str {
        self.common().author()
    }

    /// Get the title
    #[must_use]
    pub fn title(&self) -> &str {
        self.common().title()
    }

    /// Get the year
    #[must_use]
    pub fn year(&self) -> &str {
        self.common().year()
    }

    /// Journal name; only articles have one
    #[must_use]
    pub fn journal(&self) -> Option<&str> {
        match self {
            Self::Article(a) => Some(a.journal()),
            Self::InProceedings(_) => None,
        }
    }

    /// Proceedings title; only inproceedings references have one
    #[must_use]
    pub fn book_title(&self) -> Option<&str> {
        match self {
            Self::Article(_) => None,
            Self::InProceedings(p) => Some(p.book_title()),
        }
    }

    /// Get a field value by name.
    ///
    /// Returns `None` when this kind does not carry the field, and the
    /// (possibly empty) stored value otherwise. `Key` yields the explicit
    /// key only.
    #[must_use]
    pub fn get(&self, field: FieldName) -> Option<&str> {
        let common = self.common();
        match field {
            FieldName::Key => common.explicit_key(),
            FieldName::Author => Some(common.author()),
            FieldName::Title => Some(common.title()),
            FieldName::Year => Some(common.year()),
            _ => match self {
                Self::Article(a) => a.slot(field),
                Self::InProceedings(p) => p.slot(field),
            },
        }
    }

    /// Assign a field, running its validator first.
    ///
    /// On error the previous value is kept.
    pub fn assign(&mut self, field: FieldName, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        match field {
            FieldName::Key => self.common_mut().set_key(value),
            FieldName::Author => {
                self.common_mut().set_author(value);
                Ok(())
            }
            FieldName::Title => self.common_mut().set_title(value),
            FieldName::Year => self.common_mut().set_year(value),
            _ => match self {
                Self::Article(a) => a.assign(field, value),
                Self::InProceedings(p) => p.assign(field, value),
            },
        }
    }

    /// Consuming form of [`Reference::assign`] for chained construction
    ///
    /// ```
    /// use bibtex_refman::{FieldName, Reference};
    ///
    /// let reference = Reference::article()
    ///     .with(FieldName::Author, "John Doe")?
    ///     .with(FieldName::Title, "Sample Title")?
    ///     .with(FieldName::Journal, "Tech Journal")?
    ///     .with(FieldName::Year, "2024")?;
    /// assert_eq!(reference.key(), "John2024S");
    /// # Ok::<(), bibtex_refman::Error>(())
    /// ```
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Result<Self> {
        self.assign(field, value)?;
        Ok(self)
    }

    /// First required field that is still empty, in output order
    #[must_use]
    pub fn missing_required_field(&self) -> Option<FieldName> {
        self.kind()
            .required_fields()
            .iter()
            .copied()
            .find(|&field| self.get(field).map_or(true, str::is_empty))
    }

    /// Check if all required fields for this kind are present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_required_field().is_none()
    }
}

impl From<Article> for Reference {
    fn from(article: Article) -> Self {
        Self::Article(article)
    }
}

impl From<InProceedings> for Reference {
    fn from(paper: InProceedings) -> Self {
        Self::InProceedings(paper)
    }
}
