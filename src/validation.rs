//! Field validators
//!
//! Each validator either accepts the value unchanged or fails with an
//! [`Error::InvalidField`]. They run when a field is assigned, so a
//! [`Reference`](crate::Reference) never holds a value that fails them.

use crate::model::FieldName;
use crate::{Error, Result};

/// Smallest accepted year
pub const MIN_YEAR: i32 = 1;
/// Largest accepted year
pub const MAX_YEAR: i32 = 9999;

/// Separator between the first and last page of a range
pub const PAGE_RANGE_SEPARATOR: &str = "--";

/// Reason reported for a rejected year
pub const INVALID_YEAR: &str = "Invalid year";
/// Reason reported for a non-numeric volume
pub const INVALID_VOLUME: &str = "Volume must be a number";
/// Reason reported for malformed pages
pub const INVALID_PAGES: &str =
    "you must supply a single page or a page range separated by '--'; leave empty if not applicable";
/// Reason reported for an empty book title
pub const MISSING_BOOK_TITLE: &str = "a book title is required";
/// Reason reported for an empty title
pub const MISSING_TITLE: &str = "a title is required";
/// Reason reported for a key the record header cannot carry
pub const INVALID_KEY: &str = "a key cannot contain ',', '{', '}' or line breaks";

/// Characters that would end or split the `@kind{key,` header
const KEY_FORBIDDEN: [char; 5] = [',', '{', '}', '\n', '\r'];

/// Year must be an integer in `1..=9999`. Empty is invalid.
pub fn year(value: &str) -> Result<()> {
    match value.parse::<i32>() {
        Ok(y) if (MIN_YEAR..=MAX_YEAR).contains(&y) => Ok(()),
        _ => Err(Error::invalid(FieldName::Year, value, INVALID_YEAR)),
    }
}

/// Volume must be an integer of any sign. Empty means "not set".
pub fn volume(value: &str) -> Result<()> {
    if value.is_empty() || is_integer(value) {
        Ok(())
    } else {
        Err(Error::invalid(FieldName::Volume, value, INVALID_VOLUME))
    }
}

/// Pages must be digits once every `--` is removed. Empty means "not set".
///
/// Accepts `38` and `38--46`, rejects `38-46` and `38a`.
pub fn pages(value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }

    let digits_only = value
        .replace(PAGE_RANGE_SEPARATOR, "")
        .chars()
        .all(|c| c.is_ascii_digit());

    if digits_only {
        Ok(())
    } else {
        Err(Error::invalid(FieldName::Pages, value, INVALID_PAGES))
    }
}

/// Book title must be non-empty, with no "not set" exemption.
pub fn book_title(value: &str) -> Result<()> {
    required(FieldName::BookTitle, value, MISSING_BOOK_TITLE)
}

/// Title must be non-empty.
pub fn title(value: &str) -> Result<()> {
    required(FieldName::Title, value, MISSING_TITLE)
}

fn required(field: FieldName, value: &str, reason: &'static str) -> Result<()> {
    if value.is_empty() {
        Err(Error::invalid(field, value, reason))
    } else {
        Ok(())
    }
}

/// Key must fit in a record header. Blank means "derive it".
pub fn key(value: &str) -> Result<()> {
    if value.contains(KEY_FORBIDDEN) {
        Err(Error::invalid(FieldName::Key, value, INVALID_KEY))
    } else {
        Ok(())
    }
}

/// Optional sign followed by at least one ASCII digit.
///
/// Magnitude is not bounded: any digit string is a number for our purposes.
fn is_integer(value: &str) -> bool {
    let digits = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
