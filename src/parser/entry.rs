//! Record header parsing (`@article{key,`)

use super::{lexer, utils, PResult};
use crate::model::ReferenceKind;
use winnow::ascii::space0;
use winnow::combinator::{alt, opt, preceded};
use winnow::prelude::*;

/// A parsed record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    /// Record kind
    pub kind: ReferenceKind,
    /// Citation key, if the header carries a non-empty one
    pub key: Option<&'a str>,
}

/// Parse a header line that opens a new record.
///
/// Leading whitespace and the case of the kind name are ignored. Longer
/// names such as `@articles` do not match.
pub fn parse_header<'a>(input: &mut &'a str) -> PResult<'a, Header<'a>> {
    let kind = preceded(
        (space0, '@'),
        alt((
            utils::tag_no_case("inproceedings").value(ReferenceKind::InProceedings),
            utils::tag_no_case("article").value(ReferenceKind::Article),
        )),
    )
    .parse_next(input)?;

    if input.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
        return Err(utils::backtrack());
    }

    let key = opt(preceded(utils::ws('{'), lexer::citation_key)).parse_next(input)?;

    Ok(Header {
        kind,
        key: key.filter(|k| !k.is_empty()),
    })
}

/// Whether a line opens some `@` block, recognised or not
#[must_use]
pub fn is_block_start(line: &str) -> bool {
    line.trim_start().starts_with('@')
}
