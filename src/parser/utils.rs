//! Parser utilities

use winnow::ascii::space0;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;

/// Error returned when a parser does not match
pub(crate) fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::default())
}

/// Make a parser insensitive to surrounding spaces and tabs
pub fn ws<'a, F, O>(mut parser: F) -> impl Parser<&'a str, O, ContextError>
where
    F: Parser<&'a str, O, ContextError>,
{
    move |input: &mut &'a str| {
        let _ = space0.parse_next(input)?;
        let output = parser.parse_next(input)?;
        let _ = space0.parse_next(input)?;
        Ok(output)
    }
}

/// Case-insensitive tag parser
#[must_use]
pub fn tag_no_case<'a>(tag: &'static str) -> impl Parser<&'a str, &'a str, ContextError> {
    move |input: &mut &'a str| {
        let tag_len = tag.len();
        if input.len() < tag_len || !input.is_char_boundary(tag_len) {
            return Err(backtrack());
        }

        let input_start = &input[..tag_len];
        if input_start.eq_ignore_ascii_case(tag) {
            *input = &input[tag_len..];
            Ok(input_start)
        } else {
            Err(backtrack())
        }
    }
}
