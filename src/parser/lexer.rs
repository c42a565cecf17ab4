//! Token-level helpers for the line-oriented reader

use super::PResult;
use winnow::prelude::*;
use winnow::token::take_while;

/// Parse a citation key: the rest of the header line up to its final `,`.
///
/// Derived keys may contain spaces, so the key is not cut at whitespace.
/// Surrounding whitespace is trimmed.
pub fn citation_key<'a>(input: &mut &'a str) -> PResult<'a, &'a str> {
    take_while(0.., |c: char| c != '\n' && c != '\r')
        .map(|raw: &'a str| {
            let raw = raw.trim_end();
            raw.strip_suffix(',').unwrap_or(raw).trim()
        })
        .parse_next(input)
}

/// Split a `name = value` line on its first `=`.
///
/// Returns `None` for lines without `=`. Neither side is trimmed.
#[must_use]
pub fn split_field(line: &str) -> Option<(&str, &str)> {
    let eq = memchr::memchr(b'=', line.as_bytes())?;
    Some((&line[..eq], &line[eq + 1..]))
}

/// Strip surrounding whitespace, then any run of `{`, `}` and `,` at either end
#[must_use]
pub fn clean_value(raw: &str) -> &str {
    raw.trim().trim_matches(|c: char| matches!(c, '{' | '}' | ','))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_key() {
        let mut input = "Vihavainen2011E,";
        assert_eq!(citation_key(&mut input).unwrap(), "Vihavainen2011E");
        assert_eq!(input, "");

        let mut input = ",";
        assert_eq!(citation_key(&mut input).unwrap(), "");

        let mut input = "John Doe2020S,  ";
        assert_eq!(citation_key(&mut input).unwrap(), "John Doe2020S");

        // only the final comma ends the key
        let mut input = "Doe,2020,\nnext";
        assert_eq!(citation_key(&mut input).unwrap(), "Doe,2020");
        assert_eq!(input, "\nnext");
    }

    #[test]
    fn test_split_field() {
        assert_eq!(
            split_field("  title = {a = b},"),
            Some(("  title ", " {a = b},"))
        );
        assert_eq!(split_field("}"), None);
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value(" {Vihavainen, Arto},"), "Vihavainen, Arto");
        assert_eq!(clean_value("{2011}"), "2011");
        assert_eq!(clean_value("{{Nested}}"), "Nested");
        assert_eq!(clean_value("plain"), "plain");
    }
}
