//! Structural skipping over a single JSON value.
//!
//! [`skip_value`] advances the cursor past exactly one value without
//! materializing it and returns the sub-range that covers it. Both the
//! JSON-path navigator and unknown-member tolerance are built on it.

use alloc::vec::Vec;

use crate::{
    error::{ErrorReason, JsonError},
    range::BytesRange,
};

/// Bytes that may appear in a JSON number after the first.
#[inline]
fn is_number_byte(c: u8) -> bool {
    matches!(c, b'0'..=b'9' | b'e' | b'E' | b'+' | b'-' | b'.')
}

/// Skip exactly one JSON value starting at the cursor.
///
/// Returns the sub-range of the original buffer bounding the value. The
/// cursor is left at the first byte after the value; trailing whitespace
/// and separators are the caller's business (usually via
/// [`BytesRange::clean_tail`]).
///
/// # Errors
///
/// In checked mode: `UnexpectedEnd` when the value does not close,
/// `UnexpectedByte` when the leading byte starts no JSON value or a literal
/// mismatches, `InvalidNumber` when a number has no digits.
pub fn skip_value<'a>(rng: &mut BytesRange<'a>) -> Result<BytesRange<'a>, JsonError> {
    let begin = rng.offset();
    match rng.front() {
        b'"' => skip_string(rng)?,
        b'{' | b'[' => skip_bracketed(rng)?,
        b't' => skip_literal(rng, b"true")?,
        b'f' => skip_literal(rng, b"false")?,
        b'n' => skip_literal(rng, b"null")?,
        b'-' | b'0'..=b'9' => skip_number(rng)?,
        _ => {
            if rng.checked() {
                return Err(rng.err_unexpected('"'));
            }
            // Trusted input promised a value here; treat the byte run as
            // one and move on.
            rng.remove_prefix(1);
        }
    }
    Ok(rng.sub_range(begin, rng.offset()))
}

/// Skip a string, cursor on the opening quote. Consumes the closing quote.
pub(crate) fn skip_string(rng: &mut BytesRange<'_>) -> Result<(), JsonError> {
    rng.expect(b'"')?;
    while rng.has_more() && rng.front() != b'"' {
        if rng.front() == b'\\' {
            rng.remove_prefix(2);
        } else {
            rng.remove_prefix(1);
        }
    }
    rng.expect(b'"')
}

fn skip_literal(rng: &mut BytesRange<'_>, literal: &'static [u8]) -> Result<(), JsonError> {
    if rng.checked() {
        for &b in literal {
            rng.expect(b)?;
        }
    } else {
        rng.remove_prefix(literal.len());
    }
    Ok(())
}

pub(crate) fn skip_number(rng: &mut BytesRange<'_>) -> Result<(), JsonError> {
    let begin = rng.offset();
    if rng.front_eq(b'-') {
        rng.remove_prefix(1);
    }
    let digits_at = rng.offset();
    while rng.has_more() && is_number_byte(rng.front()) {
        rng.remove_prefix(1);
    }
    if rng.checked() && rng.offset() == digits_at {
        return Err(JsonError::new(ErrorReason::InvalidNumber, begin));
    }
    Ok(())
}

/// Skip an object or array, cursor on the opener. Respects nested strings.
fn skip_bracketed(rng: &mut BytesRange<'_>) -> Result<(), JsonError> {
    let mut closers: Vec<u8> = Vec::new();
    loop {
        if rng.empty() {
            if rng.checked() {
                return Err(rng.err(ErrorReason::UnexpectedEnd));
            }
            return Ok(());
        }
        match rng.front() {
            b'{' => {
                closers.push(b'}');
                rng.remove_prefix(1);
            }
            b'[' => {
                closers.push(b']');
                rng.remove_prefix(1);
            }
            b'}' | b']' => {
                let found = rng.front();
                let expected = closers.pop();
                if rng.checked() {
                    match expected {
                        Some(e) if e == found => {}
                        Some(e) => {
                            return Err(rng.err(ErrorReason::UnexpectedByte {
                                expected: e as char,
                                found: found as char,
                            }));
                        }
                        None => return Err(rng.err_unexpected('{')),
                    }
                }
                rng.remove_prefix(1);
                if closers.is_empty() {
                    return Ok(());
                }
            }
            b'"' => skip_string(rng)?,
            _ => rng.remove_prefix(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::skip_value;
    use crate::{options::ParseOptions, range::BytesRange};

    fn skipped(input: &str) -> (usize, usize) {
        let opts = ParseOptions::default();
        let mut rng = BytesRange::new(input.as_bytes(), &opts);
        let sub = skip_value(&mut rng).unwrap();
        (sub.offset(), sub.offset() + sub.as_slice().len())
    }

    #[test]
    fn skips_scalars() {
        assert_eq!(skipped("true,"), (0, 4));
        assert_eq!(skipped("false]"), (0, 5));
        assert_eq!(skipped("null}"), (0, 4));
        assert_eq!(skipped("-12.5e3,"), (0, 7));
        assert_eq!(skipped("\"a\\\"b\" ,"), (0, 6));
    }

    #[test]
    fn skips_nested_structures() {
        let input = r#"{"a":[1,{"b":"}"}],"c":null} ,"#;
        assert_eq!(skipped(input), (0, 28));
    }

    #[test]
    fn leaves_cursor_after_value() {
        let opts = ParseOptions::default();
        let mut rng = BytesRange::new(b"[1,2] , 3", &opts);
        skip_value(&mut rng).unwrap();
        rng.clean_tail().unwrap();
        assert_eq!(rng.front(), b'3');
    }

    #[test]
    fn reports_unclosed_structure() {
        let opts = ParseOptions::default();
        let mut rng = BytesRange::new(b"[1,2", &opts);
        assert!(skip_value(&mut rng).is_err());
    }

    #[test]
    fn reports_mismatched_closer() {
        let opts = ParseOptions::default();
        let mut rng = BytesRange::new(b"[1,2}", &opts);
        assert!(skip_value(&mut rng).is_err());
    }

    #[test]
    fn reports_bad_literal() {
        let opts = ParseOptions::default();
        let mut rng = BytesRange::new(b"trve", &opts);
        assert!(skip_value(&mut rng).is_err());
    }
}
