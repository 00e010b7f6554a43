//! Member-name parsing and the dotted/bracketed JSON-path navigator.
//!
//! Paths select a sub-document before binding: `"a[2].b"` walks to member
//! `a`, array element 2, member `b`. A `.` inside a member name is escaped
//! as `\.`; the backslash escapes any following byte.

use crate::{
    error::{ErrorReason, JsonError},
    options::ParseOptions,
    range::BytesRange,
    skip::skip_value,
};

/// Parse a member name with the cursor on its opening quote.
///
/// Returns the raw bytes between the quotes (escapes preserved) and leaves
/// the cursor on the first byte of the member's value, past the `:` and any
/// surrounding whitespace.
///
/// # Errors
///
/// `UnexpectedByte` when the name does not start with `"` or the separator
/// `:` is missing; `UnexpectedEnd` when the string does not close.
pub fn parse_name<'a>(rng: &mut BytesRange<'a>) -> Result<&'a [u8], JsonError> {
    rng.expect(b'"')?;
    let begin = rng.offset();
    while rng.has_more() && rng.front() != b'"' {
        if rng.front() == b'\\' {
            rng.remove_prefix(2);
        } else {
            rng.remove_prefix(1);
        }
    }
    let name = rng.slice(begin, rng.offset());
    rng.expect(b'"')?;
    rng.trim_left()?;
    rng.expect(b':')?;
    rng.trim_left()?;
    Ok(name)
}

/// One popped path segment and the delimiter that ended it (`0` at the end
/// of the path).
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct PathSegment<'p> {
    pub current: &'p [u8],
    pub found_char: u8,
}

/// Pop the next segment off the front of `path`.
///
/// A leading `.` is dropped. The segment ends at the first unescaped `.`,
/// `[`, or `]`; `\` escapes the following byte. The returned slice keeps
/// its escape bytes; [`json_path_compare`] strips them during comparison.
pub(crate) fn pop_json_path<'p>(path: &mut &'p [u8]) -> PathSegment<'p> {
    if path.first() == Some(&b'.') {
        *path = &path[1..];
    }
    let mut in_escape = false;
    let mut found_char = 0u8;
    let mut len = path.len();
    for (i, &c) in path.iter().enumerate() {
        if in_escape {
            in_escape = false;
            continue;
        }
        match c {
            b'\\' => in_escape = true,
            b'.' | b'[' | b']' => {
                found_char = c;
                len = i;
                break;
            }
            _ => {}
        }
    }
    let current = &path[..len];
    // Drop the segment and its terminating delimiter.
    *path = &path[(len + usize::from(found_char != 0)).min(path.len())..];
    PathSegment {
        current,
        found_char,
    }
}

/// Byte-wise equality of a path segment (escapes stripped) against a member
/// name.
pub(crate) fn json_path_compare(mut segment: &[u8], mut member_name: &[u8]) -> bool {
    if segment.first() == Some(&b'\\') {
        segment = &segment[1..];
    }
    while !segment.is_empty() && !member_name.is_empty() {
        if segment[0] != member_name[0] {
            return false;
        }
        segment = &segment[1..];
        if segment.first() == Some(&b'\\') {
            segment = &segment[1..];
        }
        member_name = &member_name[1..];
    }
    segment.len() == member_name.len()
}

fn parse_index(segment: &[u8]) -> Option<usize> {
    if segment.is_empty() {
        return None;
    }
    let mut idx = 0usize;
    for &c in segment {
        if !c.is_ascii_digit() {
            return None;
        }
        idx = idx.checked_mul(10)?.checked_add(usize::from(c - b'0'))?;
    }
    Some(idx)
}

fn walk(rng: &mut BytesRange<'_>, mut path: &[u8]) -> Result<bool, JsonError> {
    let mut segment = pop_json_path(&mut path);
    loop {
        if segment.current.is_empty() {
            if segment.found_char == 0 {
                return Ok(true);
            }
            // Nothing to match between two delimiters, as in "a[1][2]".
            segment = pop_json_path(&mut path);
            continue;
        }
        if segment.found_char == b']' {
            // Array index.
            if !rng.front_eq(b'[') {
                return Ok(false);
            }
            rng.remove_prefix(1);
            rng.trim_left_unchecked();
            let Some(mut idx) = parse_index(segment.current) else {
                return Ok(false);
            };
            while idx > 0 {
                idx -= 1;
                skip_value(rng)?;
                rng.trim_left()?;
                if idx > 0 && !rng.front_eq(b',') {
                    return Ok(false);
                }
                rng.clean_tail()?;
            }
            // Landing on the closer means the index is one past the end.
            if rng.empty() || rng.front_eq(b']') {
                return Ok(false);
            }
        } else {
            // Object member.
            if !rng.front_eq(b'{') {
                return Ok(false);
            }
            rng.remove_prefix(1);
            rng.trim_left_unchecked();
            let mut name = parse_name(rng)?;
            while !json_path_compare(segment.current, name) {
                skip_value(rng)?;
                rng.clean_tail()?;
                if rng.empty() || rng.front() != b'"' {
                    return Ok(false);
                }
                name = parse_name(rng)?;
            }
        }
        segment = pop_json_path(&mut path);
    }
}

/// Locate the value identified by `path` inside `input`.
///
/// On success returns `(true, range)` with the range fronted by the first
/// byte of the value; `(false, range)` when the path does not resolve.
///
/// # Errors
///
/// Structural errors from checked parsing while walking (the distinction
/// from `(false, _)` is deliberate: a missing member is not malformed
/// input).
pub fn find_range<'a>(
    input: &'a [u8],
    path: &str,
    options: &ParseOptions,
) -> Result<(bool, BytesRange<'a>), JsonError> {
    let mut rng = BytesRange::new(input, options);
    rng.trim_left()?;
    if rng.has_more() && !path.is_empty() {
        let found = walk(&mut rng, path.as_bytes())?;
        if !found {
            return Ok((false, rng));
        }
    }
    Ok((true, rng))
}
