//! The type-directed parse dispatcher.
//!
//! [`value`] maps a member [`Kind`] to the concrete parser for the value at
//! the cursor; [`class`] drives a single pass over an input object against
//! a [`Description`]. Member order in the input is free; the produced
//! fields come back in description order.

use alloc::{boxed::Box, string::String, vec, vec::Vec};

use crate::{
    date::parse_iso8601,
    describe::{CustomConverter, Description, IntWidth, Kind, Member},
    error::{ErrorReason, JsonError},
    field::Field,
    options::EightBitMode,
    range::BytesRange,
    skip::{skip_number, skip_value},
};

/// Parse exactly one value of the given kind at the cursor.
pub(crate) fn value(kind: &Kind, rng: &mut BytesRange<'_>) -> Result<Field, JsonError> {
    match kind {
        Kind::Bool => parse_bool(rng),
        Kind::Signed(width) => parse_signed(*width, rng),
        Kind::Unsigned(width) => parse_unsigned(*width, rng),
        Kind::Real => parse_real(rng),
        Kind::StringRaw => parse_string_raw(rng).map(Field::Str),
        Kind::StringEscaped => parse_string_escaped(rng).map(Field::Str),
        Kind::Date => parse_date(rng),
        Kind::Class(desc) => class(desc, rng),
        Kind::Array(element) => parse_array(element, rng),
        Kind::KeyValue { key, value } => parse_key_value(key, value, rng),
        Kind::KeyValueArray {
            key_name,
            key,
            value_name,
            value,
        } => parse_key_value_array(key_name, key, value_name, value, rng),
        Kind::Variant(branches) => parse_variant(branches, rng),
        // Tagged variants are resolved by the class parser, which buffers
        // the raw range until the tag member is known.
        Kind::VariantTagged { .. } => Err(rng.err(ErrorReason::FieldMismatch)),
        Kind::Custom(converter) => parse_custom(converter, rng),
        Kind::Null(inner) => null_or(inner, rng),
    }
}

/// `null`, an exhausted range, or a value of the wrapped kind.
pub(crate) fn null_or(kind: &Kind, rng: &mut BytesRange<'_>) -> Result<Field, JsonError> {
    if rng.empty() {
        return Ok(Field::Null);
    }
    if rng.front_eq(b'n') {
        expect_literal(rng, b"null")?;
        return Ok(Field::Null);
    }
    value(kind, rng)
}

fn member_value(member: &Member, rng: &mut BytesRange<'_>) -> Result<Field, JsonError> {
    if member.nullable {
        null_or(&member.kind, rng)
    } else {
        value(&member.kind, rng)
    }
}

fn expect_literal(rng: &mut BytesRange<'_>, literal: &'static [u8]) -> Result<(), JsonError> {
    if rng.checked() {
        for &b in literal {
            rng.expect(b)?;
        }
    } else {
        rng.remove_prefix(literal.len());
    }
    Ok(())
}

fn parse_bool(rng: &mut BytesRange<'_>) -> Result<Field, JsonError> {
    if rng.front() == b't' {
        expect_literal(rng, b"true")?;
        Ok(Field::Bool(true))
    } else {
        expect_literal(rng, b"false")?;
        Ok(Field::Bool(false))
    }
}

/// Accumulate a run of decimal digits.
fn parse_digits(rng: &mut BytesRange<'_>) -> Result<u64, JsonError> {
    let at = rng.offset();
    let mut v: u64 = 0;
    let mut any = false;
    while rng.front().is_ascii_digit() {
        let d = u64::from(rng.front() - b'0');
        v = v
            .checked_mul(10)
            .and_then(|v| v.checked_add(d))
            .ok_or_else(|| JsonError::new(ErrorReason::NumericOverflow, at))?;
        rng.remove_prefix(1);
        any = true;
    }
    if rng.checked() {
        if !any {
            return Err(JsonError::new(ErrorReason::InvalidNumber, at));
        }
        // An integer member must not continue as a real.
        if matches!(rng.front(), b'.' | b'e' | b'E') {
            return Err(JsonError::new(ErrorReason::InvalidNumber, at));
        }
    }
    Ok(v)
}

fn parse_signed(width: IntWidth, rng: &mut BytesRange<'_>) -> Result<Field, JsonError> {
    let at = rng.offset();
    let negative = rng.front_eq(b'-');
    if negative {
        rng.remove_prefix(1);
    }
    let magnitude = parse_digits(rng)?;
    let v = if negative {
        if magnitude > i64::MAX as u64 + 1 {
            return Err(JsonError::new(ErrorReason::NumericOverflow, at));
        }
        (magnitude as i64).wrapping_neg()
    } else {
        i64::try_from(magnitude)
            .map_err(|_| JsonError::new(ErrorReason::NumericOverflow, at))?
    };
    if rng.checked() && !width.holds_signed(v) {
        return Err(JsonError::new(ErrorReason::NumericOverflow, at));
    }
    Ok(Field::Signed(v))
}

fn parse_unsigned(width: IntWidth, rng: &mut BytesRange<'_>) -> Result<Field, JsonError> {
    let at = rng.offset();
    if rng.front_eq(b'-') {
        return Err(JsonError::new(ErrorReason::InvalidNumber, at));
    }
    let v = parse_digits(rng)?;
    if rng.checked() && !width.holds_unsigned(v) {
        return Err(JsonError::new(ErrorReason::NumericOverflow, at));
    }
    Ok(Field::Unsigned(v))
}

fn parse_real(rng: &mut BytesRange<'_>) -> Result<Field, JsonError> {
    let at = rng.offset();
    let sub = {
        let begin = rng.offset();
        skip_number(rng)?;
        rng.slice(begin, rng.offset())
    };
    let text = core::str::from_utf8(sub)
        .map_err(|_| JsonError::new(ErrorReason::InvalidNumber, at))?;
    let v: f64 = text
        .parse()
        .map_err(|_| JsonError::new(ErrorReason::InvalidNumber, at))?;
    Ok(Field::Real(v))
}

/// The verbatim contents of a string, escapes preserved.
fn parse_string_raw(rng: &mut BytesRange<'_>) -> Result<String, JsonError> {
    rng.expect(b'"')?;
    let begin = rng.offset();
    while rng.has_more() && rng.front() != b'"' {
        if rng.front() >= 0x80 && matches!(rng.eight_bit(), EightBitMode::DisallowHigh) {
            return Err(rng.err(ErrorReason::DisallowedHighBit));
        }
        if rng.front() == b'\\' {
            rng.remove_prefix(2);
        } else {
            rng.remove_prefix(1);
        }
    }
    let raw = rng.slice(begin, rng.offset());
    rng.expect(b'"')?;
    core::str::from_utf8(raw)
        .map(String::from)
        .map_err(|_| JsonError::new(ErrorReason::InvalidUtf8, begin))
}

fn hex_val(c: u8) -> Option<u32> {
    match c {
        b'0'..=b'9' => Some(u32::from(c - b'0')),
        b'a'..=b'f' => Some(u32::from(c - b'a') + 10),
        b'A'..=b'F' => Some(u32::from(c - b'A') + 10),
        _ => None,
    }
}

/// Four hex digits of a `\uXXXX` escape, cursor past the `u`.
fn parse_hex4(rng: &mut BytesRange<'_>) -> Result<u32, JsonError> {
    let mut acc = 0u32;
    for _ in 0..4 {
        let d = hex_val(rng.front()).ok_or_else(|| {
            if rng.empty() {
                rng.err(ErrorReason::UnexpectedEnd)
            } else {
                rng.err(ErrorReason::InvalidEscape)
            }
        })?;
        acc = (acc << 4) | d;
        rng.remove_prefix(1);
    }
    Ok(acc)
}

fn parse_escape(rng: &mut BytesRange<'_>, out: &mut String) -> Result<(), JsonError> {
    let at = rng.offset();
    let c = rng.front();
    rng.remove_prefix(1);
    let decoded = match c {
        b'"' => '"',
        b'\\' => '\\',
        b'/' => '/',
        b'b' => '\u{0008}',
        b'f' => '\u{000C}',
        b'n' => '\n',
        b'r' => '\r',
        b't' => '\t',
        b'u' => {
            let hi = parse_hex4(rng)?;
            let cp = if (0xD800..0xDC00).contains(&hi) {
                // High surrogate: a low surrogate escape must follow.
                if !rng.front_eq(b'\\') {
                    return Err(rng.err(ErrorReason::InvalidEscape));
                }
                rng.remove_prefix(1);
                if rng.front() != b'u' {
                    return Err(rng.err(ErrorReason::InvalidEscape));
                }
                rng.remove_prefix(1);
                let lo = parse_hex4(rng)?;
                if !(0xDC00..0xE000).contains(&lo) {
                    return Err(JsonError::new(ErrorReason::InvalidEscape, at));
                }
                0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00)
            } else {
                hi
            };
            char::from_u32(cp).ok_or_else(|| JsonError::new(ErrorReason::InvalidEscape, at))?
        }
        _ => return Err(JsonError::new(ErrorReason::InvalidEscape, at)),
    };
    out.push(decoded);
    Ok(())
}

/// Decode a string to UTF-8, processing escapes and surrogate pairs.
fn parse_string_escaped(rng: &mut BytesRange<'_>) -> Result<String, JsonError> {
    rng.expect(b'"')?;
    let mut out = String::new();
    loop {
        let run_start = rng.offset();
        while rng.has_more() && rng.front() != b'"' && rng.front() != b'\\' {
            if rng.front() >= 0x80 && matches!(rng.eight_bit(), EightBitMode::DisallowHigh) {
                return Err(rng.err(ErrorReason::DisallowedHighBit));
            }
            rng.remove_prefix(1);
        }
        let run = rng.slice(run_start, rng.offset());
        out.push_str(
            core::str::from_utf8(run)
                .map_err(|_| JsonError::new(ErrorReason::InvalidUtf8, run_start))?,
        );
        match rng.front() {
            b'"' => {
                rng.remove_prefix(1);
                return Ok(out);
            }
            b'\\' => {
                rng.remove_prefix(1);
                parse_escape(rng, &mut out)?;
            }
            _ => return Err(rng.err(ErrorReason::UnexpectedEnd)),
        }
    }
}

fn parse_date(rng: &mut BytesRange<'_>) -> Result<Field, JsonError> {
    rng.expect(b'"')?;
    let begin = rng.offset();
    while rng.has_more() && rng.front() != b'"' {
        rng.remove_prefix(1);
    }
    let raw = rng.slice(begin, rng.offset());
    rng.expect(b'"')?;
    parse_iso8601(raw, begin).map(Field::Date)
}

fn parse_array(element: &Kind, rng: &mut BytesRange<'_>) -> Result<Field, JsonError> {
    rng.expect(b'[')?;
    rng.trim_left()?;
    let mut items = Vec::new();
    while !rng.front_eq(b']') {
        if rng.empty() {
            return Err(rng.err(ErrorReason::UnexpectedEnd));
        }
        items.push(value(element, rng)?);
        rng.clean_tail()?;
    }
    rng.remove_prefix(1);
    Ok(Field::Array(items))
}

/// A mapping key is the member-name string, parsed per the key kind from
/// within its quotes.
fn parse_key(kind: &Kind, rng: &mut BytesRange<'_>) -> Result<Field, JsonError> {
    match kind {
        Kind::StringEscaped => parse_string_escaped(rng).map(Field::Str),
        Kind::StringRaw => parse_string_raw(rng).map(Field::Str),
        Kind::Signed(width) => {
            rng.expect(b'"')?;
            let f = parse_signed(*width, rng)?;
            rng.expect(b'"')?;
            Ok(f)
        }
        Kind::Unsigned(width) => {
            rng.expect(b'"')?;
            let f = parse_unsigned(*width, rng)?;
            rng.expect(b'"')?;
            Ok(f)
        }
        Kind::Date => parse_date(rng),
        _ => Err(rng.err(ErrorReason::FieldMismatch)),
    }
}

fn parse_key_value(
    key: &Kind,
    val: &Kind,
    rng: &mut BytesRange<'_>,
) -> Result<Field, JsonError> {
    rng.expect(b'{')?;
    rng.trim_left()?;
    let mut entries = Vec::new();
    while !rng.front_eq(b'}') {
        if rng.empty() {
            return Err(rng.err(ErrorReason::UnexpectedEnd));
        }
        let k = parse_key(key, rng)?;
        rng.trim_left()?;
        rng.expect(b':')?;
        rng.trim_left()?;
        let v = value(val, rng)?;
        entries.push((k, v));
        rng.clean_tail()?;
    }
    rng.remove_prefix(1);
    Ok(Field::Entries(entries))
}

fn parse_key_value_array(
    key_name: &str,
    key: &Kind,
    value_name: &str,
    val: &Kind,
    rng: &mut BytesRange<'_>,
) -> Result<Field, JsonError> {
    rng.expect(b'[')?;
    rng.trim_left()?;
    let mut entries = Vec::new();
    while !rng.front_eq(b']') {
        if rng.empty() {
            return Err(rng.err(ErrorReason::UnexpectedEnd));
        }
        rng.expect(b'{')?;
        rng.trim_left()?;
        let mut k = None;
        let mut v = None;
        while !rng.front_eq(b'}') {
            let name_at = rng.offset();
            let name = crate::path::parse_name(rng)?;
            if name == key_name.as_bytes() {
                k = Some(parse_key(key, rng)?);
            } else if name == value_name.as_bytes() {
                v = Some(value(val, rng)?);
            } else {
                return Err(JsonError::new(
                    ErrorReason::UnknownMember(lossy_name(name)),
                    name_at,
                ));
            }
            rng.clean_tail()?;
        }
        rng.remove_prefix(1);
        let missing = |n: &str| JsonError::new(ErrorReason::MissingMember(n.into()), rng.offset());
        entries.push((
            k.ok_or_else(|| missing(key_name))?,
            v.ok_or_else(|| missing(value_name))?,
        ));
        rng.clean_tail()?;
    }
    rng.remove_prefix(1);
    Ok(Field::Entries(entries))
}

/// Does the first byte of a value structurally select this branch?
fn branch_matches(kind: &Kind, first: u8) -> bool {
    match first {
        b'"' => match kind {
            Kind::StringRaw | Kind::StringEscaped | Kind::Date => true,
            Kind::Custom(c) => c.as_string,
            _ => false,
        },
        b'[' => matches!(kind, Kind::Array(_) | Kind::KeyValueArray { .. }),
        b'{' => matches!(kind, Kind::Class(_) | Kind::KeyValue { .. }),
        b't' | b'f' => matches!(kind, Kind::Bool),
        b'n' => matches!(kind, Kind::Null(_)),
        _ => match kind {
            Kind::Signed(_) | Kind::Unsigned(_) | Kind::Real => true,
            Kind::Custom(c) => !c.as_string,
            _ => false,
        },
    }
}

fn parse_variant(branches: &[Kind], rng: &mut BytesRange<'_>) -> Result<Field, JsonError> {
    rng.trim_left()?;
    let first = rng.front();
    let Some(idx) = branches.iter().position(|k| branch_matches(k, first)) else {
        return Err(rng.err_unexpected('"'));
    };
    let payload = value(&branches[idx], rng)?;
    Ok(Field::Variant(idx, Box::new(payload)))
}

fn parse_custom(
    converter: &CustomConverter,
    rng: &mut BytesRange<'_>,
) -> Result<Field, JsonError> {
    if converter.as_string {
        rng.expect(b'"')?;
        let begin = rng.offset();
        while rng.has_more() && rng.front() != b'"' {
            if rng.front() == b'\\' {
                rng.remove_prefix(2);
            } else {
                rng.remove_prefix(1);
            }
        }
        let raw = rng.slice(begin, rng.offset());
        rng.expect(b'"')?;
        (converter.from_json)(raw)
    } else {
        let sub = skip_value(rng)?;
        (converter.from_json)(sub.as_slice())
    }
}

fn lossy_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

/// Parse an object against a description in a single pass.
///
/// Unknown input members are skipped (or rejected under
/// `deny_unknown_members`); tagged variants are buffered and resolved once
/// the whole object has been read; described non-nullable members that
/// never appeared fail with `MissingMember`.
pub(crate) fn class<'a>(
    desc: &Description,
    rng: &mut BytesRange<'a>,
) -> Result<Field, JsonError> {
    rng.trim_left()?;
    rng.expect(b'{')?;
    rng.trim_left()?;

    let n = desc.len();
    let mut fields: Vec<Option<Field>> = vec![None; n];
    let mut pending: Vec<(usize, BytesRange<'a>)> = Vec::new();

    loop {
        if rng.front_eq(b'}') {
            break;
        }
        if rng.empty() {
            if rng.checked() {
                return Err(rng.err(ErrorReason::UnexpectedEnd));
            }
            break;
        }
        let name_at = rng.offset();
        let name = crate::path::parse_name(rng)?;
        match desc.find(name) {
            Some((idx, member)) => {
                if matches!(member.kind, Kind::VariantTagged { .. }) {
                    let sub = skip_value(rng)?;
                    pending.push((idx, sub));
                } else {
                    fields[idx] = Some(member_value(member, rng)?);
                }
            }
            None => {
                if rng.deny_unknown() {
                    return Err(JsonError::new(
                        ErrorReason::UnknownMember(lossy_name(name)),
                        name_at,
                    ));
                }
                skip_value(rng)?;
            }
        }
        // Members must be comma-separated; a bare `}` also closes.
        rng.trim_left()?;
        if rng.front_eq(b',') {
            rng.remove_prefix(1);
            rng.trim_left()?;
            if rng.checked() && !rng.front_eq(b'"') {
                return Err(rng.err_unexpected('"'));
            }
        } else if rng.checked() && !rng.front_eq(b'}') {
            return Err(rng.err_unexpected(','));
        }
    }
    rng.expect(b'}')?;

    for (idx, mut sub) in pending {
        let member = &desc.members()[idx];
        let Kind::VariantTagged { tag, branches } = &member.kind else {
            return Err(rng.err(ErrorReason::FieldMismatch));
        };
        if member.nullable && sub.front_eq(b'n') {
            fields[idx] = Some(Field::Null);
            continue;
        }
        let tag_idx = desc
            .index_of(tag)
            .ok_or_else(|| sub.err(ErrorReason::FieldMismatch))?;
        let tag_field = fields[tag_idx]
            .clone()
            .ok_or_else(|| JsonError::new(ErrorReason::MissingMember((*tag).into()), rng.offset()))?;
        let branch_idx = branches
            .iter()
            .position(|(tv, _)| tv.matches(&tag_field))
            .ok_or_else(|| sub.err(ErrorReason::FieldMismatch))?;
        let payload = value(&branches[branch_idx].1, &mut sub)?;
        fields[idx] = Some(Field::Variant(branch_idx, Box::new(payload)));
    }

    let mut out = Vec::with_capacity(n);
    for (i, member) in desc.members().iter().enumerate() {
        match fields[i].take() {
            Some(f) => out.push(f),
            None if member.nullable => out.push(Field::Null),
            None => {
                return Err(JsonError::new(
                    ErrorReason::MissingMember(member.name.into()),
                    rng.offset(),
                ));
            }
        }
    }
    Ok(Field::Class(out))
}
