//! The type-directed serializer.
//!
//! Mirrors the parse dispatcher: [`value`] renders one [`Field`] under its
//! [`Kind`]; [`class`] renders an aggregate's fields in description order.
//! Output goes to a [`ByteSink`], the only thing that can fail besides a
//! field/description mismatch.

use alloc::{format, vec::Vec};

use crate::{
    date::CivilDateTime,
    describe::{Description, Kind, TagValue},
    error::{SerializeError, SinkError},
    field::Field,
    options::{EightBitMode, SerializeOptions},
};

/// An append-only byte sink.
///
/// The serializer performs no I/O of its own; implementations may buffer in
/// memory, count, or hand bytes to a writer. A sink failure aborts the
/// serialize call with [`SerializeError::Sink`].
pub trait ByteSink {
    /// Append `bytes` to the output.
    ///
    /// # Errors
    ///
    /// Implementation-defined; an in-memory sink never fails.
    fn append(&mut self, bytes: &[u8]) -> Result<(), SinkError>;

    /// Append a single byte.
    ///
    /// # Errors
    ///
    /// Same as [`Self::append`].
    #[inline]
    fn push(&mut self, byte: u8) -> Result<(), SinkError> {
        self.append(&[byte])
    }
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn append(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// A sink that discards bytes and remembers how many it saw.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingSink {
    pub len: usize,
}

impl ByteSink for CountingSink {
    #[inline]
    fn append(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.len += bytes.len();
        Ok(())
    }
}

fn mismatch() -> SerializeError {
    SerializeError::FieldMismatch
}

/// Base-10 ASCII for a signed integer.
///
/// Digits are produced modulo 10 into a fixed buffer and reversed. One
/// division round happens before negation so `i64::MIN`, which has no
/// positive counterpart, still renders correctly.
pub(crate) fn write_signed<S: ByteSink + ?Sized>(mut v: i64, out: &mut S) -> Result<(), SinkError> {
    let mut buf = [0u8; 20];
    let mut len = 0;
    if v < 0 {
        out.push(b'-')?;
        buf[len] = b'0' + (-(v % 10)) as u8;
        len += 1;
        v /= -10;
        if v == 0 {
            return out.push(buf[0]);
        }
    }
    loop {
        buf[len] = b'0' + (v % 10) as u8;
        len += 1;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    while len > 0 {
        len -= 1;
        out.push(buf[len])?;
    }
    Ok(())
}

pub(crate) fn write_unsigned<S: ByteSink + ?Sized>(
    mut v: u64,
    out: &mut S,
) -> Result<(), SinkError> {
    let mut buf = [0u8; 20];
    let mut len = 0;
    loop {
        buf[len] = b'0' + (v % 10) as u8;
        len += 1;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    while len > 0 {
        len -= 1;
        out.push(buf[len])?;
    }
    Ok(())
}

/// Shortest round-trip decimal for a real; non-finite values have no JSON
/// form and render as `null`.
fn write_real<S: ByteSink + ?Sized>(v: f64, out: &mut S) -> Result<(), SinkError> {
    if !v.is_finite() {
        return out.append(b"null");
    }
    out.append(format!("{v}").as_bytes())
}

fn to_nibble_char(c: u16) -> u8 {
    debug_assert!(c < 16);
    if c < 10 {
        b'0' + c as u8
    } else {
        b'A' + (c - 10) as u8
    }
}

/// `\uXXXX`, uppercase hex.
fn write_hex_escape<S: ByteSink + ?Sized>(c: u16, out: &mut S) -> Result<(), SinkError> {
    out.append(&[
        b'\\',
        b'u',
        to_nibble_char((c >> 12) & 0xF),
        to_nibble_char((c >> 8) & 0xF),
        to_nibble_char((c >> 4) & 0xF),
        to_nibble_char(c & 0xF),
    ])
}

/// Append a string's contents (no surrounding quotes), escaping per the
/// eight-bit mode.
pub(crate) fn write_escaped<S: ByteSink + ?Sized>(
    s: &str,
    eight_bit: EightBitMode,
    out: &mut S,
) -> Result<(), SinkError> {
    for ch in s.chars() {
        match ch {
            '"' => out.append(b"\\\"")?,
            '\\' => out.append(b"\\\\")?,
            '/' => out.append(b"\\/")?,
            '\u{0008}' => out.append(b"\\b")?,
            '\u{000C}' => out.append(b"\\f")?,
            '\n' => out.append(b"\\n")?,
            '\r' => out.append(b"\\r")?,
            '\t' => out.append(b"\\t")?,
            _ => {
                let cp = ch as u32;
                if matches!(eight_bit, EightBitMode::DisallowHigh) {
                    if cp < 0x20 {
                        write_hex_escape(cp as u16, out)?;
                        continue;
                    }
                    if (0x7F..=0xFFFF).contains(&cp) {
                        write_hex_escape(cp as u16, out)?;
                        continue;
                    }
                    if cp > 0xFFFF {
                        // RFC 2781 surrogate pair.
                        write_hex_escape((0xD7C0 + (cp >> 10)) as u16, out)?;
                        write_hex_escape((0xDC00 + (cp & 0x3FF)) as u16, out)?;
                        continue;
                    }
                }
                let mut utf8 = [0u8; 4];
                out.append(ch.encode_utf8(&mut utf8).as_bytes())?;
            }
        }
    }
    Ok(())
}

fn write_quoted<S: ByteSink + ?Sized>(
    s: &str,
    eight_bit: EightBitMode,
    out: &mut S,
) -> Result<(), SinkError> {
    out.push(b'"')?;
    write_escaped(s, eight_bit, out)?;
    out.push(b'"')
}

/// The raw string form: contents pass through verbatim, escapes already in
/// place.
fn write_quoted_raw<S: ByteSink + ?Sized>(s: &str, out: &mut S) -> Result<(), SinkError> {
    out.push(b'"')?;
    out.append(s.as_bytes())?;
    out.push(b'"')
}

fn write_padded<S: ByteSink + ?Sized>(
    v: u64,
    width: usize,
    out: &mut S,
) -> Result<(), SinkError> {
    let mut threshold = 1u64;
    for _ in 1..width {
        threshold *= 10;
        if v < threshold {
            out.push(b'0')?;
        }
    }
    write_unsigned(v, out)
}

/// `"YYYY-MM-DDTHH:MM:SS(.fff)?Z"`, milliseconds omitted when zero.
fn write_date<S: ByteSink + ?Sized>(millis: i64, out: &mut S) -> Result<(), SinkError> {
    let civil = CivilDateTime::from_epoch_millis(millis);
    out.push(b'"')?;
    if civil.year < 0 {
        out.push(b'-')?;
    }
    write_padded(u64::from(civil.year.unsigned_abs()), 4, out)?;
    out.push(b'-')?;
    write_padded(u64::from(civil.month), 2, out)?;
    out.push(b'-')?;
    write_padded(u64::from(civil.day), 2, out)?;
    out.push(b'T')?;
    write_padded(u64::from(civil.hour), 2, out)?;
    out.push(b':')?;
    write_padded(u64::from(civil.minute), 2, out)?;
    out.push(b':')?;
    write_padded(u64::from(civil.second), 2, out)?;
    if civil.millisecond > 0 {
        out.push(b'.')?;
        write_padded(u64::from(civil.millisecond), 3, out)?;
    }
    out.append(b"Z\"")
}

fn write_tag_value<S: ByteSink + ?Sized>(
    tag: &TagValue,
    options: &SerializeOptions,
    out: &mut S,
) -> Result<(), SinkError> {
    match tag {
        TagValue::Bool(true) => out.append(b"true"),
        TagValue::Bool(false) => out.append(b"false"),
        TagValue::Signed(v) => write_signed(*v, out),
        TagValue::Unsigned(v) => write_unsigned(*v, out),
        TagValue::Str(s) => write_quoted(s, options.eight_bit, out),
    }
}

/// Keys must be JSON strings; numeric key kinds get quoted digits.
fn write_key<S: ByteSink + ?Sized>(
    kind: &Kind,
    field: &Field,
    options: &SerializeOptions,
    out: &mut S,
) -> Result<(), SerializeError> {
    match (kind, field) {
        (Kind::StringEscaped, Field::Str(s)) => write_quoted(s, options.eight_bit, out)?,
        (Kind::StringRaw, Field::Str(s)) => write_quoted_raw(s, out)?,
        (Kind::Signed(_), Field::Signed(v)) => {
            out.push(b'"')?;
            write_signed(*v, out)?;
            out.push(b'"')?;
        }
        (Kind::Unsigned(_), Field::Unsigned(v)) => {
            out.push(b'"')?;
            write_unsigned(*v, out)?;
            out.push(b'"')?;
        }
        (Kind::Date, Field::Date(ms)) => write_date(*ms, out)?,
        _ => return Err(mismatch()),
    }
    Ok(())
}

/// Render one field under its kind.
pub(crate) fn value<S: ByteSink + ?Sized>(
    kind: &Kind,
    field: &Field,
    options: &SerializeOptions,
    out: &mut S,
) -> Result<(), SerializeError> {
    match (kind, field) {
        (Kind::Null(_), Field::Null) => out.append(b"null")?,
        (Kind::Null(inner), f) => return value(inner, f, options, out),
        (Kind::Bool, Field::Bool(true)) => out.append(b"true")?,
        (Kind::Bool, Field::Bool(false)) => out.append(b"false")?,
        (Kind::Signed(_), Field::Signed(v)) => write_signed(*v, out)?,
        (Kind::Unsigned(_), Field::Unsigned(v)) => write_unsigned(*v, out)?,
        (Kind::Real, Field::Real(v)) => write_real(*v, out)?,
        (Kind::StringRaw, Field::Str(s)) => write_quoted_raw(s, out)?,
        (Kind::StringEscaped, Field::Str(s)) => write_quoted(s, options.eight_bit, out)?,
        (Kind::Date, Field::Date(ms)) => write_date(*ms, out)?,
        (Kind::Class(desc), Field::Class(fields)) => class(desc, fields, options, out)?,
        (Kind::Array(element), Field::Array(items)) => {
            out.push(b'[')?;
            let mut first = true;
            for item in items {
                if !first {
                    out.push(b',')?;
                }
                first = false;
                value(element, item, options, out)?;
            }
            out.push(b']')?;
        }
        (Kind::KeyValue { key, value: val }, Field::Entries(entries)) => {
            out.push(b'{')?;
            let mut first = true;
            for (k, v) in entries {
                if !first {
                    out.push(b',')?;
                }
                first = false;
                write_key(key, k, options, out)?;
                out.push(b':')?;
                value(val, v, options, out)?;
            }
            out.push(b'}')?;
        }
        (
            Kind::KeyValueArray {
                key_name,
                key,
                value_name,
                value: val,
            },
            Field::Entries(entries),
        ) => {
            out.push(b'[')?;
            let mut first = true;
            for (k, v) in entries {
                if !first {
                    out.push(b',')?;
                }
                first = false;
                out.push(b'{')?;
                write_quoted(key_name, options.eight_bit, out)?;
                out.push(b':')?;
                write_key(key, k, options, out)?;
                out.push(b',')?;
                write_quoted(value_name, options.eight_bit, out)?;
                out.push(b':')?;
                value(val, v, options, out)?;
                out.push(b'}')?;
            }
            out.push(b']')?;
        }
        (Kind::Variant(branches), Field::Variant(idx, payload)) => {
            let branch = branches.get(*idx).ok_or_else(mismatch)?;
            value(branch, payload, options, out)?;
        }
        (Kind::VariantTagged { branches, .. }, Field::Variant(idx, payload)) => {
            let (_, branch) = branches.get(*idx).ok_or_else(mismatch)?;
            value(branch, payload, options, out)?;
        }
        (Kind::Custom(converter), f) => {
            let bytes = (converter.to_json)(f).ok_or_else(mismatch)?;
            if converter.as_string {
                out.push(b'"')?;
                out.append(&bytes)?;
                out.push(b'"')?;
            } else {
                out.append(&bytes)?;
            }
        }
        _ => return Err(mismatch()),
    }
    Ok(())
}

/// Render an aggregate's fields as an object, in description order.
///
/// Empty nullable members are omitted. A member referenced as a tag by a
/// `VariantTagged` sibling is emitted from that variant's active-branch
/// discriminator, and only once, however many variants reference it.
pub(crate) fn class<S: ByteSink + ?Sized>(
    desc: &Description,
    fields: &[Field],
    options: &SerializeOptions,
    out: &mut S,
) -> Result<(), SerializeError> {
    if fields.len() != desc.len() {
        return Err(mismatch());
    }
    out.push(b'{')?;
    let mut first = true;
    let mut separate = |out: &mut S| -> Result<(), SinkError> {
        if first {
            first = false;
            Ok(())
        } else {
            out.push(b',')
        }
    };

    for (idx, member) in desc.members().iter().enumerate() {
        // A tag member is owned by the variants that reference it: its
        // value is the active branch's discriminator, written once. Only
        // when no referencing variant is active does the member's own
        // field speak for itself.
        if let Some(variant_idx) = tag_referents(desc, member.name)
            .find(|&i| !(desc.members()[i].nullable && fields[i].is_null()))
        {
            let Kind::VariantTagged { branches, .. } = &desc.members()[variant_idx].kind else {
                return Err(mismatch());
            };
            let Field::Variant(branch_idx, _) = &fields[variant_idx] else {
                return Err(mismatch());
            };
            let (tag_value, _) = branches.get(*branch_idx).ok_or_else(mismatch)?;
            separate(out)?;
            write_quoted(member.name, options.eight_bit, out)?;
            out.push(b':')?;
            write_tag_value(tag_value, options, out)?;
            continue;
        }
        if member.nullable && fields[idx].is_null() {
            continue;
        }
        separate(out)?;
        write_quoted(member.name, options.eight_bit, out)?;
        out.push(b':')?;
        value(&member.kind, &fields[idx], options, out)?;
    }
    out.push(b'}')?;
    Ok(())
}

/// Indexes of `VariantTagged` members whose tag is `name`.
fn tag_referents<'d>(
    desc: &'d Description,
    name: &'d str,
) -> impl Iterator<Item = usize> + 'd {
    desc.members().iter().enumerate().filter_map(move |(i, m)| {
        matches!(&m.kind, Kind::VariantTagged { tag, .. } if *tag == name).then_some(i)
    })
}
