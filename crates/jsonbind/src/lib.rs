//! Declarative, type-directed JSON parsing and serialization.
//!
//! A type describes its JSON shape once, as an ordered list of member
//! descriptions; from that description alone the library parses RFC 8259
//! documents into instances and serializes instances back out. No DOM is
//! built: the parser binds input bytes straight to the described members,
//! skipping unknown ones structurally, and the serializer renders members
//! in description order.
//!
//! ```rust
//! use jsonbind::{Description, Field, Fields, JsonBind, JsonError, Kind, Member};
//!
//! struct Greeting {
//!     text: String,
//! }
//!
//! impl JsonBind for Greeting {
//!     fn description() -> Description {
//!         Description::new(vec![Member::new("text", Kind::StringEscaped)])
//!     }
//!
//!     fn from_fields(fields: Fields) -> Result<Self, JsonError> {
//!         let mut it = fields.into_iter();
//!         Ok(Greeting {
//!             text: it.next().unwrap().into_str()?,
//!         })
//!     }
//!
//!     fn to_fields(&self) -> Fields {
//!         vec![Field::Str(self.text.clone())]
//!     }
//! }
//!
//! let g: Greeting = jsonbind::parse(br#"{"text":"hi"}"#, &Default::default()).unwrap();
//! assert_eq!(g.text, "hi");
//!
//! let mut out = Vec::new();
//! jsonbind::serialize(&g, &mut out, &Default::default()).unwrap();
//! assert_eq!(out, br#"{"text":"hi"}"#);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod date;
mod describe;
mod error;
mod field;
mod options;
mod parse;
mod path;
mod range;
mod ser;
mod skip;

use alloc::vec::Vec;

pub use date::CivilDateTime;
pub use describe::{CustomConverter, Description, IntWidth, Kind, Member, TagValue};
pub use error::{ErrorReason, JsonError, SerializeError, SinkError};
pub use field::{Field, Fields, JsonBind};
pub use options::{
    CommentMode, EightBitMode, ParseOptions, SerializeOptions, TrustMode, WhitespaceMode,
};
pub use path::{find_range, parse_name};
pub use range::BytesRange;
pub use ser::{ByteSink, CountingSink};
pub use skip::skip_value;

/// Position a range at the value to bind: the root, or the sub-document
/// selected by `options.path`.
fn locate<'a>(input: &'a [u8], options: &ParseOptions) -> Result<BytesRange<'a>, JsonError> {
    if let Some(path) = options.path.as_deref() {
        let (found, rng) = find_range(input, path, options)?;
        if !found {
            return Err(JsonError::new(ErrorReason::PathNotFound, rng.offset()));
        }
        Ok(rng)
    } else {
        let mut rng = BytesRange::new(input, options);
        rng.trim_left()?;
        Ok(rng)
    }
}

/// Parse one described aggregate from `input`.
///
/// # Errors
///
/// Any [`JsonError`] from checked parsing, `PathNotFound` when
/// `options.path` does not resolve, or whatever
/// [`JsonBind::from_fields`] reports.
pub fn parse<T: JsonBind>(input: &[u8], options: &ParseOptions) -> Result<T, JsonError> {
    let desc = T::description();
    let mut rng = locate(input, options)?;
    let fields = match parse::class(&desc, &mut rng)? {
        Field::Class(fields) => fields,
        _ => return Err(rng.err(ErrorReason::FieldMismatch)),
    };
    T::from_fields(fields)
}

/// Parse a JSON array of described aggregates.
///
/// # Errors
///
/// As for [`parse`].
pub fn parse_array<T: JsonBind>(
    input: &[u8],
    options: &ParseOptions,
) -> Result<Vec<T>, JsonError> {
    let desc = T::description();
    let mut rng = locate(input, options)?;
    rng.expect(b'[')?;
    rng.trim_left()?;
    let mut out = Vec::new();
    while !rng.front_eq(b']') {
        if rng.empty() {
            return Err(rng.err(ErrorReason::UnexpectedEnd));
        }
        let fields = match parse::class(&desc, &mut rng)? {
            Field::Class(fields) => fields,
            _ => return Err(rng.err(ErrorReason::FieldMismatch)),
        };
        out.push(T::from_fields(fields)?);
        rng.clean_tail()?;
    }
    rng.remove_prefix(1);
    Ok(out)
}

/// Parse one value of an explicit kind, without a describing type.
///
/// The building block under [`parse`]; useful for probing a document or
/// binding free-standing values.
///
/// # Errors
///
/// As for [`parse`].
pub fn parse_value(input: &[u8], kind: &Kind, options: &ParseOptions) -> Result<Field, JsonError> {
    let mut rng = locate(input, options)?;
    parse::value(kind, &mut rng)
}

/// Serialize one described aggregate into `sink`.
///
/// # Errors
///
/// [`SerializeError::Sink`] when the sink refuses bytes;
/// [`SerializeError::FieldMismatch`] when
/// [`JsonBind::to_fields`] disagrees with the description.
pub fn serialize<T: JsonBind, S: ByteSink + ?Sized>(
    value: &T,
    sink: &mut S,
    options: &SerializeOptions,
) -> Result<(), SerializeError> {
    let desc = T::description();
    let fields = value.to_fields();
    ser::class(&desc, &fields, options, sink)
}

/// Serialize a slice of described aggregates as a JSON array.
///
/// # Errors
///
/// As for [`serialize`].
pub fn serialize_array<T: JsonBind, S: ByteSink + ?Sized>(
    values: &[T],
    sink: &mut S,
    options: &SerializeOptions,
) -> Result<(), SerializeError> {
    let desc = T::description();
    sink.push(b'[')?;
    let mut first = true;
    for v in values {
        if !first {
            sink.push(b',')?;
        }
        first = false;
        let fields = v.to_fields();
        ser::class(&desc, &fields, options, sink)?;
    }
    sink.push(b']')?;
    Ok(())
}

/// Serialize one field of an explicit kind, without a describing type.
///
/// The mirror of [`parse_value`].
///
/// # Errors
///
/// As for [`serialize`].
pub fn serialize_value<S: ByteSink + ?Sized>(
    kind: &Kind,
    field: &Field,
    sink: &mut S,
    options: &SerializeOptions,
) -> Result<(), SerializeError> {
    ser::value(kind, field, options, sink)
}

/// Serialize into a fresh buffer.
///
/// # Errors
///
/// As for [`serialize`].
pub fn to_vec<T: JsonBind>(value: &T, options: &SerializeOptions) -> Result<Vec<u8>, SerializeError> {
    let mut out = Vec::new();
    serialize(value, &mut out, options)?;
    Ok(out)
}

#[cfg(test)]
mod tests;
