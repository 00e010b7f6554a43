use alloc::string::String;

use thiserror::Error;

/// A parse failure: what went wrong and where.
///
/// `offset` is a byte offset into the original input buffer. Reason
/// messages are stable enough to test against substrings.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason} at offset {offset}")]
pub struct JsonError {
    pub reason: ErrorReason,
    pub offset: usize,
}

impl JsonError {
    pub fn new(reason: ErrorReason, offset: usize) -> Self {
        Self { reason, offset }
    }
}

/// Everything a checked parse can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorReason {
    #[error("Unexpected end of stream")]
    UnexpectedEnd,
    #[error("Expected '{expected}', found '{found}'")]
    UnexpectedByte { expected: char, found: char },
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid number")]
    InvalidNumber,
    #[error("number does not fit in the target width")]
    NumericOverflow,
    #[error("missing non-nullable member '{0}'")]
    MissingMember(String),
    #[error("unknown member '{0}'")]
    UnknownMember(String),
    #[error("path not found")]
    PathNotFound,
    #[error("invalid ISO-8601 date")]
    InvalidDate,
    #[error("string value is not valid UTF-8")]
    InvalidUtf8,
    #[error("byte above 0x7F where DisallowHigh is in effect")]
    DisallowedHighBit,
    #[error("field does not match its description")]
    FieldMismatch,
}

/// A failure reported by a [`ByteSink`](crate::ByteSink) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SinkError(pub &'static str);

/// A serialize failure, distinct from parse errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializeError {
    /// The output sink refused bytes.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
    /// `to_fields` produced a field whose shape does not match the
    /// description.
    #[error("field does not match its description")]
    FieldMismatch,
}
