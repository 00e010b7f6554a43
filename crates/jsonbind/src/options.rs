use alloc::string::String;

/// Controls whether the parser validates the structure of its input.
///
/// In `Checked` mode every structural expectation is verified and violations
/// are reported as [`JsonError`](crate::JsonError) values with a byte offset.
/// In `Unchecked` mode those verifications are elided; the input must come
/// from a trusted producer that guarantees well-formed JSON. Feeding
/// malformed input to an `Unchecked` parse never reads out of bounds, but
/// the result is unspecified: it may be garbage or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustMode {
    /// Validate structure and report errors.
    Checked,
    /// Assume well-formed input and skip validation.
    Unchecked,
}

impl Default for TrustMode {
    fn default() -> Self {
        Self::Checked
    }
}

/// Controls whether whitespace is permitted between tokens.
///
/// The parser recognizes the four whitespace characters defined by the JSON
/// specification: space (U+0020), horizontal tab (U+0009), line feed
/// (U+000A), and carriage return (U+000D).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitespaceMode {
    /// Standard JSON whitespace may appear between tokens.
    Allow,
    /// No whitespace is permitted between tokens.
    Disallow,
}

impl Default for WhitespaceMode {
    fn default() -> Self {
        Self::Allow
    }
}

/// Comment syntax accepted between tokens.
///
/// Comments are an extension to RFC 8259 and are only recognized where
/// whitespace is trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentMode {
    /// No comments are recognized.
    None,
    /// `//` to end of line and `/* ... */` block comments.
    CStyle,
    /// `#` to end of line.
    Hash,
}

impl Default for CommentMode {
    fn default() -> Self {
        Self::None
    }
}

/// String policy for bytes outside the ASCII range.
///
/// On output this selects between verbatim UTF-8 and `\uXXXX` escapes; on
/// input, `DisallowHigh` rejects raw bytes at or above 0x80 inside string
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EightBitMode {
    /// Pass UTF-8 through verbatim.
    AllowFull,
    /// Escape every code point at or above 0x7F as `\uXXXX`, synthesizing
    /// surrogate pairs for code points above U+FFFF.
    DisallowHigh,
}

impl Default for EightBitMode {
    fn default() -> Self {
        Self::AllowFull
    }
}

/// Configuration options for a parse call.
///
/// # Examples
///
/// ```rust
/// use jsonbind::{ParseOptions, TrustMode};
///
/// let options = ParseOptions {
///     trust: TrustMode::Unchecked,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Whether structural validation is performed.
    ///
    /// # Default
    ///
    /// `TrustMode::Checked`
    pub trust: TrustMode,

    /// Whether whitespace may appear between tokens.
    ///
    /// # Default
    ///
    /// `WhitespaceMode::Allow`
    pub whitespace: WhitespaceMode,

    /// Comment syntax recognized wherever whitespace is trimmed.
    ///
    /// # Default
    ///
    /// `CommentMode::None`
    pub comments: CommentMode,

    /// Policy for raw bytes at or above 0x80 inside string values.
    ///
    /// # Default
    ///
    /// `EightBitMode::AllowFull`
    pub eight_bit: EightBitMode,

    /// Whether an input member absent from the description is an error.
    ///
    /// When `false`, unknown members are skipped structurally. When `true`,
    /// the first unknown member fails the parse with
    /// [`ErrorReason::UnknownMember`](crate::ErrorReason::UnknownMember).
    ///
    /// # Default
    ///
    /// `false`
    pub deny_unknown_members: bool,

    /// A dotted/bracketed path selecting the sub-document to bind.
    ///
    /// Segments are member names separated by `.`, or unsigned indexes in
    /// brackets: `"coords[2].lat"`. A `.` inside a member name is escaped
    /// as `\.`. When the path cannot be resolved the parse fails with
    /// [`ErrorReason::PathNotFound`](crate::ErrorReason::PathNotFound).
    ///
    /// # Default
    ///
    /// `None` (bind the root value)
    pub path: Option<String>,
}

/// Configuration options for a serialize call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions {
    /// String emission policy for non-ASCII code points.
    ///
    /// # Default
    ///
    /// `EightBitMode::AllowFull`
    pub eight_bit: EightBitMode,
}
