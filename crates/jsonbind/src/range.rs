//! The parser's cursor over the input byte buffer.
//!
//! A [`BytesRange`] borrows the input, tracks the current position, and
//! carries the parse policies (trust, whitespace, comments, eight-bit). All
//! parsing primitives advance a `BytesRange` in place; sub-ranges produced
//! by skipping share the same buffer so error offsets stay meaningful.

use crate::{
    error::{ErrorReason, JsonError},
    options::{CommentMode, EightBitMode, ParseOptions, TrustMode, WhitespaceMode},
};

/// Cursor over a contiguous byte range with configurable parse policies.
///
/// Invariant: `pos <= end <= input.len()`. Reads past `end` return `0`,
/// which never matches a structural byte, so scanning loops terminate
/// without bounds branches at every call site.
#[derive(Debug, Clone)]
pub struct BytesRange<'a> {
    input: &'a [u8],
    pos: usize,
    end: usize,
    trust: TrustMode,
    whitespace: WhitespaceMode,
    comments: CommentMode,
    eight_bit: EightBitMode,
    deny_unknown: bool,
}

impl<'a> BytesRange<'a> {
    /// Creates a range over the whole of `input` with the given policies.
    #[must_use]
    pub fn new(input: &'a [u8], options: &ParseOptions) -> Self {
        Self {
            input,
            pos: 0,
            end: input.len(),
            trust: options.trust,
            whitespace: options.whitespace,
            comments: options.comments,
            eight_bit: options.eight_bit,
            deny_unknown: options.deny_unknown_members,
        }
    }

    /// A sub-range of the same buffer, inheriting this range's policies.
    ///
    /// Offsets reported from the sub-range remain offsets into the original
    /// input.
    #[must_use]
    pub(crate) fn sub_range(&self, begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end && end <= self.input.len());
        Self {
            input: self.input,
            pos: begin,
            end,
            trust: self.trust,
            whitespace: self.whitespace,
            comments: self.comments,
            eight_bit: self.eight_bit,
            deny_unknown: self.deny_unknown,
        }
    }

    #[inline]
    #[must_use]
    pub fn checked(&self) -> bool {
        matches!(self.trust, TrustMode::Checked)
    }

    #[inline]
    #[must_use]
    pub(crate) fn eight_bit(&self) -> EightBitMode {
        self.eight_bit
    }

    #[inline]
    #[must_use]
    pub(crate) fn deny_unknown(&self) -> bool {
        self.deny_unknown
    }

    /// Byte offset of the cursor into the original input.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    #[must_use]
    pub fn empty(&self) -> bool {
        self.pos >= self.end
    }

    #[inline]
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pos < self.end
    }

    /// The current byte, or `0` when the range is exhausted.
    #[inline]
    #[must_use]
    pub fn front(&self) -> u8 {
        if self.pos < self.end {
            self.input[self.pos]
        } else {
            0
        }
    }

    /// `true` if the range has a current byte equal to `c`.
    #[inline]
    #[must_use]
    pub fn front_eq(&self, c: u8) -> bool {
        self.pos < self.end && self.input[self.pos] == c
    }

    /// Advance by `n` bytes, clamped to the end of the range.
    #[inline]
    pub fn remove_prefix(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.end);
    }

    /// The unconsumed bytes.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &'a [u8] {
        &self.input[self.pos..self.end]
    }

    /// Bytes of the original buffer between two offsets.
    #[inline]
    #[must_use]
    pub(crate) fn slice(&self, begin: usize, end: usize) -> &'a [u8] {
        &self.input[begin..end]
    }

    #[inline]
    #[must_use]
    pub fn is_space(&self) -> bool {
        matches!(self.front(), 0x20 | 0x09 | 0x0A | 0x0D)
    }

    pub(crate) fn err(&self, reason: ErrorReason) -> JsonError {
        JsonError::new(reason, self.pos)
    }

    pub(crate) fn err_unexpected(&self, expected: char) -> JsonError {
        if self.empty() {
            self.err(ErrorReason::UnexpectedEnd)
        } else {
            self.err(ErrorReason::UnexpectedByte {
                expected,
                found: self.front() as char,
            })
        }
    }

    /// Require and consume the byte `c`.
    ///
    /// # Errors
    ///
    /// In checked mode, `UnexpectedEnd` when exhausted and `UnexpectedByte`
    /// when the current byte differs. Unchecked mode consumes blindly.
    #[inline]
    pub fn expect(&mut self, c: u8) -> Result<(), JsonError> {
        if self.checked() && !self.front_eq(c) {
            return Err(self.err_unexpected(c as char));
        }
        self.remove_prefix(1);
        Ok(())
    }

    /// Skip whitespace only, without comment handling or policy checks.
    ///
    /// Used directly after structural openers, where the grammar guarantees
    /// no comment may legally start.
    pub fn trim_left_unchecked(&mut self) {
        while self.is_space() {
            self.pos += 1;
        }
    }

    /// Skip whitespace and, in checked mode, comments per the comment
    /// policy.
    ///
    /// Afterwards the range is either empty or fronted by a
    /// non-whitespace, non-comment byte. Under `WhitespaceMode::Disallow`
    /// this is a no-op, so stray whitespace trips the next structural
    /// expectation instead.
    ///
    /// # Errors
    ///
    /// `UnexpectedEnd` when a block comment is left unterminated.
    pub fn trim_left(&mut self) -> Result<(), JsonError> {
        if matches!(self.whitespace, WhitespaceMode::Disallow) {
            return Ok(());
        }
        loop {
            self.trim_left_unchecked();
            if !self.checked() {
                return Ok(());
            }
            match self.comments {
                CommentMode::None => return Ok(()),
                CommentMode::CStyle => {
                    if self.front_eq(b'/') && self.peek_at(1) == Some(b'/') {
                        self.skip_to_line_end();
                    } else if self.front_eq(b'/') && self.peek_at(1) == Some(b'*') {
                        self.skip_block_comment()?;
                    } else {
                        return Ok(());
                    }
                }
                CommentMode::Hash => {
                    if self.front_eq(b'#') {
                        self.skip_to_line_end();
                    } else {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// After a value: skip whitespace and at most one `,`.
    ///
    /// Idempotent once the comma is consumed; further calls only trim.
    ///
    /// # Errors
    ///
    /// Propagates comment termination errors from [`Self::trim_left`].
    pub fn clean_tail(&mut self) -> Result<(), JsonError> {
        self.trim_left()?;
        if self.front_eq(b',') {
            self.remove_prefix(1);
            self.trim_left()?;
        }
        Ok(())
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        let at = self.pos + n;
        (at < self.end).then(|| self.input[at])
    }

    fn skip_to_line_end(&mut self) {
        while self.has_more() && self.front() != b'\n' {
            self.pos += 1;
        }
        if self.has_more() {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), JsonError> {
        // Past the "/*" opener.
        self.pos += 2;
        while self.has_more() {
            if self.front() == b'*' && self.peek_at(1) == Some(b'/') {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(self.err(ErrorReason::UnexpectedEnd))
    }
}
