//! Immutable document snapshot.
//!
//! ## Why Rope?
//!
//! Scanning needs "which line is byte 4711 on?" for every symbol it finds.
//! A rope keeps a line index in its internal tree, so each lookup is
//! O(log n) instead of counting newlines from the start of the text.
//!
//! Lines are split on `\n` only. ropey is built without its `unicode_lines`
//! and `cr_lines` features, so a form feed or U+2028 inside a comment does
//! not shift the line of everything after it.

use ropey::Rope;
use std::borrow::Cow;

use crate::{BufferError, BufferResult, Position};

/// A read-only view over one version of a document.
///
/// The original `&str` is kept alongside the rope so callers can slice by
/// byte offset without copying.
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    text: &'a str,
    rope: Rope,
}

impl<'a> SourceText<'a> {
    /// Creates a snapshot of `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            rope: Rope::from_str(text),
        }
    }

    /// Returns the underlying text.
    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Returns the length in bytes.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the document is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the number of lines.
    ///
    /// An empty document has 1 line. A document ending with `\n` counts
    /// the empty line after it.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Checks that `offset` can be used to slice the text.
    pub fn check_offset(&self, offset: usize) -> BufferResult<()> {
        if offset > self.text.len() {
            return Err(BufferError::OffsetOutOfBounds {
                offset,
                len: self.text.len(),
            });
        }
        if !self.text.is_char_boundary(offset) {
            return Err(BufferError::NotCharBoundary(offset));
        }
        Ok(())
    }

    /// Returns the 0-based line containing a byte offset.
    pub fn line_of(&self, offset: usize) -> BufferResult<usize> {
        self.check_offset(offset)?;
        Ok(self.rope.byte_to_line(offset))
    }

    /// Returns the byte offset where a line starts.
    pub fn line_start(&self, line: usize) -> BufferResult<usize> {
        if line >= self.len_lines() {
            return Err(BufferError::LineOutOfBounds(line));
        }
        Ok(self.rope.line_to_byte(line))
    }

    /// Returns a line's text, including its trailing newline if present.
    pub fn line(&self, line: usize) -> BufferResult<Cow<'_, str>> {
        if line >= self.len_lines() {
            return Err(BufferError::LineOutOfBounds(line));
        }
        Ok(self.rope.line(line).into())
    }

    /// Converts a byte offset to a line/column position.
    pub fn position(&self, offset: usize) -> BufferResult<Position> {
        let line = self.line_of(offset)?;
        let line_start_char = self.rope.line_to_char(line);
        let column = self.rope.byte_to_char(offset) - line_start_char;
        Ok(Position { line, column })
    }

    /// Converts a position back to a byte offset. A column past the end of
    /// the line lands on the line end.
    pub fn offset_at(&self, position: Position) -> BufferResult<usize> {
        let start = self.line_start(position.line)?;
        let line = self.line(position.line)?;
        let content = line.trim_end_matches(['\n', '\r']);
        let column = content
            .char_indices()
            .nth(position.column)
            .map_or(content.len(), |(i, _)| i);
        Ok(start + column)
    }

    /// Returns the byte range `[start, end)` of the line holding `offset`,
    /// excluding the newline.
    pub fn line_bounds(&self, offset: usize) -> BufferResult<(usize, usize)> {
        self.check_offset(offset)?;
        let start = self.text[..offset].rfind('\n').map_or(0, |i| i + 1);
        let end = self.text[offset..]
            .find('\n')
            .map_or(self.text.len(), |i| offset + i);
        Ok((start, end))
    }
}
