//! Editable buffer with a caret.
//!
//! Completion does not edit text itself; it describes an insertion and lets
//! the editor apply it. `TextBuffer` is the smallest editor model that can
//! apply such a description: a rope plus a caret.
//!
//! Offsets in this API are byte offsets, matching the lexer and scanner.

use ropey::Rope;

use crate::{BufferError, BufferResult};

/// A mutable text buffer with a single caret.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    /// The rope holding our text content
    rope: Rope,

    /// Caret as a byte offset
    caret: usize,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entire text content.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Returns the number of bytes in the buffer.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Returns the caret byte offset.
    #[inline]
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Moves the caret.
    pub fn set_caret(&mut self, offset: usize) -> BufferResult<()> {
        self.check_offset(offset)?;
        self.caret = offset;
        Ok(())
    }

    /// Returns the character starting at a byte offset, if any.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.len_bytes() {
            return None;
        }
        let char_idx = self.rope.try_byte_to_char(offset).ok()?;
        if self.rope.char_to_byte(char_idx) != offset {
            return None;
        }
        Some(self.rope.char(char_idx))
    }

    /// Inserts text at a byte offset.
    ///
    /// A caret at or after the insertion point moves right with the text.
    pub fn insert(&mut self, offset: usize, text: &str) -> BufferResult<()> {
        self.check_offset(offset)?;
        let char_idx = self.rope.byte_to_char(offset);
        self.rope.insert(char_idx, text);
        if self.caret >= offset {
            self.caret += text.len();
        }
        Ok(())
    }

    fn check_offset(&self, offset: usize) -> BufferResult<()> {
        let len = self.len_bytes();
        if offset > len {
            return Err(BufferError::OffsetOutOfBounds { offset, len });
        }
        let char_idx = self.rope.byte_to_char(offset);
        if self.rope.char_to_byte(char_idx) != offset {
            return Err(BufferError::NotCharBoundary(offset));
        }
        Ok(())
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
            caret: 0,
        }
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}
