//! # Pinelens Buffer
//!
//! Text storage shared by the analysis crates.
//!
//! ## Two views of the same text
//!
//! - [`SourceText`] is an immutable, rope-backed snapshot of a document. The
//!   lexer and scanner work on plain `&str` byte offsets; `SourceText` turns
//!   those offsets into line numbers and positions for navigation.
//! - [`TextBuffer`] is a small editable buffer with a caret. It exists so the
//!   insertion side-effects produced by completion can be applied and tested
//!   the same way an editor would apply them.
//!
//! ## Learning: Byte Offsets vs Characters
//!
//! Rust strings are UTF-8. Slicing `&text[a..b]` panics if `a` or `b` is not
//! on a character boundary, so every offset that comes from outside is
//! validated here before it is used.

mod buffer;
mod position;
mod source;

pub use buffer::TextBuffer;
pub use position::Position;
pub use source::SourceText;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Byte offset {offset} is past the end of the text (length {len})")]
    OffsetOutOfBounds { offset: usize, len: usize },

    #[error("Byte offset {0} is not on a UTF-8 character boundary")]
    NotCharBoundary(usize),

    #[error("Line {0} is out of bounds")]
    LineOutOfBounds(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_and_buffer_agree_on_lines() {
        let text = "//@version=5\nvar x = 1\nplot(x)";
        let source = SourceText::new(text);
        let buffer = TextBuffer::from(text);

        assert_eq!(source.len_lines(), 3);
        assert_eq!(buffer.text(), text);
        assert_eq!(source.line_of(text.find("plot").unwrap()).unwrap(), 2);
    }

    #[test]
    fn test_error_messages() {
        let err = BufferError::OffsetOutOfBounds { offset: 10, len: 3 };
        assert_eq!(
            err.to_string(),
            "Byte offset 10 is past the end of the text (length 3)"
        );
    }
}
