//! Side-effects of accepting a suggestion.
//!
//! After the editor inserts a suggestion's label, the caret sits at the end
//! of it (the "tail"). A function suggestion then wants `()` with the caret
//! between the parens, a namespace wants a `.`. If that character is already
//! at the tail, nothing is inserted and the caret just steps over it, so
//! accepting twice at the same spot never doubles the parens.

use pinelens_buffer::{SourceText, TextBuffer};
use serde::Serialize;

use crate::AssistResult;

/// What to do after a suggestion's text has been inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertBehavior {
    #[default]
    None,
    /// Add `()` and put the caret inside
    CallParens,
    /// Add `.` and put the caret after it
    MemberAccess,
}

/// A planned edit: insert `text` at `offset`, then move the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsertionEdit {
    pub offset: usize,
    /// Empty when the needed character is already there
    pub text: &'static str,
    pub caret: usize,
}

impl InsertionEdit {
    pub fn is_noop(&self) -> bool {
        self.text.is_empty() && self.caret == self.offset
    }

    /// Applies the edit to a buffer.
    pub fn apply(&self, buffer: &mut TextBuffer) -> AssistResult<()> {
        if !self.text.is_empty() {
            buffer.insert(self.offset, self.text)?;
        }
        buffer.set_caret(self.caret)?;
        Ok(())
    }
}

impl InsertBehavior {
    /// Plans the edit for a suggestion whose text ends at `tail`.
    pub fn plan(self, text: &str, tail: usize) -> AssistResult<InsertionEdit> {
        SourceText::new(text).check_offset(tail)?;
        Ok(self.edit_for(text[tail..].chars().next(), tail))
    }

    /// Plans and applies the edit at the buffer's caret.
    pub fn apply(self, buffer: &mut TextBuffer) -> AssistResult<()> {
        let tail = buffer.caret();
        self.edit_for(buffer.char_at(tail), tail).apply(buffer)
    }

    fn edit_for(self, next: Option<char>, tail: usize) -> InsertionEdit {
        let (wanted, insert) = match self {
            InsertBehavior::None => {
                return InsertionEdit {
                    offset: tail,
                    text: "",
                    caret: tail,
                };
            }
            InsertBehavior::CallParens => ('(', "()"),
            InsertBehavior::MemberAccess => ('.', "."),
        };
        InsertionEdit {
            offset: tail,
            text: if next == Some(wanted) { "" } else { insert },
            caret: tail + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_at_end(text: &str) -> TextBuffer {
        let mut buffer = TextBuffer::from(text);
        buffer.set_caret(text.len()).unwrap();
        buffer
    }

    #[test]
    fn test_call_parens_inserted() {
        let mut buffer = buffer_at_end("x = ta.sma");
        InsertBehavior::CallParens.apply(&mut buffer).unwrap();
        assert_eq!(buffer.text(), "x = ta.sma()");
        assert_eq!(buffer.caret(), 11);
    }

    #[test]
    fn test_existing_paren_is_reused() {
        let mut buffer = TextBuffer::from("plot(close)");
        buffer.set_caret(4).unwrap();
        InsertBehavior::CallParens.apply(&mut buffer).unwrap();
        assert_eq!(buffer.text(), "plot(close)");
        assert_eq!(buffer.caret(), 5);
    }

    #[test]
    fn test_repeated_acceptance_is_idempotent() {
        let mut buffer = buffer_at_end("plot");
        InsertBehavior::CallParens.apply(&mut buffer).unwrap();
        buffer.set_caret(4).unwrap();
        InsertBehavior::CallParens.apply(&mut buffer).unwrap();
        assert_eq!(buffer.text(), "plot()");
        assert_eq!(buffer.caret(), 5);
    }

    #[test]
    fn test_member_access() {
        let edit = InsertBehavior::MemberAccess.plan("ta", 2).unwrap();
        assert_eq!(
            edit,
            InsertionEdit {
                offset: 2,
                text: ".",
                caret: 3
            }
        );
        let edit = InsertBehavior::MemberAccess.plan("ta.sma", 2).unwrap();
        assert_eq!(edit.text, "");
        assert_eq!(edit.caret, 3);
    }

    #[test]
    fn test_none_is_noop() {
        let edit = InsertBehavior::None.plan("close", 5).unwrap();
        assert!(edit.is_noop());
        let mut buffer = buffer_at_end("close");
        InsertBehavior::None.apply(&mut buffer).unwrap();
        assert_eq!(buffer.text(), "close");
    }

    #[test]
    fn test_plan_rejects_bad_tail() {
        assert!(InsertBehavior::CallParens.plan("abc", 4).is_err());
    }
}
