//! What the text around the cursor says about the request.
//!
//! Everything here is a local, backward-looking heuristic over raw text.
//! None of it parses: a `.` after `)` is not a member access, a comma inside
//! a nested call still counts as an argument separator.

use pinelens_buffer::SourceText;
use pinelens_syntax::tables::{is_ident_char, is_ident_start};
use pinelens_syntax::{INITIAL_STATE, Lexer, TokenKind};

use crate::AssistResult;

/// A validated cursor position and the line it sits on.
#[derive(Debug, Clone, Copy)]
pub struct CursorContext<'a> {
    text: &'a str,
    offset: usize,
    line_start: usize,
    line_end: usize,
}

/// `namespace.` right before the cursor, possibly with a partial member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberAccess<'a> {
    pub namespace: &'a str,
    /// Byte offset of the `.`
    pub dot: usize,
}

/// The call the cursor is in, as far as a single line can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallUnit<'a> {
    /// Byte offset where the unit starts
    pub start: usize,
    /// Unit text up to the first `(`, trimmed
    pub name: &'a str,
    /// Commas between the unit start and the cursor
    pub active_index: usize,
}

impl<'a> CursorContext<'a> {
    /// Validates `offset` against `text`.
    pub fn new(text: &'a str, offset: usize) -> AssistResult<Self> {
        let (line_start, line_end) = SourceText::new(text).line_bounds(offset)?;
        Ok(Self {
            text,
            offset,
            line_start,
            line_end,
        })
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Text from the start of the line to the cursor.
    pub fn line_before_cursor(&self) -> &'a str {
        &self.text[self.line_start..self.offset]
    }

    /// The character just before the cursor.
    pub fn previous_char(&self) -> Option<char> {
        self.text[..self.offset].chars().next_back()
    }

    /// Looks for `ident .` behind the cursor.
    ///
    /// Walks back over identifier characters and whitespace to a `.`, then
    /// over whitespace to the identifier before it. Any other character stops
    /// the walk.
    pub fn member_access(&self) -> Option<MemberAccess<'a>> {
        let before = &self.text[..self.offset];
        let (dot, c) = before
            .char_indices()
            .rev()
            .find(|&(_, c)| !(is_ident_char(c) || c.is_whitespace()))?;
        if c != '.' {
            return None;
        }

        let head = before[..dot].trim_end();
        let start = head
            .char_indices()
            .rev()
            .take_while(|&(_, c)| is_ident_char(c))
            .last()
            .map(|(i, _)| i)?;
        let namespace = &head[start..];
        namespace
            .chars()
            .next()
            .filter(|&c| is_ident_start(c))
            .map(|_| MemberAccess { namespace, dot })
    }

    /// True when the cursor sits in a line comment or an open string.
    ///
    /// Re-lexes the current line from its start with the initial state; no
    /// earlier line can affect the answer.
    pub fn in_comment_or_string(&self) -> AssistResult<bool> {
        let last = Lexer::start(self.text, self.line_start..self.offset, INITIAL_STATE)?.last();
        Ok(match last {
            Some(token) if token.kind == TokenKind::LineComment => true,
            Some(token) if token.kind == TokenKind::String => !is_closed_string(token.text(self.text)),
            _ => false,
        })
    }

    /// Offset of the innermost unclosed `(` before the cursor that follows
    /// an identifier, searching the whole text.
    pub fn enclosing_call(&self) -> Option<usize> {
        let paren = innermost_open_paren(&self.text[..self.offset])?;
        let head = self.text[..paren].trim_end();
        head.chars()
            .next_back()
            .filter(|&c| is_ident_char(c))
            .map(|_| paren)
    }

    /// The call unit for parameter info, limited to the cursor's line.
    ///
    /// Starts at the name before the innermost unclosed `(`; without one the
    /// whole line is the unit.
    pub fn call_unit(&self) -> CallUnit<'a> {
        let line = self.line_before_cursor();
        let start = match innermost_open_paren(line) {
            Some(paren) => {
                let head = line[..paren].trim_end();
                let name_start = head
                    .char_indices()
                    .rev()
                    .take_while(|&(_, c)| is_ident_char(c) || c == '.')
                    .last()
                    .map_or(head.len(), |(i, _)| i);
                self.line_start + name_start
            }
            None => self.line_start,
        };

        let unit = &self.text[start..self.line_end];
        let name = unit.find('(').map_or(unit, |i| &unit[..i]).trim();
        let active_index = self.text[start..self.offset].matches(',').count();
        CallUnit {
            start,
            name,
            active_index,
        }
    }
}

fn innermost_open_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' if depth == 0 => return Some(i),
            '(' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// The lexer stops a string at its closing quote, so a closed literal ends
/// with its unescaped opening quote character.
fn is_closed_string(literal: &str) -> bool {
    let mut chars = literal.chars();
    let Some(quote) = chars.next() else {
        return false;
    };
    let mut escaped = false;
    for c in chars {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return true;
        }
    }
    false
}
