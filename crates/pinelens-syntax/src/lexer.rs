//! Single-pass token classifier.
//!
//! ## How it works
//!
//! The lexer looks at one character, decides which kind of token it starts
//! and consumes the rest of that token. Checks run in priority order:
//!
//! 1. whitespace run
//! 2. `//` line comment (the newline is left for the next token)
//! 3. string literal, `"..."` or `'...'`, backslash escapes the next character
//! 4. number: a digit followed by digits and dots (`1.2.3` is one token)
//! 5. identifier, then keyword / namespace / type / function / identifier
//! 6. `#RRGGBB` / `#RRGGBBAA` color literal
//! 7. operator run
//! 8. single-character punctuation
//! 9. anything else is a `BadCharacter` token
//!
//! Every byte of the requested range lands in exactly one token, and lexing
//! never fails: an unterminated string simply runs to the end of the range.
//!
//! ## Learning: Iterators
//!
//! `Lexer` implements `Iterator<Item = Token>`, so callers get laziness for
//! free: `lexer.take_while(..)`, `lexer.find(..)` and `collect()` all work
//! without the lexer knowing about them.

use std::iter::FusedIterator;
use std::ops::Range;

use crate::tables::{is_ident_char, is_ident_start, is_keyword, is_namespace, is_operator_char, is_type};
use crate::token::{Token, TokenKind};
use crate::{SyntaxError, SyntaxResult};

/// Lexer state carried across restarts.
///
/// Pine Script needs no cross-token context (there are no block comments),
/// so the only state is [`INITIAL_STATE`].
pub type LexerState = u32;

/// The one and only lexer state.
pub const INITIAL_STATE: LexerState = 0;

/// A restartable, forward-only token stream over a byte range of a buffer.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    end: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over the whole buffer.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            end: text.len(),
        }
    }

    /// Starts lexing `range` of `text` from `state`.
    ///
    /// The range must lie within the buffer and on character boundaries.
    pub fn start(text: &'a str, range: Range<usize>, state: LexerState) -> SyntaxResult<Self> {
        check_range(text, &range)?;
        if state != INITIAL_STATE {
            tracing::trace!(state, "lexer started with a non-initial state, treating as initial");
        }
        Ok(Self {
            text,
            pos: range.start,
            end: range.end,
        })
    }

    /// Restarts at `offset`, keeping the current end of range.
    pub fn restart(&mut self, offset: usize, state: LexerState) -> SyntaxResult<()> {
        check_range(self.text, &(offset..self.end))?;
        if state != INITIAL_STATE {
            tracing::trace!(state, "lexer restarted with a non-initial state, treating as initial");
        }
        self.pos = offset;
        Ok(())
    }

    /// Returns the state to store for a later restart at [`Lexer::offset`].
    #[inline]
    pub fn state(&self) -> LexerState {
        INITIAL_STATE
    }

    /// Byte offset where the next token starts.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Byte offset where lexing stops.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the buffer being lexed.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..self.end]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn lex_string(&mut self, quote: char) {
        let mut escaped = false;
        while let Some(c) = self.bump() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                break;
            }
        }
    }

    fn lex_operator_run(&mut self) {
        while let Some(c) = self.peek() {
            if !is_operator_char(c) || (c == '/' && self.peek_second() == Some('/')) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Called with the `#` already consumed.
    fn lex_color(&mut self) -> TokenKind {
        let digits = self
            .rest()
            .chars()
            .take_while(char::is_ascii_hexdigit)
            .count();
        if digits == 6 || digits == 8 {
            // hex digits are ASCII, one byte each
            self.pos += digits;
            TokenKind::Color
        } else {
            TokenKind::BadCharacter
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let start = self.pos;
        let c = self.bump()?;

        let kind = match c {
            c if c.is_whitespace() => {
                self.eat_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            '/' if self.peek() == Some('/') => {
                self.eat_while(|c| c != '\n');
                TokenKind::LineComment
            }
            '"' | '\'' => {
                self.lex_string(c);
                TokenKind::String
            }
            c if c.is_ascii_digit() => {
                self.eat_while(|c| c.is_ascii_digit() || c == '.');
                TokenKind::Number
            }
            c if is_ident_start(c) => {
                self.eat_while(is_ident_char);
                classify_identifier(&self.text[start..self.pos], self.peek())
            }
            '#' => self.lex_color(),
            c if is_operator_char(c) => {
                self.lex_operator_run();
                TokenKind::Operator
            }
            c => TokenKind::punctuation(c).unwrap_or(TokenKind::BadCharacter),
        };

        Some(Token::new(kind, start, self.pos))
    }
}

impl FusedIterator for Lexer<'_> {}

/// Classifies an identifier from its text and the character right after it.
///
/// This is purely lexical: a user variable named `math` is still a
/// namespace, and `foo (` is an identifier because the `(` does not follow
/// immediately.
pub fn classify_identifier(word: &str, next: Option<char>) -> TokenKind {
    if is_keyword(word) {
        TokenKind::Keyword
    } else if is_namespace(word) {
        TokenKind::Namespace
    } else if is_type(word) {
        TokenKind::Type
    } else if next == Some('(') {
        TokenKind::Function
    } else {
        TokenKind::Identifier
    }
}

/// Lexes a whole buffer.
pub fn tokenize(text: &str) -> Vec<Token> {
    Lexer::new(text).collect()
}

/// Lexes a byte range of a buffer.
pub fn tokenize_range(text: &str, range: Range<usize>) -> SyntaxResult<Vec<Token>> {
    Ok(Lexer::start(text, range, INITIAL_STATE)?.collect())
}

fn check_range(text: &str, range: &Range<usize>) -> SyntaxResult<()> {
    if range.start > range.end || range.end > text.len() {
        return Err(SyntaxError::InvalidRange {
            start: range.start,
            end: range.end,
            len: text.len(),
        });
    }
    for offset in [range.start, range.end] {
        if !text.is_char_boundary(offset) {
            return Err(SyntaxError::NotCharBoundary(offset));
        }
    }
    Ok(())
}
