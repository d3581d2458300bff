//! Token types produced by the lexer.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Classification of a span of source text.
///
/// ## Learning: Enum Variants
///
/// The highlighting collaborator maps each kind to a display style with a
/// single `match`; the compiler checks that every kind is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// A run of whitespace, newlines included
    Whitespace,
    /// `//` up to, not including, the end of the line
    LineComment,
    /// Single- or double-quoted string, possibly unterminated
    String,
    /// Digits and dots, e.g. `14`, `0.5`, `1.2.3`
    Number,
    /// Hex color literal, `#RRGGBB` or `#RRGGBBAA`
    Color,
    Keyword,
    Namespace,
    Type,
    /// Identifier immediately followed by `(`
    Function,
    Identifier,
    /// Maximal run of operator characters
    Operator,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    /// Anything the lexer does not recognize
    BadCharacter,
}

impl TokenKind {
    /// Returns a stable name for this kind, used as a style key.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::LineComment => "comment",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Color => "color",
            TokenKind::Keyword => "keyword",
            TokenKind::Namespace => "namespace",
            TokenKind::Type => "type",
            TokenKind::Function => "function",
            TokenKind::Identifier => "identifier",
            TokenKind::Operator => "operator",
            TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::Comma => "punctuation",
            TokenKind::BadCharacter => "bad_character",
        }
    }

    /// Whitespace and comments.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::LineComment)
    }

    /// Returns the punctuation kind for a single character, if any.
    pub fn punctuation(c: char) -> Option<TokenKind> {
        match c {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            ',' => Some(TokenKind::Comma),
            _ => None,
        }
    }
}

/// A classified span of source text.
///
/// `start`/`end` are byte offsets into the buffer the token came from
/// (half-open). Tokens do not own text; use [`Token::text`] with the same
/// buffer to read it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `offset` lies inside the token.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns the token's text from the buffer it was lexed from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }
}
