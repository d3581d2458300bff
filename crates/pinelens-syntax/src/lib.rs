//! # Pinelens Syntax
//!
//! Lexical analysis for Pine Script: a hand-written token classifier plus
//! the static word tables the rest of the workspace shares.
//!
//! ## Why not a parser generator?
//!
//! Highlighting runs on every keystroke over arbitrary, half-typed text. A
//! single-pass state machine has properties a grammar-driven parser cannot
//! promise cheaply:
//! - **Total**: every byte lands in exactly one token, even inside garbage
//! - **Restartable**: lexing can begin at any line start with no context
//! - **Predictable**: one character of lookahead, no backtracking
//!
//! ## Learning: Lazy Statics
//!
//! The keyword and namespace sets are built on first use with
//! `once_cell::sync::Lazy`. After that they are read-only, so they can be
//! shared between threads without a lock.

mod lexer;
pub mod tables;
mod token;

pub use lexer::{classify_identifier, tokenize, tokenize_range, Lexer, LexerState, INITIAL_STATE};
pub use token::{Token, TokenKind};

/// Result type for syntax operations
pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Errors that can occur when starting the lexer.
///
/// Lexing itself never fails; only an invalid starting range is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Invalid lex range {start}..{end} for text of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("Byte offset {0} is not on a UTF-8 character boundary")]
    NotCharBoundary(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_script() {
        let text = "//@version=5\nindicator(\"Demo\")\nplot(ta.sma(close, 14))\n";
        let tokens = tokenize(text);

        let significant: Vec<_> = tokens
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .collect();

        assert_eq!(significant[0], TokenKind::Function); // indicator
        assert!(significant.contains(&TokenKind::Namespace));
        assert!(significant.contains(&TokenKind::String));
        assert_eq!(tokens[0].kind, TokenKind::LineComment);
    }

    #[test]
    fn test_error_display() {
        let err = SyntaxError::InvalidRange {
            start: 4,
            end: 2,
            len: 10,
        };
        assert_eq!(
            err.to_string(),
            "Invalid lex range 4..2 for text of length 10"
        );
    }
}
