//! Line/column positions.
//!
//! ## Learning: Newtype Pattern
//!
//! `Position` wraps line/column coordinates instead of passing a bare
//! `(usize, usize)`, so line and column cannot be swapped by accident.

use serde::{Deserialize, Serialize};

/// A position in a document (line and column).
///
/// Both line and column are 0-indexed. The column counts characters, not
/// bytes, which is what an editor shows to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position at the start of the document.
    pub const ZERO: Position = Position { line: 0, column: 0 };
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            other => other,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display as 1-indexed for user-facing output
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        let a = Position::new(1, 4);
        let b = Position::new(2, 0);
        assert!(a < b);
        assert_eq!(a.max(b), b);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::ZERO.to_string(), "1:1");
        assert_eq!(Position::new(3, 7).to_string(), "4:8");
    }
}
