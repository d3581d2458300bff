//! Static word tables for Pine Script.
//!
//! These are plain data. The slices keep a stable order for completion
//! lists; the sets behind the `is_*` functions are built once on first use
//! and only read afterwards, so no synchronization is needed beyond the
//! one-time initialization `Lazy` already performs.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Reserved words and literal keywords.
pub const KEYWORDS: &[&str] = &[
    "if", "else", "for", "to", "by", "while", "var", "varip", "import", "export", "switch",
    "case", "default", "continue", "break", "return", "type", "enum", "function", "method",
    "and", "or", "not", "series", "simple", "const", "when", "true", "false", "na",
];

/// Prefixes of dotted built-in members (`ta.sma`, `math.abs`, ...).
pub const NAMESPACES: &[&str] = &[
    "ta", "math", "array", "matrix", "map", "str", "color", "chart", "strategy", "syminfo",
    "request", "ticker", "barstate", "timeframe", "input", "label", "line", "box", "table",
    "runtime", "log",
];

/// Built-in type names.
pub const TYPES: &[&str] = &[
    "int", "float", "bool", "string", "color", "label", "line", "box", "table", "array",
    "matrix", "map", "linefill", "polyline",
];

/// Built-in series variables offered by completion.
pub const BUILTIN_VARIABLES: &[&str] = &[
    "open", "high", "low", "close", "volume", "time", "bar_index", "last_bar_index", "hl2",
    "hlc3", "ohlc4", "hlcc4", "timenow",
];

/// Words the declaration scanner never records as variables, on top of
/// [`KEYWORDS`]. These are script-level declarations and input builders
/// that look like identifiers in assignment position.
const SCANNER_RESERVED: &[&str] = &["elseif", "strategy", "indicator", "library", "input"];

static KEYWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| KEYWORDS.iter().copied().collect());
static NAMESPACE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NAMESPACES.iter().copied().collect());
static TYPE_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| TYPES.iter().copied().collect());
static RESERVED_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    KEYWORDS
        .iter()
        .chain(SCANNER_RESERVED.iter())
        .copied()
        .collect()
});

pub fn is_keyword(word: &str) -> bool {
    KEYWORD_SET.contains(word)
}

pub fn is_namespace(word: &str) -> bool {
    NAMESPACE_SET.contains(word)
}

pub fn is_type(word: &str) -> bool {
    TYPE_SET.contains(word)
}

/// Returns true for words the scanner must not treat as user symbols.
pub fn is_reserved(word: &str) -> bool {
    RESERVED_SET.contains(word)
}

/// Characters that may start an identifier.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Characters that may continue an identifier.
#[inline]
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Characters that form operator runs.
#[inline]
pub fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '=' | '!' | '<' | '>' | '&' | '|' | '^' | '~' | '?' | ':'
            | '.'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_words() {
        // `color` is both a namespace and a type; callers decide precedence.
        assert!(is_namespace("color"));
        assert!(is_type("color"));
        assert!(!is_keyword("color"));
    }

    #[test]
    fn test_reserved_includes_keywords() {
        for word in KEYWORDS {
            assert!(is_reserved(word), "{word} should be reserved");
        }
        assert!(is_reserved("elseif"));
        assert!(is_reserved("indicator"));
        assert!(!is_reserved("close"));
    }

    #[test]
    fn test_identifier_chars() {
        assert!(is_ident_start('_'));
        assert!(is_ident_start('é'));
        assert!(!is_ident_start('1'));
        assert!(is_ident_char('1'));
        assert!(!is_ident_char('€'));
    }

    #[test]
    fn test_operator_chars() {
        assert!(is_operator_char('-'));
        assert!(is_operator_char('.'));
        assert!(!is_operator_char(','));
        assert!(!is_operator_char('#'));
    }
}
