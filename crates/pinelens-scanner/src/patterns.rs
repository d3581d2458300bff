//! Regular expressions used by the scan passes.
//!
//! ## Learning: Fallible Lazy Statics
//!
//! Each pattern is compiled on first use and cached for the life of the
//! process. The cell stores the `Result` of compilation rather than
//! unwrapping it, so a bad pattern surfaces as a [`ScanError`] in the pass
//! that needs it instead of a panic in whichever thread touched it first.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{ScanError, ScannerResult};

/// A named, lazily compiled regular expression.
pub(crate) struct Pattern {
    name: &'static str,
    regex: Lazy<Result<Regex, regex::Error>>,
}

impl Pattern {
    pub(crate) fn get(&self) -> ScannerResult<&Regex> {
        Lazy::force(&self.regex)
            .as_ref()
            .map_err(|e| ScanError::InvalidPattern {
                name: self.name,
                message: e.to_string(),
            })
    }
}

macro_rules! pattern {
    ($(#[$meta:meta])* $ident:ident, $name:literal, $source:literal) => {
        $(#[$meta])*
        pub(crate) static $ident: Pattern = Pattern {
            name: $name,
            regex: Lazy::new(|| Regex::new($source)),
        };
    };
}

// Declared variables

pattern!(
    /// `var x =`, `varip x =`, with an optional type: `var float x =`
    VAR_DECLARATION,
    "var-declaration",
    r"\b(?:var|varip)\s+(?:[A-Za-z_][\w.]*(?:<[^>\n]*>)?\s+)?(\w+)\s*(?:=|:)"
);

pattern!(
    /// `x := ...`
    REASSIGNMENT,
    "reassignment",
    r"\b(\w+)\s*:="
);

pattern!(
    /// `x = ...` or `int x = ...` at the start of a line, not `==` or `=>`
    LINE_DECLARATION,
    "line-declaration",
    r"(?m)^[ \t]*(?:(?:const|simple|series)[ \t]+)?(?:[A-Za-z_][\w.]*(?:<[^>\n]*>)?[ \t]+)?(\w+)[ \t]*=(?:[^=>]|$)"
);

// Usage contexts

pattern!(
    /// Scrutinee of `if`, `elseif` and `while`
    CONDITION_OPERAND,
    "condition-operand",
    r"\b(?:if|elseif|while)\b\s*\(?\s*(\w+)"
);

pattern!(
    /// Right-hand side of a comparison or arithmetic operator
    RIGHT_OPERAND,
    "right-operand",
    r"(?:[=<>!]=|[<>]|[+\-*/%])\s*(\w+)\b"
);

pattern!(
    /// Left-hand side of a comparison or arithmetic operator
    LEFT_OPERAND,
    "left-operand",
    r"\b(\w+)\s*(?:[=<>!]=|[<>]|[+\-*/%])"
);

// Declarations

pattern!(
    FUNCTION_HEADER,
    "function-header",
    r"\bfunction\s+(\w+)\s*(\()[^)]*\)"
);

pattern!(
    METHOD_HEADER,
    "method-header",
    r"\bmethod\s+(\w+)\s*(\()[^)]*\)"
);

pattern!(
    /// `name(params) =>` at the start of a line, one level of nested parens allowed
    ARROW_HEADER,
    "arrow-header",
    r"(?m)^[ \t]*(?:export[ \t]+)?(\w+)[ \t]*(\()(?:[^()\n]|\([^()\n]*\))*\)[ \t]*=>"
);

pattern!(
    TYPE_DECLARATION,
    "type-declaration",
    r"\btype\s+(\w+)"
);

pattern!(
    VERSION_ANNOTATION,
    "version-annotation",
    r"//@version\s*=\s*(\d+)"
);

// Parameter lists

pattern!(
    /// `name = default` or `name: default`
    PARAMETER_WITH_DEFAULT,
    "parameter-with-default",
    r"\b(\w+)\s*(?:=|:)\s*([^,)]+)"
);

pattern!(
    /// A name followed by a comma, a closing paren or the end of the list
    BARE_PARAMETER,
    "bare-parameter",
    r"\b(\w+)\s*(?:,|\)|$)"
);

pattern!(
    /// One top-level entry of a balanced parameter list: qualifiers, name, default
    PARAMETER_ENTRY,
    "parameter-entry",
    r"(?s)^\s*(?:[\w.<>\[\]]+\s+)*(\w+)\s*(?:(?:=|:)\s*(.*?))?\s*$"
);

#[cfg(test)]
mod tests {
    use super::*;

    pattern!(BROKEN, "broken", r"(unclosed");

    fn captures<'t>(pattern: &Pattern, text: &'t str) -> Vec<&'t str> {
        pattern
            .get()
            .unwrap()
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        match BROKEN.get() {
            Err(ScanError::InvalidPattern { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_var_declaration_forms() {
        assert_eq!(captures(&VAR_DECLARATION, "var x = 1"), vec!["x"]);
        assert_eq!(captures(&VAR_DECLARATION, "varip count = 0"), vec!["count"]);
        assert_eq!(captures(&VAR_DECLARATION, "var float level = na"), vec!["level"]);
        assert_eq!(captures(&VAR_DECLARATION, "var array<float> xs = na"), vec!["xs"]);
    }

    #[test]
    fn test_line_declaration_ignores_comparisons() {
        assert_eq!(captures(&LINE_DECLARATION, "fast = ta.ema(close, 9)"), vec!["fast"]);
        assert_eq!(captures(&LINE_DECLARATION, "int length = 14"), vec!["length"]);
        assert!(captures(&LINE_DECLARATION, "a == b").is_empty());
        assert!(captures(&LINE_DECLARATION, "f(x) => x").is_empty());
        assert!(captures(&LINE_DECLARATION, "plot(x, linewidth = 2)").is_empty());
    }

    #[test]
    fn test_condition_operand() {
        assert_eq!(captures(&CONDITION_OPERAND, "if (bullish)"), vec!["bullish"]);
        assert_eq!(captures(&CONDITION_OPERAND, "while i"), vec!["i"]);
        assert!(captures(&CONDITION_OPERAND, "iffy = 1").is_empty());
    }

    #[test]
    fn test_arrow_header_allows_one_nesting_level() {
        let regex = ARROW_HEADER.get().unwrap();
        assert!(regex.is_match("f(x) => x * 2"));
        assert!(regex.is_match("export smooth(src, len = math.max(1, 2)) =>"));
        assert!(!regex.is_match("plot(f(x))"));
    }

    #[test]
    fn test_parameter_entry() {
        let regex = PARAMETER_ENTRY.get().unwrap();
        let caps = regex.captures(" simple int len = f(1, 2) ").unwrap();
        assert_eq!(&caps[1], "len");
        assert_eq!(&caps[2], "f(1, 2)");
        assert!(regex.captures("1 + 2").is_none());
    }
}
