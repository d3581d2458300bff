//! Function and method headers and their parameter lists.
//!
//! ## Parameter list boundary
//!
//! By default the list runs from the `(` after the name to the next `)`, so
//! `function f(x = g(1), y)` yields only `x` with default `g(1`. The
//! balanced mode tracks nesting and quotes instead and splits the list at
//! top-level commas.

use pinelens_buffer::SourceText;
use pinelens_syntax::tables::is_reserved;
use std::ops::Range;

use crate::patterns::{
    ARROW_HEADER, BARE_PARAMETER, FUNCTION_HEADER, METHOD_HEADER, PARAMETER_ENTRY,
    PARAMETER_WITH_DEFAULT, Pattern,
};
use crate::symbols::{FunctionSymbol, ParameterSymbol};
use crate::ScannerResult;

/// `function name(...)` headers plus line-start `name(...) =>` definitions,
/// in source order. Same-named declarations are all kept.
pub fn functions(source: &SourceText<'_>, balanced: bool) -> ScannerResult<Vec<FunctionSymbol>> {
    let mut found = headers(source, &FUNCTION_HEADER, balanced)?;
    found.extend(headers(source, &ARROW_HEADER, balanced)?);
    found.sort_by_key(|&(offset, _)| offset);
    Ok(found.into_iter().map(|(_, f)| f).collect())
}

/// `method name(...)` headers in source order.
pub fn methods(source: &SourceText<'_>, balanced: bool) -> ScannerResult<Vec<FunctionSymbol>> {
    Ok(headers(source, &METHOD_HEADER, balanced)?
        .into_iter()
        .map(|(_, f)| f)
        .collect())
}

fn headers(
    source: &SourceText<'_>,
    pattern: &Pattern,
    balanced: bool,
) -> ScannerResult<Vec<(usize, FunctionSymbol)>> {
    let text = source.as_str();
    let mut found = Vec::new();
    for caps in pattern.get()?.captures_iter(text) {
        let (Some(name), Some(open)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if is_reserved(name.as_str()) {
            continue;
        }
        let span = parameter_span(text, open.end(), balanced);
        let parameters = if balanced {
            balanced_parameters(source, span)?
        } else {
            parameters(source, span)?
        };
        found.push((
            name.start(),
            FunctionSymbol {
                name: name.as_str().to_string(),
                parameters,
                line: source.line_of(name.start())?,
            },
        ));
    }
    Ok(found)
}

/// Byte range of a parameter list whose `(` ends at `start`.
///
/// Without a closing paren the list runs to the end of the text.
pub fn parameter_span(text: &str, start: usize, balanced: bool) -> Range<usize> {
    let rest = &text[start..];
    let end = if balanced {
        matching_paren(rest)
    } else {
        rest.find(')')
    };
    start..end.map_or(text.len(), |i| start + i)
}

fn matching_paren(list: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in list.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// Two passes over the list: `name = default` pairs, then bare names not
/// already seen and not inside a default. Returned in source order.
fn parameters(source: &SourceText<'_>, span: Range<usize>) -> ScannerResult<Vec<ParameterSymbol>> {
    let list = &source.as_str()[span.clone()];
    let mut found: Vec<(usize, &str, &str)> = Vec::new();
    let mut defaults: Vec<Range<usize>> = Vec::new();

    for caps in PARAMETER_WITH_DEFAULT.get()?.captures_iter(list) {
        let (Some(name), Some(default)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        defaults.push(default.range());
        found.push((name.start(), name.as_str(), default.as_str().trim()));
    }

    for caps in BARE_PARAMETER.get()?.captures_iter(list) {
        let Some(name) = caps.get(1) else {
            continue;
        };
        let inside_default = defaults.iter().any(|r| r.contains(&name.start()));
        let already_seen = found.iter().any(|&(_, n, _)| n == name.as_str());
        if !inside_default && !already_seen {
            found.push((name.start(), name.as_str(), ""));
        }
    }

    found.sort_by_key(|&(offset, ..)| offset);
    found
        .into_iter()
        .map(|(offset, name, default)| {
            Ok(ParameterSymbol::new(name, default, source.line_of(span.start + offset)?))
        })
        .collect()
}

fn balanced_parameters(
    source: &SourceText<'_>,
    span: Range<usize>,
) -> ScannerResult<Vec<ParameterSymbol>> {
    let text = source.as_str();
    let entry = PARAMETER_ENTRY.get()?;
    let mut found = Vec::new();
    for range in top_level_entries(&text[span.clone()]) {
        let piece = &text[span.start + range.start..span.start + range.end];
        let Some(caps) = entry.captures(piece) else {
            continue;
        };
        let Some(name) = caps.get(1) else {
            continue;
        };
        let default = caps.get(2).map_or("", |m| m.as_str().trim());
        let offset = span.start + range.start + name.start();
        found.push(ParameterSymbol::new(name.as_str(), default, source.line_of(offset)?));
    }
    Ok(found)
}

/// Splits a list at commas outside brackets and string literals.
fn top_level_entries(list: &str) -> Vec<Range<usize>> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(start..i);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(start..list.len());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(function: &FunctionSymbol) -> Vec<(&str, &str)> {
        function
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.default_value.as_str()))
            .collect()
    }

    #[test]
    fn test_function_parameters_in_source_order() {
        let source = SourceText::new("function add(a, b = 1) => a + b");
        let found = functions(&source, false).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "add");
        assert_eq!(pairs(&found[0]), vec![("a", ""), ("b", "1")]);
    }

    #[test]
    fn test_typed_parameters() {
        let source = SourceText::new("function band(float src, int len = 20, mult = 2.0)");
        let found = functions(&source, false).unwrap();
        assert_eq!(
            pairs(&found[0]),
            vec![("src", ""), ("len", "20"), ("mult", "2.0")]
        );
    }

    #[test]
    fn test_next_paren_truncates_nested_default() {
        let source = SourceText::new("function f(x = g(1), y)");
        let found = functions(&source, false).unwrap();
        assert_eq!(pairs(&found[0]), vec![("x", "g(1")]);
    }

    #[test]
    fn test_balanced_mode_handles_nested_default() {
        let source = SourceText::new("function f(x = g(1, 2), s = \"a)\", y)");
        let found = functions(&source, true).unwrap();
        assert_eq!(
            pairs(&found[0]),
            vec![("x", "g(1, 2)"), ("s", "\"a)\""), ("y", "")]
        );
    }

    #[test]
    fn test_duplicate_functions_are_kept() {
        let source = SourceText::new("function f(a)\nfunction f(b)\n");
        let found = functions(&source, false).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].line, 1);
    }

    #[test]
    fn test_arrow_definitions_merge_in_source_order() {
        let text = "smooth(src, len) =>\n    ta.sma(src, len)\nfunction g()\n";
        let source = SourceText::new(text);
        let found = functions(&source, false).unwrap();
        let names: Vec<_> = found.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["smooth", "g"]);
        assert!(found[1].parameters.is_empty());
    }

    #[test]
    fn test_methods() {
        let source = SourceText::new("x = 1\nmethod scale(Point this, float k = 2) => this");
        let found = methods(&source, false).unwrap();
        assert_eq!(found[0].name, "scale");
        assert_eq!(found[0].line, 1);
        assert_eq!(pairs(&found[0]), vec![("this", ""), ("k", "2")]);
    }

    #[test]
    fn test_parameter_lines_follow_names() {
        let text = "function f(\n    a,\n    b = 1)";
        let source = SourceText::new(text);
        let found = functions(&source, false).unwrap();
        let lines: Vec<_> = found[0].parameters.iter().map(|p| p.line).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_parameter_span_without_close() {
        assert_eq!(parameter_span("f(a, b", 2, false), 2..6);
        assert_eq!(parameter_span("f(a(b), c)", 2, true), 2..9);
        assert_eq!(parameter_span("f(a(b), c)", 2, false), 2..5);
    }
}
