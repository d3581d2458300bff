//! Variable passes.
//!
//! Three independent passes each produce candidates in source order;
//! [`merge_first_wins`] combines them so the earliest pass, and within a pass
//! the earliest offset, owns a name.

use pinelens_buffer::SourceText;
use pinelens_syntax::tables::{is_namespace, is_reserved, is_type};
use regex::Regex;
use std::collections::HashSet;

use crate::patterns::{
    CONDITION_OPERAND, LEFT_OPERAND, LINE_DECLARATION, Pattern, REASSIGNMENT, RIGHT_OPERAND,
    VAR_DECLARATION,
};
use crate::symbols::{FunctionSymbol, VariableKind, VariableSymbol};
use crate::ScannerResult;

/// Pass A: explicit declarations and reassignments.
///
/// A bare `name =` only counts at the start of a line that is not inside an
/// open `(` or `[`, so keyword arguments of a call split over several lines
/// are not taken for declarations.
pub fn declared(source: &SourceText<'_>) -> ScannerResult<Vec<VariableSymbol>> {
    let text = source.as_str();
    let continued = continuation_line_starts(text);
    let mut found = candidates(&[&VAR_DECLARATION, &REASSIGNMENT], text)?;
    found.extend(
        first_captures(LINE_DECLARATION.get()?, text).filter(|&(offset, _)| {
            let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
            !continued.contains(&line_start)
        }),
    );
    into_symbols(source, found, VariableKind::Declared, is_reserved)
}

/// Pass B: names that appear as conditions or operands.
///
/// Over-inclusive on purpose; a numeric literal next to an operator is
/// captured too. Built-in namespace and type names are skipped, they are
/// already offered under their own kinds.
pub fn usage_inferred(source: &SourceText<'_>) -> ScannerResult<Vec<VariableSymbol>> {
    let found = candidates(
        &[&CONDITION_OPERAND, &RIGHT_OPERAND, &LEFT_OPERAND],
        source.as_str(),
    )?;
    into_symbols(source, found, VariableKind::UsageInferred, |word| {
        is_reserved(word) || is_namespace(word) || is_type(word)
    })
}

/// Pass C: parameters of every function, then every method.
pub fn parameters(functions: &[FunctionSymbol], methods: &[FunctionSymbol]) -> Vec<VariableSymbol> {
    functions
        .iter()
        .chain(methods)
        .flat_map(|f| &f.parameters)
        .filter(|p| !is_reserved(&p.name))
        .map(|p| VariableSymbol::new(p.name.clone(), VariableKind::Parameter, p.line))
        .collect()
}

/// Concatenates passes in order, keeping the first symbol seen for each name.
pub fn merge_first_wins<I>(passes: I) -> Vec<VariableSymbol>
where
    I: IntoIterator<Item = Vec<VariableSymbol>>,
{
    let mut seen = HashSet::new();
    passes
        .into_iter()
        .flatten()
        .filter(|v| seen.insert(v.name.clone()))
        .collect()
}

/// All first-group captures of several patterns.
fn candidates<'t>(patterns: &[&Pattern], text: &'t str) -> ScannerResult<Vec<(usize, &'t str)>> {
    let mut found = Vec::new();
    for pattern in patterns {
        found.extend(first_captures(pattern.get()?, text));
    }
    Ok(found)
}

/// Turns captures into symbols in offset order, one per name.
fn into_symbols(
    source: &SourceText<'_>,
    mut candidates: Vec<(usize, &str)>,
    kind: VariableKind,
    skip: fn(&str) -> bool,
) -> ScannerResult<Vec<VariableSymbol>> {
    candidates.sort_by_key(|&(offset, _)| offset);

    let mut seen = HashSet::new();
    let mut symbols = Vec::new();
    for (offset, name) in candidates {
        if skip(name) || !seen.insert(name) {
            continue;
        }
        symbols.push(VariableSymbol::new(name, kind, source.line_of(offset)?));
    }
    Ok(symbols)
}

/// Byte offsets of line starts that fall inside an unclosed `(` or `[`.
///
/// Brackets inside strings and `//` comments are ignored. A string never
/// continues past the end of its line.
fn continuation_line_starts(text: &str) -> HashSet<usize> {
    let mut starts = HashSet::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (_, '\n') => {
                quote = None;
                if depth > 0 {
                    starts.insert(i + 1);
                }
            }
            (Some(_), '\\') => {
                chars.next_if(|&(_, next)| next != '\n');
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '/') if chars.peek().is_some_and(|&(_, next)| next == '/') => {
                while chars.next_if(|&(_, next)| next != '\n').is_some() {}
            }
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    starts
}

fn first_captures<'t>(regex: &Regex, text: &'t str) -> impl Iterator<Item = (usize, &'t str)> {
    regex
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str()))
}
