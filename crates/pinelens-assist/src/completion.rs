//! Ranked completion lists.
//!
//! ## Ranking
//!
//! Every suggestion carries a priority; the list is sorted by it, highest
//! first, with a stable sort so equal priorities keep the order they were
//! added in. Namespace members right after a `.` outrank everything;
//! keywords drop below everything else while the cursor is inside a call.
//!
//! ## Deduplication
//!
//! `(label, kind, tail)` identifies a suggestion. Overloads with different
//! parameter lists stay separate; a variable that is also a built-in name
//! shows up once per kind.

use pinelens_scanner::{DocumentScanResult, ScanOptions, Scanner};
use pinelens_syntax::tables::{BUILTIN_VARIABLES, KEYWORDS, NAMESPACES, TYPES};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::debug;

use crate::catalog::{FunctionCatalog, MemberKind};
use crate::context::CursorContext;
use crate::insertion::InsertBehavior;
use crate::AssistResult;

/// Suggestion priorities, higher first.
pub mod priority {
    pub const MEMBER: i32 = 1100;
    pub const KEYWORD: i32 = 1000;
    pub const KEYWORD_IN_CALL: i32 = 400;
    pub const DOCUMENT_VARIABLE: i32 = 950;
    pub const DOCUMENT_FUNCTION: i32 = 925;
    pub const NAMESPACE: i32 = 900;
    pub const BUILTIN_FUNCTION: i32 = 850;
    pub const CONSTANT: i32 = 800;
    pub const BUILTIN_VARIABLE: i32 = 750;
    pub const TYPE: i32 = 700;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Keyword,
    Namespace,
    Function,
    Method,
    Member,
    Constant,
    Variable,
    Type,
}

/// One entry of a completion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub label: String,
    pub kind: CompletionKind,
    /// Right-aligned hint: return type, namespace, or symbol origin
    pub type_text: String,
    /// Grey text after the label, usually a parameter list
    pub tail_text: String,
    pub insert: InsertBehavior,
    /// Owning namespace, for members only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub priority: i32,
}

impl Suggestion {
    fn new(label: impl Into<String>, kind: CompletionKind, type_text: impl Into<String>, priority: i32) -> Self {
        Self {
            label: label.into(),
            kind,
            type_text: type_text.into(),
            tail_text: String::new(),
            insert: InsertBehavior::None,
            namespace: None,
            priority,
        }
    }

    fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail_text = tail.into();
        self
    }

    fn with_insert(mut self, insert: InsertBehavior) -> Self {
        self.insert = insert;
        self
    }
}

/// Input for one completion request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub text: &'a str,
    /// Byte offset of the cursor
    pub offset: usize,
    /// Language tag of the document, e.g. `pine`
    pub language: &'a str,
}

/// Completion switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOptions {
    /// Characters that (re)open completion when typed
    pub trigger_characters: String,
    /// Language tags this assembler serves, compared case-insensitively
    pub language_ids: Vec<String>,
    pub suppress_in_comments_and_strings: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            trigger_characters: ".(,".to_string(),
            language_ids: vec!["pine".to_string(), "pinescript".to_string()],
            suppress_in_comments_and_strings: true,
        }
    }
}

/// Builds completion lists from the static tables, the built-in catalog and
/// a fresh scan of the document.
#[derive(Debug, Clone)]
pub struct CompletionAssembler {
    catalog: &'static FunctionCatalog,
    scanner: Scanner,
    options: CompletionOptions,
}

impl Default for CompletionAssembler {
    fn default() -> Self {
        Self::new(CompletionOptions::default(), ScanOptions::default())
    }
}

impl CompletionAssembler {
    pub fn new(options: CompletionOptions, scan_options: ScanOptions) -> Self {
        Self {
            catalog: FunctionCatalog::builtin(),
            scanner: Scanner::new(scan_options),
            options,
        }
    }

    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }

    pub fn accepts_language(&self, language: &str) -> bool {
        self.options
            .language_ids
            .iter()
            .any(|id| id.eq_ignore_ascii_case(language))
    }

    /// True when the character before `offset` is a trigger character.
    /// An invalid offset never triggers.
    pub fn should_trigger(&self, text: &str, offset: usize) -> bool {
        CursorContext::new(text, offset)
            .ok()
            .and_then(|ctx| ctx.previous_char())
            .is_some_and(|c| self.options.trigger_characters.contains(c))
    }

    /// Produces the ranked suggestion list for a cursor position.
    ///
    /// Returns an empty list for other languages and, if configured, inside
    /// comments and strings. Errors only for an invalid offset.
    pub fn complete(&self, request: &CompletionRequest<'_>) -> AssistResult<Vec<Suggestion>> {
        if !self.accepts_language(request.language) {
            debug!(language = request.language, "Completion skipped for language");
            return Ok(Vec::new());
        }

        let ctx = CursorContext::new(request.text, request.offset)?;
        if self.options.suppress_in_comments_and_strings && ctx.in_comment_or_string()? {
            debug!(offset = request.offset, "Completion suppressed in comment or string");
            return Ok(Vec::new());
        }

        let scan = self.scanner.scan(request.text);
        let mut list = SuggestionList::default();

        self.add_members(&ctx, &mut list);
        self.add_keywords(&ctx, &mut list);
        add_document_symbols(&scan, &mut list);
        self.add_builtins(&mut list);
        add_types(&scan, &mut list);

        let suggestions = list.into_sorted();
        debug!(
            offset = request.offset,
            count = suggestions.len(),
            "Assembled completion list"
        );
        Ok(suggestions)
    }

    fn add_members(&self, ctx: &CursorContext<'_>, list: &mut SuggestionList) {
        let Some(access) = ctx.member_access() else {
            return;
        };
        for member in self.catalog.members(access.namespace) {
            let mut suggestion =
                Suggestion::new(member.name, CompletionKind::Member, member.namespace, priority::MEMBER);
            suggestion.namespace = Some(member.namespace.to_string());
            if member.kind == MemberKind::Function {
                let tail = self
                    .catalog
                    .lookup(&member.qualified_name())
                    .and_then(|group| group.overloads.first())
                    .map(|signature| signature.parameter_list())
                    .unwrap_or_else(|| "()".to_string());
                suggestion = suggestion
                    .with_tail(tail)
                    .with_insert(InsertBehavior::CallParens);
            }
            list.push(suggestion);
        }
    }

    fn add_keywords(&self, ctx: &CursorContext<'_>, list: &mut SuggestionList) {
        let priority = if ctx.enclosing_call().is_some() {
            priority::KEYWORD_IN_CALL
        } else {
            priority::KEYWORD
        };
        for keyword in KEYWORDS {
            list.push(Suggestion::new(*keyword, CompletionKind::Keyword, "keyword", priority));
        }
    }

    fn add_builtins(&self, list: &mut SuggestionList) {
        for namespace in NAMESPACES {
            list.push(
                Suggestion::new(*namespace, CompletionKind::Namespace, "namespace", priority::NAMESPACE)
                    .with_insert(InsertBehavior::MemberAccess),
            );
        }
        for signature in self.catalog.signatures() {
            list.push(
                Suggestion::new(
                    signature.name,
                    CompletionKind::Function,
                    signature.return_type,
                    priority::BUILTIN_FUNCTION,
                )
                .with_tail(signature.parameter_list())
                .with_insert(InsertBehavior::CallParens),
            );
        }
        for constant in self.catalog.members_of_kind(MemberKind::Constant) {
            list.push(Suggestion::new(
                constant.qualified_name(),
                CompletionKind::Constant,
                "constant",
                priority::CONSTANT,
            ));
        }
        let variables = BUILTIN_VARIABLES.iter().map(|v| v.to_string()).chain(
            self.catalog
                .members_of_kind(MemberKind::Variable)
                .map(|m| m.qualified_name()),
        );
        for variable in variables {
            list.push(Suggestion::new(
                variable,
                CompletionKind::Variable,
                "built-in",
                priority::BUILTIN_VARIABLE,
            ));
        }
    }
}

fn add_document_symbols(scan: &DocumentScanResult, list: &mut SuggestionList) {
    for variable in &scan.variables {
        list.push(Suggestion::new(
            variable.name.as_str(),
            CompletionKind::Variable,
            variable.kind.tag(),
            priority::DOCUMENT_VARIABLE,
        ));
    }
    let callables = scan
        .functions
        .iter()
        .map(|f| (f, CompletionKind::Function, "function"))
        .chain(scan.methods.iter().map(|m| (m, CompletionKind::Method, "method")));
    for (function, kind, type_text) in callables {
        list.push(
            Suggestion::new(function.name.as_str(), kind, type_text, priority::DOCUMENT_FUNCTION)
                .with_tail(function.parameter_list())
                .with_insert(InsertBehavior::CallParens),
        );
    }
}

fn add_types(scan: &DocumentScanResult, list: &mut SuggestionList) {
    for name in TYPES.iter().copied().chain(scan.types.keys().map(String::as_str)) {
        list.push(Suggestion::new(name, CompletionKind::Type, "type", priority::TYPE));
    }
}

/// Insertion-ordered suggestions with duplicate suppression.
#[derive(Default)]
struct SuggestionList {
    items: Vec<Suggestion>,
    seen: HashSet<(String, CompletionKind, String)>,
}

impl SuggestionList {
    fn push(&mut self, suggestion: Suggestion) {
        let key = (
            suggestion.label.clone(),
            suggestion.kind,
            suggestion.tail_text.clone(),
        );
        if self.seen.insert(key) {
            self.items.push(suggestion);
        }
    }

    fn into_sorted(mut self) -> Vec<Suggestion> {
        self.items.sort_by_key(|s| Reverse(s.priority));
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(text: &str) -> Vec<Suggestion> {
        CompletionAssembler::default()
            .complete(&CompletionRequest {
                text,
                offset: text.len(),
                language: "pine",
            })
            .unwrap()
    }

    fn members(list: &[Suggestion]) -> Vec<(&str, &str)> {
        list.iter()
            .filter(|s| s.kind == CompletionKind::Member)
            .map(|s| (s.namespace.as_deref().unwrap_or(""), s.label.as_str()))
            .collect()
    }

    #[test]
    fn test_dot_completion_scoped_to_namespace() {
        let list = complete("ta.");
        let members = members(&list);
        for name in ["sma", "ema", "crossover"] {
            assert!(members.contains(&("ta", name)), "missing ta.{name}");
        }
        assert!(members.iter().all(|(ns, _)| *ns == "ta"));
        assert_eq!(list[0].kind, CompletionKind::Member);
    }

    #[test]
    fn test_member_functions_get_parens_and_signature() {
        let list = complete("x = math.");
        let max = list
            .iter()
            .find(|s| s.kind == CompletionKind::Member && s.label == "max")
            .unwrap();
        assert_eq!(max.tail_text, "(number0, number1, ...)");
        assert_eq!(max.type_text, "math");
        assert_eq!(max.insert, InsertBehavior::CallParens);

        let pi = list.iter().find(|s| s.label == "pi").unwrap();
        assert_eq!(pi.insert, InsertBehavior::None);
    }

    #[test]
    fn test_no_members_without_dot() {
        let list = complete("ta");
        assert!(members(&list).is_empty());
        assert!(list.iter().any(|s| s.label == "ta.sma" && s.kind == CompletionKind::Function));
    }

    #[test]
    fn test_static_entries_always_present() {
        let list = complete("");
        let has = |label: &str, kind| list.iter().any(|s| s.label == label && s.kind == kind);
        assert!(has("if", CompletionKind::Keyword));
        assert!(has("ta", CompletionKind::Namespace));
        assert!(has("close", CompletionKind::Variable));
        assert!(has("barstate.isconfirmed", CompletionKind::Variable));
        assert!(has("color.red", CompletionKind::Constant));
        assert!(has("float", CompletionKind::Type));
        assert!(has("plot", CompletionKind::Function));
    }

    #[test]
    fn test_overloads_are_all_offered() {
        let list = complete("");
        let inputs: Vec<_> = list
            .iter()
            .filter(|s| s.label == "input" && s.kind == CompletionKind::Function)
            .collect();
        assert_eq!(inputs.len(), 2);
    }

    #[test]
    fn test_ranking() {
        let list = complete("//@version=5\nvar length = 14\nfunction f(a) => a\n");
        let rank = |label: &str, kind| {
            list.iter()
                .position(|s| s.label == label && s.kind == kind)
                .unwrap()
        };
        assert!(rank("if", CompletionKind::Keyword) < rank("length", CompletionKind::Variable));
        assert!(rank("length", CompletionKind::Variable) < rank("f", CompletionKind::Function));
        assert!(rank("f", CompletionKind::Function) < rank("ta", CompletionKind::Namespace));
        assert!(rank("ta", CompletionKind::Namespace) < rank("ta.sma", CompletionKind::Function));
        assert!(rank("ta.sma", CompletionKind::Function) < rank("color.red", CompletionKind::Constant));
        assert!(rank("color.red", CompletionKind::Constant) < rank("close", CompletionKind::Variable));
        assert!(rank("close", CompletionKind::Variable) < rank("int", CompletionKind::Type));
        assert!(list.windows(2).all(|w| w[0].priority >= w[1].priority));
    }

    #[test]
    fn test_keywords_demoted_inside_call() {
        let list = complete("plot(");
        let keyword = list.iter().find(|s| s.label == "if").unwrap();
        assert_eq!(keyword.priority, priority::KEYWORD_IN_CALL);
        let first_keyword = list.iter().position(|s| s.kind == CompletionKind::Keyword).unwrap();
        let last_type = list.iter().rposition(|s| s.kind == CompletionKind::Type).unwrap();
        assert!(first_keyword > last_type);
    }

    #[test]
    fn test_document_symbols() {
        let text = "type Trade\nmethod close_all(Trade t) => t\nfunction add(a, b = 1) => a\n";
        let list = complete(text);
        let add = list.iter().find(|s| s.label == "add").unwrap();
        assert_eq!(add.kind, CompletionKind::Function);
        assert_eq!(add.tail_text, "(a, b = 1)");
        assert_eq!(add.insert, InsertBehavior::CallParens);

        let method = list.iter().find(|s| s.label == "close_all").unwrap();
        assert_eq!(method.kind, CompletionKind::Method);
        assert!(list.iter().any(|s| s.label == "Trade" && s.kind == CompletionKind::Type));
        let b = list.iter().find(|s| s.label == "b").unwrap();
        assert_eq!(b.type_text, "parameter");
    }

    #[test]
    fn test_namespaces_insert_dot() {
        let list = complete("");
        let ta = list.iter().find(|s| s.kind == CompletionKind::Namespace && s.label == "ta").unwrap();
        assert_eq!(ta.insert, InsertBehavior::MemberAccess);
    }

    #[test]
    fn test_no_duplicates() {
        let list = complete("var x = 1\nx := 2\nif x > 1\n    x := 3");
        let mut keys: Vec<_> = list
            .iter()
            .map(|s| (s.label.as_str(), s.kind, s.tail_text.as_str()))
            .collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
        assert_eq!(
            list.iter()
                .filter(|s| s.label == "x" && s.kind == CompletionKind::Variable)
                .count(),
            1
        );
    }

    #[test]
    fn test_suppressed_in_comments_and_strings() {
        assert!(complete("x = 1 // ta.").is_empty());
        assert!(complete("s = \"ta.").is_empty());

        let assembler = CompletionAssembler::new(
            CompletionOptions {
                suppress_in_comments_and_strings: false,
                ..Default::default()
            },
            ScanOptions::default(),
        );
        let text = "// ta.";
        let list = assembler
            .complete(&CompletionRequest {
                text,
                offset: text.len(),
                language: "pine",
            })
            .unwrap();
        assert!(!list.is_empty());
    }

    #[test]
    fn test_other_languages_get_nothing() {
        let assembler = CompletionAssembler::default();
        let request = CompletionRequest {
            text: "ta.",
            offset: 3,
            language: "python",
        };
        assert!(assembler.complete(&request).unwrap().is_empty());
        assert!(assembler.accepts_language("PineScript"));
    }

    #[test]
    fn test_should_trigger() {
        let assembler = CompletionAssembler::default();
        assert!(assembler.should_trigger("ta.", 3));
        assert!(assembler.should_trigger("plot(", 5));
        assert!(assembler.should_trigger("f(a,", 4));
        assert!(!assembler.should_trigger("plot", 4));
        assert!(!assembler.should_trigger("", 0));
        assert!(!assembler.should_trigger("ta.", 10));
    }

    #[test]
    fn test_invalid_offset_is_an_error() {
        let result = CompletionAssembler::default().complete(&CompletionRequest {
            text: "abc",
            offset: 7,
            language: "pine",
        });
        assert!(result.is_err());
    }
}
