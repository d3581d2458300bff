//! The outermost entry point.
//!
//! Every operation here returns a plain value. Errors from the layers below
//! are logged and turn into an empty answer, so an editor integration never
//! has to handle a failure to show nothing.

use pinelens_assist::{
    CompletionAssembler, CompletionRequest, InsertBehavior, InsertionEdit, ParameterInfo,
    ParameterInfoResolver, Suggestion,
};
use pinelens_scanner::{DocumentScanResult, Scanner};
use pinelens_syntax::Token;
use std::ops::Range;
use tracing::{debug, warn};

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::CoreResult;

/// Lexing, scanning, completion and parameter info behind one value.
#[derive(Debug, Clone)]
pub struct LanguageService {
    scanner: Scanner,
    assembler: CompletionAssembler,
    resolver: ParameterInfoResolver,
    debouncer: Debouncer,
}

impl Default for LanguageService {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl LanguageService {
    pub fn new(config: &Config) -> Self {
        let scan_options = config.scan_options();
        Self {
            scanner: Scanner::new(scan_options),
            assembler: CompletionAssembler::new(config.completion_options(), scan_options),
            resolver: ParameterInfoResolver::new(scan_options),
            debouncer: Debouncer::new(config.debounce_window()),
        }
    }

    /// Tokens covering the whole text.
    pub fn lex(&self, text: &str) -> Vec<Token> {
        pinelens_syntax::tokenize(text)
    }

    /// Tokens covering `range`; empty for an invalid range.
    pub fn lex_range(&self, text: &str, range: Range<usize>) -> Vec<Token> {
        logged("lex", pinelens_syntax::tokenize_range(text, range).map_err(Into::into))
            .unwrap_or_default()
    }

    pub fn scan(&self, text: &str) -> DocumentScanResult {
        self.scanner.scan(text)
    }

    /// Ranked completion list; empty on an invalid offset.
    pub fn complete(&self, text: &str, offset: usize, language: &str) -> Vec<Suggestion> {
        let request = CompletionRequest {
            text,
            offset,
            language,
        };
        logged("complete", self.assembler.complete(&request).map_err(Into::into))
            .unwrap_or_default()
    }

    /// Like [`complete`](Self::complete), but only the newest of a burst of
    /// calls produces a list. Superseded calls resolve to `None`.
    pub async fn complete_debounced(
        &self,
        text: &str,
        offset: usize,
        language: &str,
    ) -> Option<Vec<Suggestion>> {
        self.debouncer
            .submit(|| self.complete(text, offset, language))
            .await
    }

    pub fn signature(&self, text: &str, offset: usize) -> Option<ParameterInfo> {
        logged("signature", self.resolver.resolve(text, offset).map_err(Into::into)).flatten()
    }

    pub fn should_trigger(&self, text: &str, offset: usize) -> bool {
        self.assembler.should_trigger(text, offset)
    }

    /// Plans the follow-up edit after a suggestion's text ends at `tail`.
    pub fn accept(&self, text: &str, tail: usize, behavior: InsertBehavior) -> Option<InsertionEdit> {
        logged("accept", behavior.plan(text, tail).map_err(Into::into))
    }
}

fn logged<T>(operation: &str, result: CoreResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(operation, "Request failed: {}", e);
            debug!(operation, "Returning an empty result");
            None
        }
    }
}
