//! # Pinelens Assist
//!
//! Completion lists and parameter hints for Pine Script.
//!
//! ## Inputs
//!
//! Every request is a `(text, offset)` pair. Nothing is cached between
//! requests; the document is rescanned each time, which keeps results in
//! step with whatever the user just typed.
//!
//! ## Where suggestions come from
//!
//! - the static tables in `pinelens-syntax` (keywords, namespaces, types)
//! - the built-in [`FunctionCatalog`]
//! - the current document, through `pinelens-scanner`
//!
//! ## Learning: Lazy statics
//!
//! `once_cell::sync::Lazy` builds a value on first use and hands out a
//! `&'static` reference afterwards. The catalog's name index is built that
//! way, so every assembler shares one copy.

mod catalog;
mod completion;
mod context;
mod insertion;
mod signature;

pub use catalog::{
    BuiltinFunctionSignature, FunctionCatalog, MemberKind, NamespaceMember, OverloadGroup,
};
pub use completion::{
    priority, CompletionAssembler, CompletionKind, CompletionOptions, CompletionRequest,
    Suggestion,
};
pub use context::{CallUnit, CursorContext, MemberAccess};
pub use insertion::{InsertBehavior, InsertionEdit};
pub use signature::{ParameterInfo, ParameterInfoResolver, SignatureInfo};

use pinelens_buffer::BufferError;
use pinelens_syntax::SyntaxError;

/// Result type for assist operations
pub type AssistResult<T> = Result<T, AssistError>;

/// Errors a completion or parameter-info request can return.
#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error("Invalid cursor: {0}")]
    Buffer(#[from] BufferError),

    #[error("Lexing failed: {0}")]
    Syntax(#[from] SyntaxError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinelens_buffer::TextBuffer;

    #[test]
    fn test_complete_then_accept() {
        let text = "x = ta.sm";
        let assembler = CompletionAssembler::default();
        let request = CompletionRequest {
            text,
            offset: text.len(),
            language: "pine",
        };
        let suggestions = assembler.complete(&request).unwrap();
        let sma = suggestions.iter().find(|s| s.label == "sma").unwrap();
        assert_eq!(sma.kind, CompletionKind::Member);

        let mut buffer = TextBuffer::from(text);
        buffer.insert(text.len(), "a").unwrap();
        buffer.set_caret(text.len() + 1).unwrap();
        sma.insert.apply(&mut buffer).unwrap();
        assert_eq!(buffer.text(), "x = ta.sma()");

        let info = ParameterInfoResolver::default()
            .resolve(&buffer.text(), buffer.caret())
            .unwrap()
            .unwrap();
        assert_eq!(info.function, "ta.sma");
        assert_eq!(info.signatures[0].active_parameter(), Some("source"));
    }

    #[test]
    fn test_error_messages() {
        let err: AssistError = BufferError::NotCharBoundary(1).into();
        assert!(err.to_string().starts_with("Invalid cursor"));

        let err: AssistError = SyntaxError::NotCharBoundary(1).into();
        assert!(err.to_string().starts_with("Lexing failed"));
    }
}
