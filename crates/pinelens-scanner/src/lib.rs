//! # Pinelens Scanner
//!
//! Rebuilds a best-effort symbol table from raw Pine Script text.
//!
//! ## Why not use the token stream?
//!
//! The scanner runs on half-typed code. Pattern search over the raw text
//! still finds `var x =` when the line around it does not lex into anything
//! sensible, so the scanner does not depend on the lexer's output.
//!
//! ## Merge rules
//!
//! | entity | rule |
//! |---|---|
//! | variable | first pass, then first offset, wins |
//! | function / method | every declaration kept, source order |
//! | type | last declaration wins |
//!
//! ## Learning: catch_unwind
//!
//! `std::panic::catch_unwind` stops a panic at a function boundary and
//! returns it as an `Err`. Each pass runs inside one, so a bug in one
//! pattern empties one category instead of taking down the request.

mod annotations;
mod declarations;
mod patterns;
mod scanner;
mod symbols;
mod variables;

pub use scanner::{scan_document, ScanOptions, Scanner};
pub use symbols::{
    DocumentScanResult, FunctionSymbol, ParameterSymbol, ScanDiagnostic, VariableKind,
    VariableSymbol,
};

use pinelens_buffer::BufferError;

/// Result type for individual scan passes
pub type ScannerResult<T> = Result<T, ScanError>;

/// Errors a scan pass can hit. They never leave [`Scanner::scan`]; each one
/// becomes a [`ScanDiagnostic`].
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Pattern '{name}' failed to compile: {message}")]
    InvalidPattern { name: &'static str, message: String },

    #[error("Offset error: {0}")]
    Buffer(#[from] BufferError),
}
