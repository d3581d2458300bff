//! # Pinelens Core
//!
//! Configuration and the service facade editor integrations talk to.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   LanguageService                     │
//! │  ┌──────────┐ ┌───────────┐ ┌──────────────────────┐  │
//! │  │  Config  │ │ Debouncer │ │ Completion/Signature │  │
//! │  └──────────┘ └───────────┘ └──────────────────────┘  │
//! │         │                            │                │
//! │  ┌──────┴─────┐  ┌─────────────┐  ┌──┴──────────┐     │
//! │  │   Lexer    │  │   Scanner   │  │   Catalog   │     │
//! │  └────────────┘  └─────────────┘  └─────────────┘     │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Module Organization
//!
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

pub mod config;
pub mod debounce;
pub mod service;

pub use config::{CompletionConfig, Config, ConfigError, DebounceConfig, ScannerConfig};
pub use debounce::Debouncer;
pub use service::LanguageService;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur below the service facade
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] pinelens_syntax::SyntaxError),

    #[error("Assist error: {0}")]
    Assist(#[from] pinelens_assist::AssistError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
