//! Scan orchestration.
//!
//! A scan is an ordered pipeline of pure passes over the same text. Every
//! pass runs behind [`guarded`], so an error or a panic in one pass leaves
//! its category empty, adds a [`ScanDiagnostic`] and lets the rest finish.

use pinelens_buffer::SourceText;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, warn};

use crate::symbols::{DocumentScanResult, ScanDiagnostic};
use crate::{annotations, declarations, variables, ScannerResult};

/// Scanner behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Find the end of a parameter list by matching parentheses instead of
    /// stopping at the next `)`.
    pub balanced_parameter_lists: bool,
}

/// Stateless declaration scanner.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Scans the whole text. Never fails; see [`DocumentScanResult::diagnostics`].
    pub fn scan(&self, text: &str) -> DocumentScanResult {
        let source = SourceText::new(text);
        let balanced = self.options.balanced_parameter_lists;
        let mut diagnostics = Vec::new();

        let functions = guarded("functions", &mut diagnostics, || {
            declarations::functions(&source, balanced)
        })
        .unwrap_or_default();
        let methods = guarded("methods", &mut diagnostics, || {
            declarations::methods(&source, balanced)
        })
        .unwrap_or_default();

        let declared = guarded("declared-variables", &mut diagnostics, || {
            variables::declared(&source)
        })
        .unwrap_or_default();
        let used = guarded("usage-variables", &mut diagnostics, || {
            variables::usage_inferred(&source)
        })
        .unwrap_or_default();
        let parameters = variables::parameters(&functions, &methods);
        let variables = variables::merge_first_wins([declared, used, parameters]);

        let types = guarded("types", &mut diagnostics, || annotations::types(&source))
            .unwrap_or_default();
        let version = guarded("version", &mut diagnostics, || annotations::version(&source))
            .flatten();

        debug!(
            variables = variables.len(),
            functions = functions.len(),
            methods = methods.len(),
            types = types.len(),
            failed_passes = diagnostics.len(),
            "Scanned document"
        );

        DocumentScanResult {
            variables,
            functions,
            methods,
            types,
            version,
            diagnostics,
        }
    }
}

/// Scans with default options.
pub fn scan_document(text: &str) -> DocumentScanResult {
    Scanner::default().scan(text)
}

/// Runs one pass, turning an error or a panic into a diagnostic.
pub(crate) fn guarded<T>(
    pass: &str,
    diagnostics: &mut Vec<ScanDiagnostic>,
    run: impl FnOnce() -> ScannerResult<T>,
) -> Option<T> {
    let message = match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(value)) => return Some(value),
        Ok(Err(err)) => {
            warn!(pass, error = %err, "Scan pass failed");
            err.to_string()
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(pass, panic = %message, "Scan pass panicked");
            format!("panicked: {message}")
        }
    };
    diagnostics.push(ScanDiagnostic {
        pass: pass.to_string(),
        message,
    });
    None
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
