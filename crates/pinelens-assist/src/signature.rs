//! Parameter hints for the call around the cursor.
//!
//! The call name comes from [`CursorContext::call_unit`]; the catalog is
//! consulted first, then the functions and methods declared in the document.

use pinelens_scanner::{FunctionSymbol, ScanOptions, Scanner};
use serde::Serialize;
use tracing::debug;

use crate::catalog::{BuiltinFunctionSignature, FunctionCatalog};
use crate::context::CursorContext;
use crate::AssistResult;

/// One signature rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureInfo {
    /// Parameter labels joined with `, `
    pub label: String,
    pub parameter_labels: Vec<String>,
    /// Byte range of the active parameter inside `label`
    pub highlight: Option<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl SignatureInfo {
    fn new(parameter_labels: Vec<String>, active_index: usize) -> Self {
        let label = parameter_labels.join(", ");
        let highlight = parameter_labels.get(active_index).map(|active| {
            let start: usize = parameter_labels[..active_index]
                .iter()
                .map(|p| p.len() + 2)
                .sum();
            (start, start + active.len())
        });
        Self {
            label,
            parameter_labels,
            highlight,
            return_type: None,
            documentation: None,
        }
    }

    fn from_builtin(signature: &BuiltinFunctionSignature, active_index: usize) -> Self {
        let labels = signature.parameters.iter().map(|p| p.to_string()).collect();
        Self {
            return_type: Some(signature.return_type.to_string()),
            documentation: Some(signature.documentation.to_string()),
            ..Self::new(labels, active_index)
        }
    }

    fn from_declaration(function: &FunctionSymbol, active_index: usize) -> Self {
        let labels = function.parameters.iter().map(|p| p.label()).collect();
        Self {
            documentation: Some(format!("Declared on line {}", function.line + 1)),
            ..Self::new(labels, active_index)
        }
    }

    /// The active parameter's text, if the index is in range.
    pub fn active_parameter(&self) -> Option<&str> {
        self.highlight.map(|(start, end)| &self.label[start..end])
    }
}

/// Everything the hint bubble needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterInfo {
    pub function: String,
    pub active_index: usize,
    /// All overloads, in declaration order
    pub signatures: Vec<SignatureInfo>,
}

impl ParameterInfo {
    /// Labels of the first signature.
    pub fn parameter_labels(&self) -> &[String] {
        self.signatures
            .first()
            .map(|s| s.parameter_labels.as_slice())
            .unwrap_or(&[])
    }
}

/// Finds the call around a cursor and renders its signatures.
#[derive(Debug, Clone)]
pub struct ParameterInfoResolver {
    catalog: &'static FunctionCatalog,
    scanner: Scanner,
}

impl Default for ParameterInfoResolver {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}

impl ParameterInfoResolver {
    pub fn new(scan_options: ScanOptions) -> Self {
        Self {
            catalog: FunctionCatalog::builtin(),
            scanner: Scanner::new(scan_options),
        }
    }

    /// Resolves parameter info at `offset`. `Ok(None)` when the name is not
    /// a known built-in or a function declared in `text`.
    pub fn resolve(&self, text: &str, offset: usize) -> AssistResult<Option<ParameterInfo>> {
        let unit = CursorContext::new(text, offset)?.call_unit();
        if unit.name.is_empty() {
            return Ok(None);
        }

        let signatures: Vec<SignatureInfo> = match self.catalog.lookup(unit.name) {
            Some(group) => group
                .overloads
                .iter()
                .map(|s| SignatureInfo::from_builtin(s, unit.active_index))
                .collect(),
            None => {
                let scan = self.scanner.scan(text);
                scan.functions
                    .iter()
                    .chain(&scan.methods)
                    .filter(|f| f.name == unit.name)
                    .map(|f| SignatureInfo::from_declaration(f, unit.active_index))
                    .collect()
            }
        };

        if signatures.is_empty() {
            debug!(name = unit.name, "No signature for call");
            return Ok(None);
        }
        Ok(Some(ParameterInfo {
            function: unit.name.to_string(),
            active_index: unit.active_index,
            signatures,
        }))
    }
}
