//! Symbol records produced by one scan.

use serde::Serialize;
use std::collections::BTreeMap;

/// How a variable came to be known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariableKind {
    /// `var x = ...`, `varip x = ...`, `x := ...` or a line-start `x = ...`
    Declared,
    /// Seen as an operand or condition, never declared
    UsageInferred,
    /// A function or method parameter
    Parameter,
}

impl VariableKind {
    /// Returns the tag shown next to the variable in completion lists.
    pub fn tag(&self) -> &'static str {
        match self {
            VariableKind::Declared => "declared",
            VariableKind::UsageInferred => "usage-inferred",
            VariableKind::Parameter => "parameter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableSymbol {
    pub name: String,
    pub kind: VariableKind,
    /// 0-based line of the first occurrence
    pub line: usize,
}

impl VariableSymbol {
    pub fn new(name: impl Into<String>, kind: VariableKind, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSymbol {
    pub name: String,
    /// Default expression, verbatim and trimmed; empty when there is none
    pub default_value: String,
    /// 0-based line of the parameter name
    #[serde(skip)]
    pub line: usize,
}

impl ParameterSymbol {
    pub fn new(name: impl Into<String>, default_value: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            default_value: default_value.into(),
            line,
        }
    }

    /// `name` or `name = default`.
    pub fn label(&self) -> String {
        if self.default_value.is_empty() {
            self.name.clone()
        } else {
            format!("{} = {}", self.name, self.default_value)
        }
    }
}

/// A `function` or `method` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSymbol {
    pub name: String,
    pub parameters: Vec<ParameterSymbol>,
    pub line: usize,
}

impl FunctionSymbol {
    /// Renders the parameter list, e.g. `(a, b = 1)`.
    pub fn parameter_list(&self) -> String {
        let labels: Vec<String> = self.parameters.iter().map(ParameterSymbol::label).collect();
        format!("({})", labels.join(", "))
    }
}

/// A scan pass that failed; its category is empty for this scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanDiagnostic {
    pub pass: String,
    pub message: String,
}

/// Everything one scan learned about a document.
///
/// Never cached: each request scans the current text again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentScanResult {
    pub variables: Vec<VariableSymbol>,
    pub functions: Vec<FunctionSymbol>,
    pub methods: Vec<FunctionSymbol>,
    /// Type name to declaration line; the last declaration wins
    pub types: BTreeMap<String, usize>,
    /// Value of the first `//@version=N` annotation
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl DocumentScanResult {
    pub fn variable(&self, name: &str) -> Option<&VariableSymbol> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Finds the first function or method with this name, functions first.
    pub fn callable(&self, name: &str) -> Option<&FunctionSymbol> {
        self.functions
            .iter()
            .chain(self.methods.iter())
            .find(|f| f.name == name)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_list_rendering() {
        let function = FunctionSymbol {
            name: "add".into(),
            parameters: vec![ParameterSymbol::new("a", "", 0), ParameterSymbol::new("b", "1", 0)],
            line: 0,
        };
        assert_eq!(function.parameter_list(), "(a, b = 1)");
    }

    #[test]
    fn test_callable_prefers_functions() {
        let make = |line| FunctionSymbol {
            name: "f".into(),
            parameters: Vec::new(),
            line,
        };
        let result = DocumentScanResult {
            functions: vec![make(3)],
            methods: vec![make(1)],
            ..Default::default()
        };
        assert_eq!(result.callable("f").map(|f| f.line), Some(3));
        assert!(result.callable("g").is_none());
    }

    #[test]
    fn test_kind_serializes_as_tag() {
        let json = serde_json::to_string(&VariableKind::UsageInferred).unwrap();
        assert_eq!(json, format!("\"{}\"", VariableKind::UsageInferred.tag()));
    }
}
