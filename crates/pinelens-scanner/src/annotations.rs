//! Type declarations and the `//@version` annotation.

use pinelens_buffer::SourceText;
use std::collections::BTreeMap;

use crate::patterns::{TYPE_DECLARATION, VERSION_ANNOTATION};
use crate::ScannerResult;

/// Every `type Name` in the text; a later declaration of the same name
/// replaces the earlier line.
pub fn types(source: &SourceText<'_>) -> ScannerResult<BTreeMap<String, usize>> {
    let mut types = BTreeMap::new();
    for caps in TYPE_DECLARATION.get()?.captures_iter(source.as_str()) {
        if let Some(name) = caps.get(1) {
            types.insert(name.as_str().to_string(), source.line_of(name.start())?);
        }
    }
    Ok(types)
}

/// The first `//@version=N` value, if any.
///
/// A number too large for `u32` counts as no version.
pub fn version(source: &SourceText<'_>) -> ScannerResult<Option<u32>> {
    Ok(VERSION_ANNOTATION
        .get()?
        .captures(source.as_str())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok()))
}
