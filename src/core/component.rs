//! Resolved component references and logical-name derivation.

use std::path::PathBuf;

/// A single resolved (component, file) pair produced by the override
/// resolver.
///
/// `import_path` is relative to the build working tree and resolvable by the
/// bundler (`./<module>/<rel>`); `source_path` is the absolute path of the
/// original file, used for default-export validation and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    /// Bundler-resolvable path from within the working tree
    pub import_path: String,

    /// Absolute path of the originating source file
    pub source_path: PathBuf,

    /// Index of the originating source entry, in declaration order
    pub entry_index: usize,
}

/// Derive the logical component name from an import path.
///
/// The name is the extension-stripped base name with any non-identifier
/// character replaced by `_`. It is the dedup key for override resolution and
/// the local binding name in generated import code; `enumerate` appends a
/// positional disambiguator for call sites that concatenate same-named files.
pub fn component_name(import_path: &str, enumerate: Option<usize>) -> String {
    let base = import_path.rsplit('/').next().unwrap_or(import_path);
    let stem = match base.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => base,
    };

    let mut name = String::with_capacity(stem.len());
    for ch in stem.chars() {
        if ch.is_ascii_alphanumeric() {
            name.push(ch);
        } else {
            name.push('_');
        }
    }
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    match enumerate {
        Some(i) => format!("{}_{}", name, i),
        None => name,
    }
}
