//! Per-module source metadata.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The recorded source files of one contributing module.
///
/// Entries are produced in module declaration order by the source catalog;
/// that order is the override priority order (last declared wins). `files`
/// stays live during a development session: the watch layer appends and
/// removes paths as the file system changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    /// Module name, unique across the declaration list
    pub name: String,

    /// Absolute base directory of the module's UI sources
    pub dirname: PathBuf,

    /// Relative paths ('/'-separated) of every recorded file
    pub files: Vec<String>,

    /// Optional import alias exposed to bundler-side resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_alias: Option<String>,

    /// Whether the base directory existed at scan time
    pub exists: bool,
}

impl SourceEntry {
    /// Absolute path of a recorded file.
    pub fn source_path(&self, rel: &str) -> PathBuf {
        self.dirname.join(rel)
    }

    /// Whether this entry records the given relative path.
    pub fn has_file(&self, rel: &str) -> bool {
        self.files.iter().any(|f| f == rel)
    }
}
