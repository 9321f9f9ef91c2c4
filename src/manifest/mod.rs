//! Bundler manifest model.
//!
//! After a bundler run, the raw manifest is a graph of chunks keyed by an
//! opaque source id, referencing each other through static and dynamic import
//! edges. The graph is not guaranteed acyclic: co-dependent dynamically-split
//! chunks commonly reference each other. The flattener reduces it to plain
//! per-entrypoint file lists for the asset-serving layer.

mod flatten;

pub use flatten::{flatten, FlattenOptions};

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One chunk in the bundler's raw manifest. Read-only input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestNode {
    /// Output file produced for this chunk
    pub file: String,

    /// Entry name, set on entry chunks
    pub name: Option<String>,

    /// Original source id
    pub src: Option<String>,

    /// Whether this chunk is a configured entry point
    pub is_entry: bool,

    /// CSS files emitted for this chunk
    pub css: Vec<String>,

    /// Static assets referenced by this chunk
    pub assets: Vec<String>,

    /// Static import edges (manifest keys)
    pub imports: Vec<String>,

    /// Dynamic import edges (manifest keys)
    pub dynamic_imports: Vec<String>,
}

/// The raw manifest: chunks keyed by source id.
pub type RawManifest = HashMap<String, ManifestNode>;

/// Read and deserialize a bundler manifest file.
pub fn load_manifest(path: &Path) -> Result<RawManifest> {
    let contents = crate::util::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse bundler manifest: {}", path.display()))
}

/// Deduplicated output file lists for one entrypoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestFiles {
    pub js: Vec<String>,
    pub css: Vec<String>,
    pub assets: Vec<String>,
    pub imports: Vec<String>,
    pub dynamic_imports: Vec<String>,
}

/// The flattened, consumer-facing manifest of one entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedManifest {
    /// Build output directory name the file paths are relative to
    pub root: String,

    /// Per-kind output file lists
    pub files: ManifestFiles,

    /// Original source id of the entry chunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    /// Whether this entrypoint is currently served by the live development
    /// transport rather than from static files
    pub dev_server: bool,
}
