//! Entrypoint descriptors.
//!
//! An entrypoint is a named, independently bundled output unit. Its kind
//! selects the generation strategy for the entry file; generation dispatches
//! on the kind once per entrypoint rather than threading boolean flags
//! through one large function.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::manifest::FlattenedManifest;

/// The shape of an entrypoint's generated entry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntrypointKind {
    /// Public site bundle: one `<name>/index.js` + `<name>/index.scss` per
    /// module, auto-invoked.
    Index,
    /// Admin UI bundle: registered components, rich-text extensions, and
    /// auto-invoked apps.
    AdminUi,
    /// Explicitly listed extra sources only.
    Custom,
    /// Bundled by an external pipeline; no entry file is generated and the
    /// manifest flattener passes the descriptor through.
    Bundled,
}

impl EntrypointKind {
    /// Whether the entrypoint is bundled outside this build.
    pub fn is_bundled(&self) -> bool {
        matches!(self, EntrypointKind::Bundled)
    }
}

/// Kinds of bundler output an entrypoint produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Js,
    Css,
}

/// Extra source files declared directly on an entrypoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLists {
    pub js: Vec<PathBuf>,
    pub scss: Vec<PathBuf>,
}

impl SourceLists {
    pub fn is_empty(&self) -> bool {
        self.js.is_empty() && self.scss.is_empty()
    }
}

/// A configured entrypoint.
///
/// Read-only to the build core, except for `manifest`, which the flattener
/// populates after the bundler run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entrypoint {
    pub name: String,
    pub kind: EntrypointKind,
    #[serde(skip)]
    pub sources: SourceLists,
    #[serde(skip)]
    pub ignore: Vec<PathBuf>,
    #[serde(skip)]
    pub prologue: String,
    pub outputs: Vec<OutputKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<FlattenedManifest>,
}
