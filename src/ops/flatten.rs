//! Implementation of `slipway manifest`.
//!
//! Reads the raw manifest the bundler wrote for the last build and reduces
//! it to the flattened, per-entrypoint form the asset-serving layer consumes.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::config::{ProjectConfig, DIST_DIR};
use crate::manifest::{flatten, load_manifest, FlattenOptions};

/// Default location of the bundler's manifest, relative to the bundler
/// output directory.
const BUNDLER_MANIFEST: &str = ".vite/manifest.json";

/// Name of the flattened output file, written into the build root.
const FLATTENED_MANIFEST: &str = "manifest.json";

/// Options for the manifest operation.
#[derive(Debug, Clone)]
pub struct FlattenManifestOptions {
    /// Project root containing Slipway.toml
    pub project_root: PathBuf,

    /// Explicit path to the bundler manifest; defaults to the bundler's
    /// standard location under the build root
    pub manifest_path: Option<PathBuf>,

    /// Whether a live development transport serves this build
    pub dev_server: bool,
}

/// Flatten the bundler manifest and write the consumer-facing file.
/// Returns the written path.
pub fn flatten_manifest(opts: &FlattenManifestOptions) -> Result<PathBuf> {
    let config = ProjectConfig::load(&opts.project_root)?;

    let manifest_path = opts
        .manifest_path
        .clone()
        .unwrap_or_else(|| config.dist_root().join(BUNDLER_MANIFEST));
    let raw = load_manifest(&manifest_path)?;
    tracing::info!(
        "flattening {} manifest nodes for {} entrypoints",
        raw.len(),
        config.entrypoints.len()
    );

    let mut entrypoints = config.entrypoints.clone();
    flatten(
        &mut entrypoints,
        &raw,
        &FlattenOptions {
            root: DIST_DIR.to_string(),
            dev_server: opts.dev_server,
        },
    );

    let unprocessed = entrypoints.iter().filter(|e| e.manifest.is_none()).count();
    if unprocessed > 0 {
        tracing::debug!("{unprocessed} entrypoints had no bundler output and pass through");
    }

    let output = config.build_root.join(FLATTENED_MANIFEST);
    let contents = serde_json::to_string_pretty(&entrypoints)
        .context("failed to serialize flattened manifest")?;
    crate::util::fs::write_string(&output, &contents)?;

    Ok(output)
}
