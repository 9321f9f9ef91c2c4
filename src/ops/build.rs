//! Implementation of `slipway build`.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::{ProjectConfig, Session};

/// Options for the build operation.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Project root containing Slipway.toml
    pub project_root: PathBuf,
}

/// Summary of a completed build.
#[derive(Debug)]
pub struct BuildReport {
    /// Generated entry files, one per bundled entrypoint
    pub entry_files: Vec<PathBuf>,

    /// Number of cataloged modules
    pub modules: usize,

    /// The build working tree the bundler should read
    pub working_tree: PathBuf,
}

/// Run a full build: catalog and mirror module sources, then generate every
/// entry file. Fatal errors unwind before anything is reported complete.
pub fn build(opts: &BuildOptions) -> Result<BuildReport> {
    let config = ProjectConfig::load(&opts.project_root)?;
    tracing::info!(
        "cataloging {} modules into {}",
        config.modules.len(),
        config.working_tree().display()
    );

    let session = Session::create(config)?;
    let entry_files = session.generate_imports()?;

    Ok(BuildReport {
        modules: session.entries().len(),
        working_tree: session.working_tree().to_path_buf(),
        entry_files,
    })
}
