//! Build/development session state.
//!
//! A session owns everything that used to be ambient during a build: the
//! validated config, the cataloged source entries, and the watch indices.
//! It is created at session start and dropped at session end; every
//! operation works through it rather than through module-level state.
//!
//! Event handlers run to completion, one event at a time, before the next is
//! processed; all index mutation goes through `&mut self`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::{entrypoint_output, write_entry_file};
use crate::core::config::ProjectConfig;
use crate::core::source_entry::SourceEntry;
use crate::sources::{compute_catalog, CatalogOptions};
use crate::util::fs::{copy_file, ensure_dir, relative_path, remove_file_if_exists, slash_path};
use crate::watch::WatchIndices;

/// One build or development session.
#[derive(Debug)]
pub struct Session {
    config: ProjectConfig,
    working_tree: PathBuf,
    entries: Vec<SourceEntry>,
    indices: WatchIndices,
}

impl Session {
    /// Create a session: catalog all module sources, mirror them into the
    /// working tree, and build the watch indices.
    pub fn create(config: ProjectConfig) -> Result<Self> {
        let working_tree = config.working_tree();
        ensure_dir(&working_tree)?;

        let entries = compute_catalog(
            &config.modules,
            &CatalogOptions {
                copy_to: Some(&working_tree),
            },
        )?;
        let indices = WatchIndices::build(&entries);

        Ok(Session {
            config,
            working_tree,
            entries,
            indices,
        })
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    pub fn indices(&self) -> &WatchIndices {
        &self.indices
    }

    pub fn working_tree(&self) -> &Path {
        &self.working_tree
    }

    /// Generate and write every entrypoint's entry file. Returns the written
    /// paths.
    pub fn generate_imports(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for entrypoint in &self.config.entrypoints {
            let Some(output) =
                entrypoint_output(entrypoint, &self.entries, &self.working_tree, None)?
            else {
                tracing::debug!("entrypoint `{}` is externally bundled, skipping", entrypoint.name);
                continue;
            };
            write_entry_file(&output)?;
            tracing::info!("generated entry file for `{}`", entrypoint.name);
            written.push(output.file);
        }
        Ok(written)
    }

    /// A file appeared under a watched tree.
    ///
    /// Ownership is resolved by longest-prefix match; files outside every
    /// tracked tree are ignored. After registration the change logic runs
    /// for the same path, so the new file is mirrored immediately.
    pub fn on_add(&mut self, path: &Path) {
        let Some(index) = self.indices.owning_entry(path) else {
            return;
        };
        let rel = slash_path(&relative_path(&self.entries[index].dirname, path));

        if !self.entries[index].has_file(&rel) {
            self.entries[index].files.push(rel.clone());
        }
        self.indices.track(path.to_path_buf(), rel.clone(), index);

        tracing::debug!("tracking {} (module `{}`)", rel, self.entries[index].name);
        self.sync_relative(&rel, false);
    }

    /// A tracked file changed.
    ///
    /// Every module layer declaring the same relative path is re-mirrored,
    /// shadowed lower-priority copies included. Override resolution happens
    /// at generated-import time, not at copy time: whichever layer later
    /// wins the dedup must already hold current content.
    pub fn on_change(&mut self, path: &Path, silent: bool) {
        let Some(index) = self.indices.entry_for_path(path) else {
            return;
        };
        let rel = slash_path(&relative_path(&self.entries[index].dirname, path));
        self.sync_relative(&rel, silent);
    }

    /// A tracked file was deleted.
    ///
    /// After deindexing, the change logic replays for the same relative path
    /// with errors suppressed: any remaining module still declaring it gets
    /// its working-tree copy refreshed, and "no remaining provider" is an
    /// expected terminal state, not a failure.
    pub fn on_unlink(&mut self, path: &Path) {
        let Some(index) = self.indices.entry_for_path(path) else {
            return;
        };
        let rel = slash_path(&relative_path(&self.entries[index].dirname, path));

        let mirrored = self
            .working_tree
            .join(&self.entries[index].name)
            .join(&rel);
        if let Err(e) = remove_file_if_exists(&mirrored) {
            tracing::warn!("failed to remove {}: {e:#}", mirrored.display());
        }

        self.entries[index].files.retain(|f| f != &rel);
        self.indices.untrack(path, &rel, index);

        tracing::debug!("untracked {} (module `{}`)", rel, self.entries[index].name);
        self.sync_relative(&rel, true);
    }

    /// Mirror `rel` for every entry declaring it.
    fn sync_relative(&self, rel: &str, silent: bool) {
        for index in self.indices.owners_of_rel(rel) {
            let entry = &self.entries[index];
            let src = entry.source_path(rel);
            let dst = self.working_tree.join(&entry.name).join(rel);
            if let Err(e) = copy_file(&src, &dst) {
                if !silent {
                    tracing::warn!("failed to sync {} for module `{}`: {e:#}", rel, entry.name);
                }
            }
        }
    }
}
