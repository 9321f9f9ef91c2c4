//! Watch indices.
//!
//! Four in-memory lookup structures mapping file-system paths back to the
//! owning source entries, kept live for the duration of one development
//! session. The session layer mutates them on every add/change/unlink event;
//! they are never persisted.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::core::source_entry::SourceEntry;

/// The four path indices of a development session.
#[derive(Debug, Default)]
pub struct WatchIndices {
    /// Module base directory -> entry index
    by_dir: HashMap<PathBuf, usize>,

    /// Absolute file path -> entry index
    by_path: HashMap<PathBuf, usize>,

    /// Relative path -> every entry index declaring it. Under override
    /// layering a relative path commonly has several owners.
    by_rel: HashMap<String, BTreeSet<usize>>,

    /// Import alias -> entry index
    by_alias: HashMap<String, usize>,
}

impl WatchIndices {
    /// Build the indices from freshly cataloged entries.
    pub fn build(entries: &[SourceEntry]) -> Self {
        let mut indices = WatchIndices::default();

        for (index, entry) in entries.iter().enumerate() {
            indices.by_dir.insert(entry.dirname.clone(), index);
            if let Some(alias) = &entry.import_alias {
                indices.by_alias.insert(alias.clone(), index);
            }
            for rel in &entry.files {
                indices.by_path.insert(entry.source_path(rel), index);
                indices.by_rel.entry(rel.clone()).or_default().insert(index);
            }
        }

        indices
    }

    /// Resolve the entry owning `path` by longest-prefix match against the
    /// directory index. Longest wins: a module's base directory may itself be
    /// nested under another module's.
    pub fn owning_entry(&self, path: &Path) -> Option<usize> {
        self.by_dir
            .iter()
            .filter(|(dir, _)| path.starts_with(dir))
            .max_by_key(|(dir, _)| dir.components().count())
            .map(|(_, index)| *index)
    }

    /// Resolve a tracked absolute path to its entry index.
    pub fn entry_for_path(&self, path: &Path) -> Option<usize> {
        self.by_path.get(path).copied()
    }

    /// Every entry declaring `rel`, in ascending declaration order.
    pub fn owners_of_rel(&self, rel: &str) -> Vec<usize> {
        self.by_rel
            .get(rel)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Resolve an alias-prefixed import specifier (`<alias>/<rel>`) to the
    /// aliased entry and the relative path.
    pub fn resolve_alias(&self, spec: &str) -> Option<(usize, String)> {
        let (alias, rel) = spec.split_once('/')?;
        self.by_alias.get(alias).map(|&index| (index, rel.to_string()))
    }

    /// Register a newly observed file.
    pub fn track(&mut self, path: PathBuf, rel: String, index: usize) {
        self.by_path.insert(path, index);
        self.by_rel.entry(rel).or_default().insert(index);
    }

    /// Remove a deleted file. The relative-path owner set is dropped
    /// entirely once its last owner is gone.
    pub fn untrack(&mut self, path: &Path, rel: &str, index: usize) {
        self.by_path.remove(path);
        if let Some(owners) = self.by_rel.get_mut(rel) {
            owners.remove(&index);
            if owners.is_empty() {
                self.by_rel.remove(rel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, dirname: &str, files: &[&str], alias: Option<&str>) -> SourceEntry {
        SourceEntry {
            name: name.to_string(),
            dirname: PathBuf::from(dirname),
            files: files.iter().map(|f| f.to_string()).collect(),
            import_alias: alias.map(str::to_string),
            exists: true,
        }
    }

    fn indices() -> WatchIndices {
        WatchIndices::build(&[
            entry("core-ui", "/m/core-ui/ui", &["site/index.js"], Some("CoreUi")),
            entry("blog", "/m/blog/ui", &["site/index.js", "admin/apps/Posts.js"], None),
            entry("nested", "/m/blog/ui/vendor", &["site/extra.js"], None),
        ])
    }

    #[test]
    fn test_longest_prefix_wins() {
        let idx = indices();

        assert_eq!(
            idx.owning_entry(Path::new("/m/blog/ui/site/new.js")),
            Some(1)
        );
        // Nested module directory shadows its parent for its own files.
        assert_eq!(
            idx.owning_entry(Path::new("/m/blog/ui/vendor/site/extra.js")),
            Some(2)
        );
        assert_eq!(idx.owning_entry(Path::new("/elsewhere/x.js")), None);
    }

    #[test]
    fn test_relative_path_has_multiple_owners() {
        let idx = indices();

        assert_eq!(idx.owners_of_rel("site/index.js"), vec![0, 1]);
        assert_eq!(idx.owners_of_rel("admin/apps/Posts.js"), vec![1]);
    }

    #[test]
    fn test_track_and_untrack() {
        let mut idx = indices();
        let path = PathBuf::from("/m/blog/ui/site/new.js");

        idx.track(path.clone(), "site/new.js".to_string(), 1);
        assert_eq!(idx.entry_for_path(&path), Some(1));
        assert_eq!(idx.owners_of_rel("site/new.js"), vec![1]);

        idx.untrack(&path, "site/new.js", 1);
        assert_eq!(idx.entry_for_path(&path), None);
        assert!(idx.owners_of_rel("site/new.js").is_empty());
    }

    #[test]
    fn test_untrack_keeps_remaining_owners() {
        let mut idx = indices();
        let path = PathBuf::from("/m/blog/ui/site/index.js");

        idx.untrack(&path, "site/index.js", 1);

        assert_eq!(idx.owners_of_rel("site/index.js"), vec![0]);
    }

    #[test]
    fn test_resolve_alias() {
        let idx = indices();

        assert_eq!(
            idx.resolve_alias("CoreUi/site/index.js"),
            Some((0, "site/index.js".to_string()))
        );
        assert_eq!(idx.resolve_alias("Unknown/site/index.js"), None);
    }
}
