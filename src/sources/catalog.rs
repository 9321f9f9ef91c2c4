//! Source catalog computation.
//!
//! Scans every contributing module for UI source files and, in copy mode,
//! mirrors them into the build working tree the bundler reads. Module
//! declaration order is preserved: it is the override priority order
//! consumed by the resolver.

use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::core::config::ModuleDecl;
use crate::core::source_entry::SourceEntry;
use crate::util::fs::{copy_file, slash_path, write_string};

/// Sub-trees recognized under a module's base directory. Files anywhere else
/// are not part of the asset build.
pub const RECOGNIZED_TREES: [&str; 2] = ["site", "admin"];

/// File name of the catalog metadata dump written next to the mirrored
/// sources.
pub const CATALOG_FILE: &str = "catalog.json";

/// Catalog computation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogOptions<'a> {
    /// Mirror every recorded file into this working tree, laid out as
    /// `<copy_to>/<module>/<rel>`, and dump the catalog metadata there.
    pub copy_to: Option<&'a Path>,
}

/// Compute one source entry per module, in declaration order.
///
/// A module whose base directory is missing yields `exists = false` rather
/// than an error; modules may legitimately ship no UI sources. A copy
/// failure, by contrast, is fatal: a missing mirrored file corrupts every
/// generated import downstream.
pub fn compute_catalog(
    modules: &[ModuleDecl],
    opts: &CatalogOptions<'_>,
) -> Result<Vec<SourceEntry>> {
    let mut entries = Vec::with_capacity(modules.len());

    for module in modules {
        let exists = module.dir.is_dir();
        let mut files = Vec::new();

        if exists {
            for tree in RECOGNIZED_TREES {
                let tree_root = module.dir.join(tree);
                if !tree_root.is_dir() {
                    continue;
                }
                for item in WalkDir::new(&tree_root).sort_by_file_name() {
                    let item = item.with_context(|| {
                        format!("failed to scan module `{}` sources", module.name)
                    })?;
                    if !item.file_type().is_file() {
                        continue;
                    }
                    let Ok(rel) = item.path().strip_prefix(&module.dir) else {
                        continue;
                    };
                    files.push(slash_path(rel));
                }
            }
        }

        if let Some(working_tree) = opts.copy_to {
            for rel in &files {
                copy_file(
                    &module.dir.join(rel),
                    &working_tree.join(&module.name).join(rel),
                )
                .with_context(|| {
                    format!("failed to mirror `{}` from module `{}`", rel, module.name)
                })?;
            }
        }

        entries.push(SourceEntry {
            name: module.name.clone(),
            dirname: module.dir.clone(),
            files,
            import_alias: module.alias.clone(),
            exists,
        });
    }

    if let Some(working_tree) = opts.copy_to {
        let metadata = serde_json::to_string_pretty(&entries)
            .context("failed to serialize catalog metadata")?;
        write_string(&working_tree.join(CATALOG_FILE), &metadata)?;
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn module(tmp: &TempDir, name: &str, files: &[&str]) -> ModuleDecl {
        let dir = tmp.path().join(name).join("ui");
        for rel in files {
            let path = dir.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, format!("// {rel}\n")).unwrap();
        }
        ModuleDecl {
            name: name.to_string(),
            dir,
            improves: None,
            alias: None,
        }
    }

    #[test]
    fn test_scans_recognized_trees_only() {
        let tmp = TempDir::new().unwrap();
        let decl = module(
            &tmp,
            "core-ui",
            &[
                "site/index.js",
                "admin/components/Widget.vue",
                "scripts/build.sh",
            ],
        );

        let entries = compute_catalog(&[decl], &CatalogOptions::default()).unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].exists);
        assert_eq!(
            entries[0].files,
            vec!["site/index.js", "admin/components/Widget.vue"]
        );
    }

    #[test]
    fn test_missing_module_dir_yields_exists_false() {
        let decl = ModuleDecl {
            name: "ghost".to_string(),
            dir: PathBuf::from("/nonexistent/ghost/ui"),
            improves: None,
            alias: None,
        };

        let entries = compute_catalog(&[decl], &CatalogOptions::default()).unwrap();

        assert!(!entries[0].exists);
        assert!(entries[0].files.is_empty());
    }

    #[test]
    fn test_declaration_order_preserved() {
        let tmp = TempDir::new().unwrap();
        let b = module(&tmp, "b", &["site/index.js"]);
        let a = module(&tmp, "a", &["site/index.js"]);

        let entries = compute_catalog(&[b, a], &CatalogOptions::default()).unwrap();

        assert_eq!(entries[0].name, "b");
        assert_eq!(entries[1].name, "a");
    }

    #[test]
    fn test_copy_mirrors_files_and_dumps_metadata() {
        let tmp = TempDir::new().unwrap();
        let decl = module(&tmp, "blog", &["site/index.js", "admin/apps/Posts.js"]);
        let working_tree = tmp.path().join("build/src");

        let entries = compute_catalog(
            &[decl],
            &CatalogOptions {
                copy_to: Some(&working_tree),
            },
        )
        .unwrap();

        assert!(working_tree.join("blog/site/index.js").is_file());
        assert!(working_tree.join("blog/admin/apps/Posts.js").is_file());

        let dumped = fs::read_to_string(working_tree.join(CATALOG_FILE)).unwrap();
        let parsed: Vec<SourceEntry> = serde_json::from_str(&dumped).unwrap();
        assert_eq!(parsed, entries);
    }
}
