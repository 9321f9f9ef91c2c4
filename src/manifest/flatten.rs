//! Manifest-graph flattening.
//!
//! Reduces the bundler's chunk graph to per-entrypoint file lists. The
//! traversal is an explicit worklist with a visited set keyed by
//! `(edge kind, chunk id)`, so a chunk reachable through multiple paths, or
//! participating in an import cycle, is entered at most once per edge kind.
//! That guard is required correctness, not an optimization.

use std::collections::HashSet;

use crate::core::entrypoint::Entrypoint;
use crate::manifest::{FlattenedManifest, ManifestFiles, ManifestNode, RawManifest};

/// Which reference edges a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EdgeKind {
    Static,
    Dynamic,
}

impl EdgeKind {
    fn edges<'m>(&self, node: &'m ManifestNode) -> &'m [String] {
        match self {
            EdgeKind::Static => &node.imports,
            EdgeKind::Dynamic => &node.dynamic_imports,
        }
    }
}

/// Flattening parameters supplied by the caller.
#[derive(Debug, Clone)]
pub struct FlattenOptions {
    /// Build output directory name, recorded as the manifest root
    pub root: String,

    /// Whether a live development transport currently serves the build
    pub dev_server: bool,
}

/// Populate `manifest` on every entrypoint that has a matching entry chunk.
///
/// Entrypoints without one (externally bundled, or simply not part of this
/// bundler run) are passed through untouched, signaling "unprocessed" to the
/// consumer.
pub fn flatten(entrypoints: &mut [Entrypoint], manifest: &RawManifest, opts: &FlattenOptions) {
    for entrypoint in entrypoints.iter_mut() {
        let Some((root_id, root)) = find_entry_node(manifest, &entrypoint.name) else {
            continue;
        };

        let reach_both = reachable(manifest, root_id, &[EdgeKind::Static, EdgeKind::Dynamic]);

        let mut css = root.css.clone();
        let mut assets = root.assets.clone();
        for id in &reach_both {
            if let Some(node) = manifest.get(*id) {
                css.extend(node.css.iter().cloned());
                assets.extend(node.assets.iter().cloned());
            }
        }

        let imports = node_files(manifest, &reachable(manifest, root_id, &[EdgeKind::Static]));
        let dynamic_imports =
            node_files(manifest, &reachable(manifest, root_id, &[EdgeKind::Dynamic]));

        entrypoint.manifest = Some(FlattenedManifest {
            root: opts.root.clone(),
            files: ManifestFiles {
                js: vec![root.file.clone()],
                css: dedup_preserve(css),
                assets: dedup_preserve(assets),
                imports: dedup_preserve(imports),
                dynamic_imports: dedup_preserve(dynamic_imports),
            },
            src: root.src.clone(),
            dev_server: opts.dev_server && !entrypoint.kind.is_bundled(),
        });
    }
}

/// Locate the entry chunk declared for `name`.
fn find_entry_node<'m>(manifest: &'m RawManifest, name: &str) -> Option<(&'m str, &'m ManifestNode)> {
    manifest
        .iter()
        .find(|(_, node)| node.is_entry && node.name.as_deref() == Some(name))
        .map(|(id, node)| (id.as_str(), node))
}

/// Chunk ids reachable from `root` over the given edge kinds, in
/// first-discovered depth-first order. The root itself is never returned:
/// the entry's own file belongs to its `js` list only.
fn reachable<'m>(manifest: &'m RawManifest, root: &'m str, kinds: &[EdgeKind]) -> Vec<&'m str> {
    let mut visited: HashSet<(EdgeKind, &str)> = HashSet::new();
    let mut entered: HashSet<&str> = HashSet::new();
    let mut order: Vec<&str> = Vec::new();
    let mut stack: Vec<(EdgeKind, &str)> = Vec::new();

    push_edges(&mut stack, manifest, root, kinds);

    while let Some((kind, id)) = stack.pop() {
        if !visited.insert((kind, id)) {
            continue;
        }
        if id == root {
            continue;
        }
        let Some(node) = manifest.get(id) else {
            // Dangling reference; the bundler emitted an edge to a chunk it
            // did not record. Nothing to collect.
            continue;
        };
        if entered.insert(id) {
            order.push(id);
        }
        push_edges(&mut stack, manifest, id, kinds);
    }

    order
}

/// Push a node's outgoing edges, reversed so the stack pops them in declared
/// order.
fn push_edges<'m>(
    stack: &mut Vec<(EdgeKind, &'m str)>,
    manifest: &'m RawManifest,
    id: &str,
    kinds: &[EdgeKind],
) {
    let Some(node) = manifest.get(id) else {
        return;
    };
    let mut edges: Vec<(EdgeKind, &str)> = Vec::new();
    for kind in kinds {
        for target in kind.edges(node) {
            edges.push((*kind, target.as_str()));
        }
    }
    while let Some(edge) = edges.pop() {
        stack.push(edge);
    }
}

fn node_files(manifest: &RawManifest, ids: &[&str]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| manifest.get(*id))
        .map(|node| node.file.clone())
        .collect()
}

/// Deduplicate values preserving first-discovered order. A physical file may
/// be reachable through more than one edge.
fn dedup_preserve(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(v.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entrypoint::{EntrypointKind, OutputKind, SourceLists};
    use std::collections::HashMap;

    fn entrypoint(name: &str, kind: EntrypointKind) -> Entrypoint {
        Entrypoint {
            name: name.to_string(),
            kind,
            sources: SourceLists::default(),
            ignore: Vec::new(),
            prologue: String::new(),
            outputs: vec![OutputKind::Js, OutputKind::Css],
            manifest: None,
        }
    }

    fn node(file: &str, name: Option<&str>, is_entry: bool) -> ManifestNode {
        ManifestNode {
            file: file.to_string(),
            name: name.map(str::to_string),
            src: name.map(|n| format!("{n}.js")),
            is_entry,
            ..Default::default()
        }
    }

    fn opts() -> FlattenOptions {
        FlattenOptions {
            root: "dist".to_string(),
            dev_server: false,
        }
    }

    #[test]
    fn test_missing_entry_node_passes_through() {
        let manifest: RawManifest = HashMap::new();
        let mut entrypoints = vec![entrypoint("site", EntrypointKind::Index)];

        flatten(&mut entrypoints, &manifest, &opts());

        assert!(entrypoints[0].manifest.is_none());
    }

    #[test]
    fn test_direct_references_are_seeded() {
        let mut manifest = HashMap::new();
        let mut app = node("assets/app.js", Some("site"), true);
        app.css = vec!["assets/app.css".to_string()];
        app.assets = vec!["assets/logo.svg".to_string()];
        manifest.insert("app.js".to_string(), app);

        let mut entrypoints = vec![entrypoint("site", EntrypointKind::Index)];
        flatten(&mut entrypoints, &manifest, &opts());

        let flat = entrypoints[0].manifest.as_ref().unwrap();
        assert_eq!(flat.files.js, vec!["assets/app.js"]);
        assert_eq!(flat.files.css, vec!["assets/app.css"]);
        assert_eq!(flat.files.assets, vec!["assets/logo.svg"]);
        assert!(flat.files.imports.is_empty());
        assert!(flat.files.dynamic_imports.is_empty());
        assert_eq!(flat.src.as_deref(), Some("site.js"));
        assert_eq!(flat.root, "dist");
    }

    #[test]
    fn test_static_and_dynamic_lists_are_split() {
        let mut manifest = HashMap::new();
        let mut app = node("assets/app.js", Some("site"), true);
        app.imports = vec!["shared.js".to_string()];
        app.dynamic_imports = vec!["lazy.js".to_string()];
        manifest.insert("app.js".to_string(), app);
        manifest.insert("shared.js".to_string(), node("assets/shared.js", None, false));
        manifest.insert("lazy.js".to_string(), node("assets/lazy.js", None, false));

        let mut entrypoints = vec![entrypoint("site", EntrypointKind::Index)];
        flatten(&mut entrypoints, &manifest, &opts());

        let files = &entrypoints[0].manifest.as_ref().unwrap().files;
        assert_eq!(files.imports, vec!["assets/shared.js"]);
        assert_eq!(files.dynamic_imports, vec!["assets/lazy.js"]);
    }

    #[test]
    fn test_mutual_dynamic_cycle_terminates() {
        let mut manifest = HashMap::new();
        let mut app = node("assets/app.js", Some("site"), true);
        app.dynamic_imports = vec!["b.js".to_string()];
        let mut b = node("assets/b.js", None, false);
        b.dynamic_imports = vec!["app.js".to_string()];
        b.css = vec!["assets/b.css".to_string()];
        manifest.insert("app.js".to_string(), app);
        manifest.insert("b.js".to_string(), b);

        let mut entrypoints = vec![entrypoint("site", EntrypointKind::Index)];
        flatten(&mut entrypoints, &manifest, &opts());

        let files = &entrypoints[0].manifest.as_ref().unwrap().files;
        assert_eq!(files.dynamic_imports, vec!["assets/b.js"]);
        assert_eq!(files.css, vec!["assets/b.css"]);
    }

    #[test]
    fn test_mixed_cycle_excludes_entry_from_its_own_lists() {
        // app dynamically imports shared; shared statically imports app.
        let mut manifest = HashMap::new();
        let mut app = node("assets/app.js", Some("site"), true);
        app.dynamic_imports = vec!["shared.js".to_string()];
        let mut shared = node("assets/shared.js", None, false);
        shared.imports = vec!["app.js".to_string()];
        manifest.insert("app.js".to_string(), app);
        manifest.insert("shared.js".to_string(), shared);

        let mut entrypoints = vec![entrypoint("site", EntrypointKind::Index)];
        flatten(&mut entrypoints, &manifest, &opts());

        let files = &entrypoints[0].manifest.as_ref().unwrap().files;
        assert_eq!(files.dynamic_imports, vec!["assets/shared.js"]);
        assert!(!files.imports.contains(&"assets/app.js".to_string()));
    }

    #[test]
    fn test_css_collected_over_both_edge_kinds() {
        let mut manifest = HashMap::new();
        let mut app = node("assets/app.js", Some("site"), true);
        app.css = vec!["assets/app.css".to_string()];
        app.imports = vec!["shared.js".to_string()];
        let mut shared = node("assets/shared.js", None, false);
        shared.css = vec!["assets/shared.css".to_string()];
        shared.dynamic_imports = vec!["lazy.js".to_string()];
        let mut lazy = node("assets/lazy.js", None, false);
        lazy.css = vec!["assets/lazy.css".to_string()];
        manifest.insert("app.js".to_string(), app);
        manifest.insert("shared.js".to_string(), shared);
        manifest.insert("lazy.js".to_string(), lazy);

        let mut entrypoints = vec![entrypoint("site", EntrypointKind::Index)];
        flatten(&mut entrypoints, &manifest, &opts());

        let files = &entrypoints[0].manifest.as_ref().unwrap().files;
        assert_eq!(
            files.css,
            vec!["assets/app.css", "assets/shared.css", "assets/lazy.css"]
        );
        // lazy is reached through a dynamic edge, so it is not a static import
        assert_eq!(files.imports, vec!["assets/shared.js"]);
        assert_eq!(files.dynamic_imports, vec!["assets/lazy.js"]);
    }

    #[test]
    fn test_shared_file_reported_once() {
        // Two chunks emit the same css file; it must appear once.
        let mut manifest = HashMap::new();
        let mut app = node("assets/app.js", Some("site"), true);
        app.imports = vec!["a.js".to_string(), "b.js".to_string()];
        let mut a = node("assets/a.js", None, false);
        a.css = vec!["assets/common.css".to_string()];
        let mut b = node("assets/b.js", None, false);
        b.css = vec!["assets/common.css".to_string()];
        manifest.insert("app.js".to_string(), app);
        manifest.insert("a.js".to_string(), a);
        manifest.insert("b.js".to_string(), b);

        let mut entrypoints = vec![entrypoint("site", EntrypointKind::Index)];
        flatten(&mut entrypoints, &manifest, &opts());

        let files = &entrypoints[0].manifest.as_ref().unwrap().files;
        assert_eq!(files.css, vec!["assets/common.css"]);
        assert_eq!(files.imports, vec!["assets/a.js", "assets/b.js"]);
    }

    #[test]
    fn test_dangling_edge_is_skipped() {
        let mut manifest = HashMap::new();
        let mut app = node("assets/app.js", Some("site"), true);
        app.imports = vec!["missing.js".to_string()];
        manifest.insert("app.js".to_string(), app);

        let mut entrypoints = vec![entrypoint("site", EntrypointKind::Index)];
        flatten(&mut entrypoints, &manifest, &opts());

        let files = &entrypoints[0].manifest.as_ref().unwrap().files;
        assert!(files.imports.is_empty());
    }

    #[test]
    fn test_dev_server_flag_passthrough() {
        let mut manifest = HashMap::new();
        manifest.insert("app.js".to_string(), node("assets/app.js", Some("site"), true));

        let mut entrypoints = vec![entrypoint("site", EntrypointKind::Index)];
        let opts = FlattenOptions {
            root: "dist".to_string(),
            dev_server: true,
        };
        flatten(&mut entrypoints, &manifest, &opts);

        assert!(entrypoints[0].manifest.as_ref().unwrap().dev_server);
    }
}
