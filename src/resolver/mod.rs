//! Override resolution.
//!
//! Selects, per logical component name, which module's file wins when several
//! modules ship a file with the same name, and gathers the per-entrypoint
//! source lists the import synthesizer consumes. Module declaration order is
//! the priority order: the last module to declare a logical name wins.

pub mod errors;

pub use errors::ResolveError;

use std::collections::HashSet;
use std::path::Path;

use crate::core::component::{component_name, ComponentRef};
use crate::core::entrypoint::Entrypoint;
use crate::core::source_entry::SourceEntry;
use crate::util::fs::{relative_path, slash_path};

/// Per-entrypoint selected sources, split by target language.
#[derive(Debug, Clone, Default)]
pub struct SelectedSources {
    pub js: Vec<ComponentRef>,
    pub scss: Vec<ComponentRef>,
}

/// Collect every file matching `select` across all entries, in declaration
/// order.
pub fn collect_sources<F>(entries: &[SourceEntry], select: F) -> Vec<ComponentRef>
where
    F: Fn(&str, &SourceEntry) -> bool,
{
    let mut refs = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        for file in &entry.files {
            if select(file, entry) {
                refs.push(ComponentRef {
                    import_path: format!("./{}/{}", entry.name, file),
                    source_path: entry.source_path(file),
                    entry_index: index,
                });
            }
        }
    }
    refs
}

/// Keep, per logical name, only the last-declared reference, preserving the
/// ascending declaration order of the survivors.
///
/// Naive forward deduplication would keep the first (lowest-priority)
/// declaration, so this runs in three explicit steps:
///
/// 1. reverse the list, so the last declaration of each name comes first;
/// 2. keep the first occurrence of each logical name, dropping the rest;
/// 3. reverse back, restoring ascending declaration order.
///
/// O(n), and the surviving references are exactly the highest-priority one
/// per logical name.
pub fn dedup_keep_last(mut refs: Vec<ComponentRef>) -> Vec<ComponentRef> {
    refs.reverse();

    let mut seen = HashSet::new();
    refs.retain(|r| seen.insert(component_name(&r.import_path, None)));

    refs.reverse();
    refs
}

/// Resolve components: collect matches, then apply last-wins dedup.
pub fn resolve_components<F>(entries: &[SourceEntry], select: F) -> Vec<ComponentRef>
where
    F: Fn(&str, &SourceEntry) -> bool,
{
    dedup_keep_last(collect_sources(entries, select))
}

/// Sources for an `index`-kind entrypoint: each module's
/// `<entrypoint>/index.js` and `<entrypoint>/index.scss`, minus ignored
/// files, plus the entrypoint's declared extra sources.
///
/// No dedup here: every module contributes its own index file, and the
/// synthesizer's import enumeration keeps the bindings unique.
pub fn index_sources(
    entrypoint: &Entrypoint,
    entries: &[SourceEntry],
) -> Result<SelectedSources, ResolveError> {
    let js_file = format!("{}/index.js", entrypoint.name);
    let scss_file = format!("{}/index.scss", entrypoint.name);

    let ignored = |path: &Path| entrypoint.ignore.iter().any(|p| p == path);

    let mut selected = SelectedSources::default();
    for (index, entry) in entries.iter().enumerate() {
        if entry.has_file(&js_file) && !ignored(&entry.source_path(&js_file)) {
            selected.js.push(ComponentRef {
                import_path: format!("./{}/{}", entry.name, js_file),
                source_path: entry.source_path(&js_file),
                entry_index: index,
            });
        }
        if entry.has_file(&scss_file) && !ignored(&entry.source_path(&scss_file)) {
            selected.scss.push(ComponentRef {
                import_path: format!("./{}/{}", entry.name, scss_file),
                source_path: entry.source_path(&scss_file),
                entry_index: index,
            });
        }
    }

    let extra = extra_sources(entrypoint, entries)?;
    selected.js.extend(extra.js);
    selected.scss.extend(extra.scss);

    Ok(selected)
}

/// Admin UI components: files under `<entrypoint>/components/`, deduped so a
/// later module shipping a same-named component replaces the original.
pub fn admin_component_sources(entrypoint: &Entrypoint, entries: &[SourceEntry]) -> Vec<ComponentRef> {
    let prefix = format!("{}/components/", entrypoint.name);
    resolve_components(entries, |file, _| file.starts_with(&prefix))
}

/// Rich-text editor extensions: files under `<entrypoint>/extensions/`.
pub fn editor_extension_sources(
    entrypoint: &Entrypoint,
    entries: &[SourceEntry],
) -> Vec<ComponentRef> {
    let prefix = format!("{}/extensions/", entrypoint.name);
    collect_sources(entries, |file, _| file.starts_with(&prefix))
}

/// Auto-invoked admin apps: files under `<entrypoint>/apps/`.
pub fn admin_app_sources(entrypoint: &Entrypoint, entries: &[SourceEntry]) -> Vec<ComponentRef> {
    let prefix = format!("{}/apps/", entrypoint.name);
    collect_sources(entries, |file, _| file.starts_with(&prefix))
}

/// The explicit-file-list degenerate case: no predicate, just a lookup of
/// each declared extra path against the known entries.
///
/// A path under no declared module directory is a configuration error and
/// fails the build; a path under a known module but outside its recorded
/// trees is skipped.
pub fn extra_sources(
    entrypoint: &Entrypoint,
    entries: &[SourceEntry],
) -> Result<SelectedSources, ResolveError> {
    let mut selected = SelectedSources::default();
    if entrypoint.sources.is_empty() {
        return Ok(selected);
    }

    for path in &entrypoint.sources.js {
        if let Some(r) = find_extra(path, entries, entrypoint)? {
            selected.js.push(r);
        }
    }
    for path in &entrypoint.sources.scss {
        if let Some(r) = find_extra(path, entries, entrypoint)? {
            selected.scss.push(r);
        }
    }

    Ok(selected)
}

fn find_extra(
    path: &Path,
    entries: &[SourceEntry],
    entrypoint: &Entrypoint,
) -> Result<Option<ComponentRef>, ResolveError> {
    let (index, entry) = entries
        .iter()
        .enumerate()
        .find(|(_, e)| path.starts_with(&e.dirname))
        .ok_or_else(|| ResolveError::UnknownExtraSource {
            path: path.to_path_buf(),
            entrypoint: entrypoint.name.clone(),
        })?;

    let rel = slash_path(&relative_path(&entry.dirname, path));
    if entry.has_file(&rel) {
        Ok(Some(ComponentRef {
            import_path: format!("./{}/{}", entry.name, rel),
            source_path: path.to_path_buf(),
            entry_index: index,
        }))
    } else {
        Ok(None)
    }
}
