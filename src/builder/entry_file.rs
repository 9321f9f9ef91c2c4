//! Generated entry-module files.
//!
//! One generation function per entrypoint kind, dispatched once per
//! entrypoint. The assembled file is what the external bundler consumes as
//! its entry module.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::imports::{synthesize, ImportOutput, RegisterTarget, SynthOptions};
use crate::core::entrypoint::{Entrypoint, EntrypointKind};
use crate::core::source_entry::SourceEntry;
use crate::resolver;
use crate::util::fs::write_string;

/// Binding suffix marking an import as an invocable app.
const APP_SUFFIX: &str = "App";

/// The assembled sections of one generated entry file.
#[derive(Debug, Clone, Default)]
pub struct EntrypointOutput {
    /// Absolute path of the entry file to write
    pub file: PathBuf,

    /// Configuration-supplied text prepended verbatim (trimmed)
    pub prologue: String,

    /// Public index imports (invocable apps)
    pub index_js: Option<ImportOutput>,

    /// Style-only index imports
    pub index_scss: Option<ImportOutput>,

    /// Host-framework-supplied icon code, when the host provides one
    pub icon: Option<ImportOutput>,

    /// Registered admin UI components
    pub components: Option<ImportOutput>,

    /// Registered rich-text editor extensions
    pub extensions: Option<ImportOutput>,

    /// Auto-invoked admin apps
    pub apps: Option<ImportOutput>,
}

/// Generate the entry-file sections for one entrypoint.
///
/// Returns `None` for externally bundled entrypoints, which get no generated
/// entry file. `icon` is an optional section computed by the host framework;
/// this crate only reserves its slot in the output.
pub fn entrypoint_output(
    entrypoint: &Entrypoint,
    entries: &[SourceEntry],
    working_tree: &Path,
    icon: Option<ImportOutput>,
) -> Result<Option<EntrypointOutput>> {
    let mut output = EntrypointOutput {
        file: working_tree.join(format!("{}.js", entrypoint.name)),
        prologue: entrypoint.prologue.clone(),
        icon,
        ..Default::default()
    };

    match entrypoint.kind {
        EntrypointKind::Index => {
            let selected = resolver::index_sources(entrypoint, entries)?;
            output.index_js = Some(synthesize(&selected.js, &index_js_options())?);
            output.index_scss = Some(synthesize(&selected.scss, &style_options())?);
        }
        EntrypointKind::AdminUi => {
            let components = resolver::admin_component_sources(entrypoint, entries);
            let extensions = resolver::editor_extension_sources(entrypoint, entries);
            let apps = resolver::admin_app_sources(entrypoint, entries);

            output.components = Some(synthesize(
                &components,
                &SynthOptions {
                    register: Some(RegisterTarget::Components),
                    ..Default::default()
                },
            )?);
            output.extensions = Some(synthesize(
                &extensions,
                &SynthOptions {
                    register: Some(RegisterTarget::EditorExtensions),
                    ..Default::default()
                },
            )?);
            output.apps = Some(synthesize(
                &apps,
                &SynthOptions {
                    import_suffix: Some(APP_SUFFIX),
                    enumerate_imports: true,
                    invoke_apps: true,
                    ..Default::default()
                },
            )?);
        }
        EntrypointKind::Custom => {
            let selected = resolver::extra_sources(entrypoint, entries)?;
            output.index_js = Some(synthesize(&selected.js, &index_js_options())?);
            output.index_scss = Some(synthesize(&selected.scss, &style_options())?);
        }
        EntrypointKind::Bundled => return Ok(None),
    }

    Ok(Some(output))
}

fn index_js_options() -> SynthOptions<'static> {
    SynthOptions {
        require_default_export: true,
        invoke_apps: true,
        import_suffix: Some(APP_SUFFIX),
        enumerate_imports: true,
        ..Default::default()
    }
}

fn style_options() -> SynthOptions<'static> {
    SynthOptions {
        side_effect_only: true,
        ..Default::default()
    }
}

/// Assemble the entry-file text. Section order is part of the contract: the
/// runtime expects registrations before the invocation block.
pub fn render_entry_file(output: &EntrypointOutput) -> String {
    let mut text = String::new();

    let prologue = output.prologue.trim();
    if !prologue.is_empty() {
        text.push_str(prologue);
        text.push('\n');
    }

    for section in [
        &output.index_scss,
        &output.index_js,
        &output.icon,
        &output.components,
        &output.extensions,
        &output.apps,
    ] {
        if let Some(section) = section {
            text.push_str(&section.import_code);
        }
    }

    for section in [&output.icon, &output.components, &output.extensions] {
        if let Some(section) = section {
            text.push_str(&section.register_code);
        }
    }

    if let Some(apps) = &output.apps {
        text.push_str(&format!(
            "if (document.readyState !== 'loading') {{\n\
            \x20 setTimeout(invoke, 0);\n\
            }} else {{\n\
            \x20 window.addEventListener('DOMContentLoaded', invoke);\n\
            }}\n\
            function invoke() {{\n\
            \x20 {}\n\
            }}\n",
            apps.invoke_code.trim()
        ));
    }

    if let Some(index_js) = &output.index_js {
        let invoke = index_js.invoke_code.trim();
        if !invoke.is_empty() {
            for line in invoke.lines() {
                text.push_str(line.trim());
                text.push('\n');
            }
        }
    }

    text
}

/// Render and write the entry file.
pub fn write_entry_file(output: &EntrypointOutput) -> Result<()> {
    write_string(&output.file, &render_entry_file(output))
        .with_context(|| format!("failed to write entry file: {}", output.file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entrypoint::{OutputKind, SourceLists};
    use std::fs;
    use tempfile::TempDir;

    fn entrypoint(name: &str, kind: EntrypointKind) -> Entrypoint {
        Entrypoint {
            name: name.to_string(),
            kind,
            sources: SourceLists::default(),
            ignore: Vec::new(),
            prologue: String::new(),
            outputs: vec![OutputKind::Js],
            manifest: None,
        }
    }

    fn module_entry(dir: &Path, name: &str, files: &[(&str, &str)]) -> SourceEntry {
        let base = dir.join(name);
        for (rel, contents) in files {
            let path = base.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, contents).unwrap();
        }
        SourceEntry {
            name: name.to_string(),
            dirname: base,
            files: files.iter().map(|(rel, _)| rel.to_string()).collect(),
            import_alias: None,
            exists: true,
        }
    }

    #[test]
    fn test_index_entry_file() {
        let tmp = TempDir::new().unwrap();
        let entries = vec![
            module_entry(
                tmp.path(),
                "core-ui",
                &[
                    ("site/index.js", "export default () => {};\n"),
                    ("site/index.scss", "body {}\n"),
                ],
            ),
            module_entry(
                tmp.path(),
                "blog",
                &[("site/index.js", "export default () => {};\n")],
            ),
        ];
        let mut ep = entrypoint("site", EntrypointKind::Index);
        ep.prologue = "// generated by slipway".to_string();

        let output = entrypoint_output(&ep, &entries, tmp.path(), None)
            .unwrap()
            .unwrap();
        let text = render_entry_file(&output);

        let expected = "// generated by slipway\n\
            import \"./core-ui/site/index.scss\";\n\
            import index_0App from \"./core-ui/site/index.js\";\n\
            import index_1App from \"./blog/site/index.js\";\n\
            index_0App();\n\
            index_1App();\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_admin_entry_file_sections_in_order() {
        let tmp = TempDir::new().unwrap();
        let entries = vec![module_entry(
            tmp.path(),
            "core-ui",
            &[
                ("admin/components/TheAdminBar.vue", "<template/>\n"),
                ("admin/extensions/Link.js", "export default {};\n"),
                ("admin/apps/Notices.js", "export default () => {};\n"),
            ],
        )];
        let ep = entrypoint("admin", EntrypointKind::AdminUi);

        let output = entrypoint_output(&ep, &entries, tmp.path(), None)
            .unwrap()
            .unwrap();
        let text = render_entry_file(&output);

        let component_import = text
            .find("import TheAdminBar from \"./core-ui/admin/components/TheAdminBar.vue\";")
            .unwrap();
        let extension_import = text
            .find("import Link from \"./core-ui/admin/extensions/Link.js\";")
            .unwrap();
        let app_import = text
            .find("import Notices_0App from \"./core-ui/admin/apps/Notices.js\";")
            .unwrap();
        let component_register = text
            .find("window.cms.components[\"TheAdminBar\"] = TheAdminBar;")
            .unwrap();
        let extension_register = text.find("window.cms.editorExtensions.push(Link);").unwrap();
        let guard = text.find("window.addEventListener('DOMContentLoaded', invoke);").unwrap();
        let invoke = text.find("Notices_0App();").unwrap();

        assert!(component_import < extension_import);
        assert!(extension_import < app_import);
        assert!(app_import < component_register);
        assert!(component_register < extension_register);
        assert!(extension_register < guard);
        assert!(guard < invoke);
    }

    #[test]
    fn test_admin_apps_do_not_require_default_export() {
        let tmp = TempDir::new().unwrap();
        let entries = vec![module_entry(
            tmp.path(),
            "core-ui",
            &[("admin/apps/Legacy.js", "window.legacy = 1;\n")],
        )];
        let ep = entrypoint("admin", EntrypointKind::AdminUi);

        assert!(entrypoint_output(&ep, &entries, tmp.path(), None).is_ok());
    }

    #[test]
    fn test_custom_entry_file_uses_extra_sources_only() {
        let tmp = TempDir::new().unwrap();
        let entries = vec![module_entry(
            tmp.path(),
            "blog",
            &[
                ("site/tools.js", "export default () => {};\n"),
                ("site/main.scss", "main {}\n"),
            ],
        )];
        let mut ep = entrypoint("tools", EntrypointKind::Custom);
        ep.sources.js = vec![tmp.path().join("blog/site/tools.js")];
        ep.sources.scss = vec![tmp.path().join("blog/site/main.scss")];

        let output = entrypoint_output(&ep, &entries, tmp.path(), None)
            .unwrap()
            .unwrap();
        let text = render_entry_file(&output);

        let expected = "import \"./blog/site/main.scss\";\n\
            import tools_0App from \"./blog/site/tools.js\";\n\
            tools_0App();\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_bundled_entrypoint_generates_nothing() {
        let tmp = TempDir::new().unwrap();
        let ep = entrypoint("external", EntrypointKind::Bundled);

        let output = entrypoint_output(&ep, &[], tmp.path(), None).unwrap();

        assert!(output.is_none());
    }

    #[test]
    fn test_index_missing_default_export_aborts() {
        let tmp = TempDir::new().unwrap();
        let entries = vec![module_entry(
            tmp.path(),
            "blog",
            &[("site/index.js", "console.log('no export');\n")],
        )];
        let ep = entrypoint("site", EntrypointKind::Index);

        let err = entrypoint_output(&ep, &entries, tmp.path(), None).unwrap_err();

        assert!(err.to_string().contains("default export"));
    }

    #[test]
    fn test_write_entry_file() {
        let tmp = TempDir::new().unwrap();
        let output = EntrypointOutput {
            file: tmp.path().join("build/src/site.js"),
            prologue: "// header".to_string(),
            ..Default::default()
        };

        write_entry_file(&output).unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("build/src/site.js")).unwrap(),
            "// header\n"
        );
    }
}
