//! Import-code synthesis.
//!
//! Turns an ordered list of resolved component references into generated
//! source text: import statements, registry-registration statements, and
//! invocation statements. Output order is exactly input order; with
//! enumeration enabled, binding names are unique across the whole output even
//! when logical names collide.

use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::core::component::{component_name, ComponentRef};

static DEFAULT_EXPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"export\s+default").expect("default-export pattern"));

/// Well-known global collection points the framework runtime consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterTarget {
    /// `window.cms.components`, the admin UI component registry
    Components,
    /// `window.cms.editorExtensions`, the rich-text extension list
    EditorExtensions,
}

/// Synthesis options for one import section.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthOptions<'a> {
    /// Fail when a referenced file has no default export
    pub require_default_export: bool,

    /// Append a positional disambiguator to each binding name
    pub enumerate_imports: bool,

    /// Appended to every binding name (e.g. `App`)
    pub import_suffix: Option<&'a str>,

    /// Also emit registration statements into a global collection point
    pub register: Option<RegisterTarget>,

    /// Emit a zero-argument call expression per import
    pub invoke_apps: bool,

    /// Emit side-effect-only imports with no local binding
    pub side_effect_only: bool,
}

/// Generated text for one import section of an entry file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutput {
    pub import_code: String,
    pub register_code: String,
    pub invoke_code: String,
}

/// Synthesis failures. Both are contract violations that must abort the
/// build: shipping the generated file anyway would produce an entry bundle
/// that silently misbehaves in production.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error(
        "{file} does not have a default export\n\
         an entry source without a default export cannot be invoked and \
         silently does nothing in production; add `export default` or remove \
         the file from the build"
    )]
    MissingDefaultExport { file: String, path: PathBuf },

    #[error("failed to read {file} ({path}) while generating imports")]
    UnreadableSource {
        file: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Generate the import, registration, and invocation code for `components`.
pub fn synthesize(
    components: &[ComponentRef],
    opts: &SynthOptions<'_>,
) -> Result<ImportOutput, SynthError> {
    let mut output = ImportOutput {
        register_code: match opts.register {
            Some(RegisterTarget::Components) => {
                "window.cms.components = window.cms.components || {};\n".to_string()
            }
            Some(RegisterTarget::EditorExtensions) => {
                "window.cms.editorExtensions = window.cms.editorExtensions || [];\n".to_string()
            }
            None => String::new(),
        },
        ..Default::default()
    };

    for (i, component) in components.iter().enumerate() {
        if opts.require_default_export {
            check_default_export(component)?;
        }

        let name = component_name(
            &component.import_path,
            opts.enumerate_imports.then_some(i),
        );
        let binding = format!("{}{}", name, opts.import_suffix.unwrap_or(""));
        let path = quote_js(&component.import_path);

        if opts.side_effect_only {
            output.import_code.push_str(&format!("import {};\n", path));
        } else {
            output
                .import_code
                .push_str(&format!("import {} from {};\n", binding, path));
        }

        match opts.register {
            Some(RegisterTarget::Components) => {
                output.register_code.push_str(&format!(
                    "window.cms.components[{}] = {};\n",
                    quote_js(&name),
                    binding
                ));
            }
            Some(RegisterTarget::EditorExtensions) => {
                output
                    .register_code
                    .push_str(&format!("window.cms.editorExtensions.push({});\n", binding));
            }
            None => {}
        }

        if opts.invoke_apps {
            output.invoke_code.push_str(&format!("  {}();\n", binding));
        }
    }

    Ok(output)
}

fn check_default_export(component: &ComponentRef) -> Result<(), SynthError> {
    let contents =
        fs::read_to_string(&component.source_path).map_err(|source| SynthError::UnreadableSource {
            file: component.import_path.clone(),
            path: component.source_path.clone(),
            source,
        })?;

    if !DEFAULT_EXPORT.is_match(&contents) {
        return Err(SynthError::MissingDefaultExport {
            file: component.import_path.clone(),
            path: component.source_path.clone(),
        });
    }

    Ok(())
}

/// Quote a string as a JS string literal.
fn quote_js(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
