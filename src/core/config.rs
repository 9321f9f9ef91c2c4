//! Slipway.toml parsing and validation.
//!
//! The project config declares the contributing modules and the entrypoints.
//! The `[[modules]]` array order is load-bearing: it is the override priority
//! order, later entries winning over earlier ones. Because it is literally
//! the TOML array order, it is always a strict total order; duplicate module
//! names are rejected at validation so no two modules can share a priority.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use miette::NamedSource;
use serde::Deserialize;
use thiserror::Error;

use crate::core::entrypoint::{Entrypoint, EntrypointKind, OutputKind, SourceLists};
use crate::util::diagnostic::ConfigParseError;

/// Canonical config file name at the project root.
pub const CONFIG_FILE: &str = "Slipway.toml";

/// Default build root, relative to the project root.
pub const DEFAULT_BUILD_ROOT: &str = ".slipway";

/// Name of the bundler output directory under the build root.
pub const DIST_DIR: &str = "dist";

/// A contributing module declaration.
///
/// Immutable after load. `improves` names another declared module this one
/// overrides files of; `alias` is the import alias exposed to bundler-side
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDecl {
    pub name: String,
    pub dir: PathBuf,
    pub improves: Option<String>,
    pub alias: Option<String>,
}

/// Config validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate module name `{name}` in {CONFIG_FILE}")]
    DuplicateModule { name: String },

    #[error("module `{module}` improves unknown module `{target}`")]
    UnknownImproveTarget { module: String, target: String },

    #[error("module `{name}` cannot improve itself")]
    SelfImprove { name: String },

    #[error("duplicate entrypoint name `{name}` in {CONFIG_FILE}")]
    DuplicateEntrypoint { name: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(rename = "build-root")]
    build_root: Option<PathBuf>,

    #[serde(default)]
    modules: Vec<RawModule>,

    #[serde(default)]
    entrypoints: Vec<RawEntrypoint>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModule {
    name: String,
    dir: PathBuf,
    improves: Option<String>,
    alias: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntrypoint {
    name: String,
    kind: EntrypointKind,

    #[serde(default)]
    sources: SourceLists,

    #[serde(default)]
    ignore: Vec<PathBuf>,

    #[serde(default)]
    prologue: String,

    #[serde(default = "default_outputs")]
    outputs: Vec<OutputKind>,
}

fn default_outputs() -> Vec<OutputKind> {
    vec![OutputKind::Js, OutputKind::Css]
}

/// The validated project configuration.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Project root the config was loaded from
    pub project_root: PathBuf,

    /// Absolute build root directory
    pub build_root: PathBuf,

    /// Contributing modules, in override priority order
    pub modules: Vec<ModuleDecl>,

    /// Configured entrypoints
    pub entrypoints: Vec<Entrypoint>,
}

impl ProjectConfig {
    /// Load and validate the config from `<project_root>/Slipway.toml`.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        let contents = crate::util::fs::read_to_string(&path)
            .with_context(|| crate::util::diagnostic::suggestions::NO_CONFIG.to_string())?;
        Self::parse(&contents, project_root, &path)
    }

    /// Parse and validate config text.
    pub fn parse(contents: &str, project_root: &Path, path: &Path) -> Result<Self> {
        let raw: RawConfig = toml::from_str(contents).map_err(|e| ConfigParseError {
            path: path.display().to_string(),
            src: NamedSource::new(path.display().to_string(), contents.to_string()),
            span: e.span().map(Into::into),
            message: e.message().to_string(),
        })?;

        Self::validate(raw, project_root)
    }

    fn validate(raw: RawConfig, project_root: &Path) -> Result<Self> {
        let mut names = HashSet::new();
        for module in &raw.modules {
            if !names.insert(module.name.as_str()) {
                return Err(ConfigError::DuplicateModule {
                    name: module.name.clone(),
                }
                .into());
            }
        }

        for module in &raw.modules {
            if let Some(target) = &module.improves {
                if target == &module.name {
                    return Err(ConfigError::SelfImprove {
                        name: module.name.clone(),
                    }
                    .into());
                }
                if !names.contains(target.as_str()) {
                    return Err(ConfigError::UnknownImproveTarget {
                        module: module.name.clone(),
                        target: target.clone(),
                    }
                    .into());
                }
            }
        }

        let mut entry_names = HashSet::new();
        for ep in &raw.entrypoints {
            if !entry_names.insert(ep.name.as_str()) {
                return Err(ConfigError::DuplicateEntrypoint {
                    name: ep.name.clone(),
                }
                .into());
            }
        }

        let build_root = absolutize(
            project_root,
            &raw.build_root
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_ROOT)),
        );

        let modules = raw
            .modules
            .into_iter()
            .map(|m| ModuleDecl {
                dir: absolutize(project_root, &m.dir),
                name: m.name,
                improves: m.improves,
                alias: m.alias,
            })
            .collect();

        let entrypoints = raw
            .entrypoints
            .into_iter()
            .map(|e| Entrypoint {
                name: e.name,
                kind: e.kind,
                sources: SourceLists {
                    js: e.sources.js.iter().map(|p| absolutize(project_root, p)).collect(),
                    scss: e
                        .sources
                        .scss
                        .iter()
                        .map(|p| absolutize(project_root, p))
                        .collect(),
                },
                ignore: e.ignore.iter().map(|p| absolutize(project_root, p)).collect(),
                prologue: e.prologue,
                outputs: e.outputs,
                manifest: None,
            })
            .collect();

        Ok(ProjectConfig {
            project_root: project_root.to_path_buf(),
            build_root,
            modules,
            entrypoints,
        })
    }

    /// The build working tree the bundler reads generated sources from.
    pub fn working_tree(&self) -> PathBuf {
        self.build_root.join("src")
    }

    /// The bundler output directory.
    pub fn dist_root(&self) -> PathBuf {
        self.build_root.join(DIST_DIR)
    }
}

fn absolutize(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
