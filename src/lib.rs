//! Slipway - asset-build integration for modular content frameworks
//!
//! This crate sits between a content-management framework and an arbitrary
//! external bundler: it discovers UI sources contributed by extension
//! modules, resolves same-named file overrides, synthesizes the generated
//! entry modules the bundler consumes, flattens the bundler's dependency
//! manifest into per-entrypoint resource lists, and keeps a live index so
//! file-system changes re-synchronize the build working tree during
//! development.

pub mod builder;
pub mod core;
pub mod manifest;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;
pub mod watch;

pub use crate::core::{
    component::ComponentRef, config::ModuleDecl, config::ProjectConfig, entrypoint::Entrypoint,
    entrypoint::EntrypointKind, session::Session, source_entry::SourceEntry,
};
pub use crate::manifest::{FlattenedManifest, ManifestNode};
pub use crate::watch::WatchIndices;
