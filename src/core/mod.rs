//! Core data model: configuration, entrypoints, source entries, resolved
//! components, and the session object that owns per-build state.

pub mod component;
pub mod config;
pub mod entrypoint;
pub mod session;
pub mod source_entry;

pub use component::{component_name, ComponentRef};
pub use config::{ModuleDecl, ProjectConfig};
pub use entrypoint::{Entrypoint, EntrypointKind};
pub use session::Session;
pub use source_entry::SourceEntry;
