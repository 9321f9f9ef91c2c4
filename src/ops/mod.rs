//! High-level operations.
//!
//! This module contains the implementation of Slipway commands.

pub mod build;
pub mod flatten;
pub mod watch;

pub use build::{build, BuildOptions, BuildReport};
pub use flatten::{flatten_manifest, FlattenManifestOptions};
pub use watch::{watch, WatchOptions};
