//! Resolution error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error while resolving entrypoint sources.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// An extra source declared on an entrypoint lives under no declared
    /// module directory. This is a configuration error: the build would
    /// silently drop a file the configuration promises to include.
    #[error("no module source matches `{path}`")]
    UnknownExtraSource { path: PathBuf, entrypoint: String },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::UnknownExtraSource { path, entrypoint } => {
                Diagnostic::error(format!("no module source matches `{}`", path.display()))
                    .with_location(path.clone())
                    .with_context(format!("declared in entrypoint `{}`", entrypoint))
                    .with_context(suggestions::EXTRA_SOURCE)
                    .with_suggestion(format!(
                        "check the [entrypoints.sources] paths for `{}` in Slipway.toml",
                        entrypoint
                    ))
            }
        }
    }
}
