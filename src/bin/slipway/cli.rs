//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Slipway - asset-build integration for modular content frameworks
#[derive(Parser)]
#[command(name = "slipway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Catalog module sources and generate entry files
    Build(BuildArgs),

    /// Flatten the bundler manifest for the asset-serving layer
    Manifest(ManifestArgs),

    /// Build, then keep the working tree synchronized with module sources
    Watch(WatchArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Project root containing Slipway.toml
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,
}

#[derive(Args)]
pub struct ManifestArgs {
    /// Project root containing Slipway.toml
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    /// Path to the bundler manifest (defaults to the standard location
    /// under the build root)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Mark entrypoints as served by the live development transport
    #[arg(long)]
    pub dev_server: bool,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Project root containing Slipway.toml
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
