//! `slipway manifest` command

use anyhow::Result;

use crate::cli::ManifestArgs;
use slipway::ops::{flatten_manifest, FlattenManifestOptions};

pub fn execute(args: ManifestArgs) -> Result<()> {
    let output = flatten_manifest(&FlattenManifestOptions {
        project_root: args.project_root,
        manifest_path: args.manifest,
        dev_server: args.dev_server,
    })?;

    println!("wrote {}", output.display());

    Ok(())
}
