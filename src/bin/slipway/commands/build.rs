//! `slipway build` command

use std::io::IsTerminal;

use anyhow::Result;

use crate::cli::BuildArgs;
use slipway::ops::{build, BuildOptions};
use slipway::resolver::ResolveError;
use slipway::util::diagnostic::emit;

pub fn execute(args: BuildArgs) -> Result<()> {
    let report = match build(&BuildOptions {
        project_root: args.project_root,
    }) {
        Ok(report) => report,
        Err(e) => {
            // Configuration errors get the full diagnostic treatment.
            if let Some(resolve_err) = e.downcast_ref::<ResolveError>() {
                emit(&resolve_err.to_diagnostic(), std::io::stderr().is_terminal());
                std::process::exit(1);
            }
            return Err(e);
        }
    };

    println!(
        "built {} entry files from {} modules into {}",
        report.entry_files.len(),
        report.modules,
        report.working_tree.display()
    );

    Ok(())
}
