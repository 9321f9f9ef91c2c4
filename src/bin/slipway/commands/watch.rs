//! `slipway watch` command

use anyhow::Result;

use crate::cli::WatchArgs;
use slipway::ops::{watch, WatchOptions};

pub fn execute(args: WatchArgs) -> Result<()> {
    watch(&WatchOptions {
        project_root: args.project_root,
    })
}
