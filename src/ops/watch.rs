//! Implementation of `slipway watch`.
//!
//! Runs a build, then keeps the working tree synchronized with module
//! sources for the rest of the session. Events arrive on a channel from the
//! notification backend and are handled strictly one at a time; a handler
//! finishes all of its index mutation and re-mirroring before the next event
//! is looked at.

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::core::{ProjectConfig, Session};

/// Options for the watch operation.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Project root containing Slipway.toml
    pub project_root: PathBuf,
}

/// Build once, then watch module directories until the process is stopped.
pub fn watch(opts: &WatchOptions) -> Result<()> {
    let config = ProjectConfig::load(&opts.project_root)?;
    let mut session = Session::create(config)?;
    session.generate_imports()?;

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })
    .context("failed to initialize the file watcher")?;

    let mut watched = 0;
    for entry in session.entries() {
        if !entry.exists {
            continue;
        }
        watcher
            .watch(&entry.dirname, RecursiveMode::Recursive)
            .with_context(|| format!("failed to watch {}", entry.dirname.display()))?;
        watched += 1;
    }
    tracing::info!("watching {watched} module directories");

    for result in rx {
        match result {
            Ok(event) => handle_event(&mut session, event),
            Err(e) => tracing::warn!("watch error: {e}"),
        }
    }

    Ok(())
}

/// Map a notification to the session handlers. Directory events are no-ops
/// at this layer: removals of untracked paths miss the path index and fall
/// through, and directory creations carry no files to mirror.
fn handle_event(session: &mut Session, event: Event) {
    for path in &event.paths {
        match event.kind {
            EventKind::Create(_) => {
                if path.is_file() {
                    session.on_add(path);
                }
            }
            EventKind::Modify(_) => {
                if path.is_file() {
                    session.on_change(path, false);
                }
            }
            EventKind::Remove(_) => {
                session.on_unlink(path);
            }
            _ => {}
        }
    }
}
