//! Generated build inputs.
//!
//! Everything the external bundler consumes is produced here: synthesized
//! import code and the per-entrypoint entry-module files.

pub mod entry_file;
pub mod imports;

pub use entry_file::{entrypoint_output, render_entry_file, write_entry_file, EntrypointOutput};
pub use imports::{synthesize, ImportOutput, RegisterTarget, SynthError, SynthOptions};
