//! Command implementations for the statsim CLI.

pub mod chi;
pub mod t;

use std::path::{Path, PathBuf};

use statsim_core::default_save_path;

/// Resolve an optional-path flag: `--flag` with no value means the fixed
/// desktop save file, `--flag path` means that path.
pub(crate) fn resolve_save_path(arg: &str) -> PathBuf {
    if arg.is_empty() {
        default_save_path()
    } else {
        Path::new(arg).to_path_buf()
    }
}
