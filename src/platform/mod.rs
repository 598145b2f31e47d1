//! Filesystem helpers and the per-user data directory
//!
//! Identity and configuration live in one directory. It defaults to the
//! platform's local data directory and can be overridden with --home or
//! COURSE_SELECTION_HOME.

pub mod common;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Resolve the directory holding `config.toml` and `identity.json`
pub fn data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }

    match directories::ProjectDirs::from("", "", "course-selection") {
        Some(dirs) => Ok(dirs.data_local_dir().to_path_buf()),
        None => anyhow::bail!("Could not determine data directory location"),
    }
}
