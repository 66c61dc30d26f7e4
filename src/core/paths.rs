//! Centralized path helpers for the config directory.

use std::path::PathBuf;

use crate::core::app;

/// Env var that overrides the config directory (used by tests and sandboxed runs).
pub const CONFIG_DIR_ENV: &str = "MODEL_CHECK_CONFIG_DIR";

/// Project directories from the standard platform locations.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Config directory (~/.config/model-check/), or `MODEL_CHECK_CONFIG_DIR` when set.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    project_dirs().map(|d| d.config_dir().to_path_buf())
}
