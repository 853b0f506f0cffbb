//! Data directory path resolution.

use std::path::{Path, PathBuf};

/// Environment variable for overriding the data directory.
pub const DATA_DIR_ENV_VAR: &str = "NAMASTE_DATA_DIR";

/// Default configuration file name looked up under the data directory.
pub const DEFAULT_CONFIG_FILE: &str = "namaste.toml";

/// Get the data root directory.
///
/// Resolution order:
/// 1. `NAMASTE_DATA_DIR` environment variable
/// 2. the configured directory
pub fn data_root(configured: &Path) -> PathBuf {
    if let Ok(root) = std::env::var(DATA_DIR_ENV_VAR) {
        return PathBuf::from(root);
    }
    configured.to_path_buf()
}

/// Join `relative` onto `root` unless it is already absolute.
pub fn resolve_under(root: &Path, relative: &Path) -> PathBuf {
    if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        root.join(relative)
    }
}
