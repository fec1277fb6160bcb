//! Default on-disk locations.

use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "kilnguide";
pub const DEFAULT_SNAPSHOT_FILE: &str = "walkthrough_snapshot.json";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Per-user data directory, falling back to the working directory when the
/// platform reports none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

pub fn default_snapshot_path() -> PathBuf {
    default_data_dir().join(DEFAULT_SNAPSHOT_FILE)
}

pub fn default_log_dir() -> PathBuf {
    default_data_dir().join(DEFAULT_LOG_DIR)
}
