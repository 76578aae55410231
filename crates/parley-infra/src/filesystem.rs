//! Data directory resolution.

use std::path::PathBuf;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "PARLEY_DATA_DIR";

/// Resolve the Parley data directory.
///
/// Uses `PARLEY_DATA_DIR` if set, otherwise `~/.parley`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".parley");
    }

    // Last resort: current directory
    PathBuf::from(".parley")
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(dir: &std::path::Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await
}
