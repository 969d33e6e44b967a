//! Where keyseq keeps its files
//!
//! ```text
//! <config dir>/
//!   config.yaml     enabled flag and reserved keys
//!   keymap.yaml     user keymap layer
//!   logs/keyseq.log.YYYY-MM-DD
//! ```
//!
//! `KEYSEQ_CONFIG_DIR` replaces the whole directory, which is what tests and
//! throwaway sessions use. Otherwise the platform config location is used.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "keyseq";

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "KEYSEQ_CONFIG_DIR";

/// Prefix of the daily rolled log files
pub const LOG_FILE_PREFIX: &str = "keyseq.log";

/// Keymap layer picked up from the working directory
pub const PROJECT_KEYMAP: &str = "keymap.yaml";

/// Base config directory
///
/// 1. `$KEYSEQ_CONFIG_DIR`
/// 2. Windows: `%APPDATA%\keyseq`
/// 3. Elsewhere: `$XDG_CONFIG_HOME/keyseq`, else `~/.config/keyseq`
pub fn config_dir() -> Option<PathBuf> {
    let platform_base = if cfg!(target_os = "windows") {
        std::env::var_os("APPDATA")
    } else {
        std::env::var_os("XDG_CONFIG_HOME")
    };
    resolve_config_dir(
        std::env::var_os(CONFIG_DIR_ENV),
        platform_base,
        dirs::home_dir(),
    )
}

fn resolve_config_dir(
    explicit: Option<OsString>,
    platform_base: Option<OsString>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    let non_empty = |value: OsString| (!value.is_empty()).then(|| PathBuf::from(value));

    if let Some(dir) = explicit.and_then(non_empty) {
        return Some(dir);
    }
    platform_base
        .and_then(non_empty)
        .or_else(|| home.map(|h| h.join(".config")))
        .map(|base| base.join(APP_DIR))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// User keymap layer, applied last
pub fn keymap_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("keymap.yaml"))
}

/// Project keymap layer in the current directory
pub fn project_keymap_file() -> &'static Path {
    Path::new(PROJECT_KEYMAP)
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    fs::create_dir_all(&logs)
        .map_err(|e| format!("Failed to create directory {}: {}", logs.display(), e))?;
    Ok(logs)
}
