//! Engine configuration persistence
//!
//! Stores the enabled flag and the reserved keys in
//! `~/.config/keyseq/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::keymap::KeyToken;

/// Reserved keys intercepted before any keymap lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicKeys {
    /// Abort the current sequence and run the quit hook
    pub quit: KeyToken,
    /// Mid-sequence: show bindings reachable from the current sequence
    pub help: KeyToken,
    /// Let the next key through untouched
    pub escape: KeyToken,
    pub macro_start: KeyToken,
    /// Ends recording, or plays the last macro when not recording
    pub macro_end: KeyToken,
}

fn token(s: &str) -> KeyToken {
    KeyToken::parse(s).unwrap_or_else(|_| unreachable!("builtin key {:?} is valid", s))
}

impl Default for MagicKeys {
    fn default() -> Self {
        Self {
            quit: token("C-g"),
            help: token("<f1>"),
            escape: token("C-q"),
            macro_start: token("<f3>"),
            macro_end: token("<f4>"),
        }
    }
}

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Whether the engine intercepts key events
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub keys: MagicKeys,
}

fn default_enabled() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            keys: MagicKeys::default(),
        }
    }
}

impl EngineConfig {
    /// Load config from an explicit path, or return defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Update the enabled flag and save to `path`
    pub fn set_enabled(&mut self, enabled: bool, path: &Path) -> Result<(), String> {
        self.enabled = enabled;
        self.save_to(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.enabled);
        assert_eq!(config.keys.quit, "C-g");
        assert_eq!(config.keys.help, "<f1>");
        assert_eq!(config.keys.escape, "C-q");
        assert_eq!(config.keys.macro_start, "<f3>");
        assert_eq!(config.keys.macro_end, "<f4>");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = EngineConfig::load_from(&dir.path().join("config.yaml"));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = EngineConfig::default();
        config.keys.quit = KeyToken::parse("C-c").unwrap();
        config.set_enabled(false, &path).unwrap();

        let loaded = EngineConfig::load_from(&path);
        assert!(!loaded.enabled);
        assert_eq!(loaded.keys.quit, "C-c");
        assert_eq!(loaded.keys.help, "<f1>");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "keys:\n  escape: C-M-q\n").unwrap();

        let config = EngineConfig::load_from(&path);
        assert!(config.enabled);
        assert_eq!(config.keys.escape, "C-M-q");
        assert_eq!(config.keys.quit, "C-g");
    }

    #[test]
    fn test_invalid_key_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "enabled: false\nkeys:\n  quit: Ctrl+G\n").unwrap();

        assert_eq!(EngineConfig::load_from(&path), EngineConfig::default());
    }
}
