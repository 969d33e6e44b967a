//! YAML configuration parsing for keymaps
//!
//! Parses keymap.yaml files into Keybinding structs plus keymap copies.

use std::path::Path;

use serde::Deserialize;

use super::binding::{KeySpec, Keybinding};
use super::context::Mode;
use super::types::parse_sequence;

/// Root structure of a keymap YAML file
#[derive(Debug, Deserialize)]
pub struct KeymapConfig {
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
    #[serde(default)]
    pub copy: Vec<CopyConfig>,
}

/// A single binding entry from YAML
#[derive(Debug, Deserialize)]
pub struct BindingConfig {
    #[serde(default)]
    pub mode: Option<String>,
    pub keys: KeysConfig,
    pub command: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub no_repeat: bool,
}

/// `keys: "C-x C-f"` or `keys: ["C-x k", "C-x C-k"]`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum KeysConfig {
    One(String),
    Many(Vec<String>),
}

/// `copy: [{ from: view, to: caret }]`
#[derive(Debug, Deserialize)]
pub struct CopyConfig {
    pub from: String,
    pub to: String,
}

/// A parsed keymap file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeymapFile {
    pub bindings: Vec<Keybinding>,
    /// `(from, to)` keymap copies, applied after all bindings
    pub copies: Vec<(Mode, Mode)>,
}

/// Load keybindings from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<KeymapFile, KeymapError> {
    let content = std::fs::read_to_string(path).map_err(|e| KeymapError::IoError(e.to_string()))?;

    parse_keymap_yaml(&content)
}

/// Parse keybindings from YAML string
pub fn parse_keymap_yaml(yaml: &str) -> Result<KeymapFile, KeymapError> {
    let config: KeymapConfig =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))?;

    let mut bindings = Vec::with_capacity(config.bindings.len());
    for entry in config.bindings {
        let mode = match entry.mode {
            Some(ref name) => name.parse()?,
            None => Mode::Global,
        };

        let mut binding = Keybinding::new(mode, parse_keys(&entry.keys)?, entry.command);
        binding.description = entry.description;
        binding.no_repeat = entry.no_repeat;
        bindings.push(binding);
    }

    let copies = config
        .copy
        .iter()
        .map(|c| Ok((c.from.parse()?, c.to.parse()?)))
        .collect::<Result<Vec<_>, KeymapError>>()?;

    Ok(KeymapFile { bindings, copies })
}

/// Parse the `keys` field into the matching bind shape
pub fn parse_keys(keys: &KeysConfig) -> Result<KeySpec, KeymapError> {
    match keys {
        KeysConfig::One(s) => {
            let mut sequence = parse_sequence(s)?;
            if sequence.len() == 1 {
                Ok(KeySpec::Single(sequence.remove(0)))
            } else {
                Ok(KeySpec::Sequence(sequence))
            }
        }
        KeysConfig::Many(all) => {
            if all.is_empty() {
                return Err(KeymapError::EmptySequence);
            }
            let sequences = all
                .iter()
                .map(|s| parse_sequence(s))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(KeySpec::Multi(sequences))
        }
    }
}

/// Errors that can occur when parsing or registering keymaps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    IoError(String),
    ParseError(String),
    InvalidKey(String),
    InvalidCommand(String),
    InvalidMode(String),
    EmptySequence,
}

impl std::fmt::Display for KeymapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeymapError::IoError(e) => write!(f, "IO error: {}", e),
            KeymapError::ParseError(e) => write!(f, "Parse error: {}", e),
            KeymapError::InvalidKey(k) => write!(f, "Invalid key: {}", k),
            KeymapError::InvalidCommand(c) => write!(f, "Invalid command: {}", c),
            KeymapError::InvalidMode(m) => write!(f, "Invalid mode: {}", m),
            KeymapError::EmptySequence => write!(f, "Empty key sequence"),
        }
    }
}

impl std::error::Error for KeymapError {}
