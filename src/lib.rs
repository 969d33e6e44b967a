//! keyseq - modal, Emacs-style key sequence dispatching
//!
//! This crate turns a stream of raw key events into commands: multi-key
//! sequences over per-mode keymaps, numeric prefix arguments, keyboard
//! macros and interactive binding help.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod console;
pub mod keymap;
pub mod tracing;

// Re-export commonly used types
pub use config::{EngineConfig, MagicKeys};
pub use keymap::{Engine, Host, KeyAction, KeyEvent};
