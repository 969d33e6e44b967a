//! Modal key-sequence dispatching
//!
//! This module provides an Emacs-style keybinding system that:
//! - Normalizes raw key events into canonical tokens (`"C-x"`, `"SPC"`, `"<f1>"`)
//! - Stores per-mode keymaps as tries, with `global` as the fallback
//! - Collects numeric prefix arguments (`C-u`, `M--`, `C-<digit>`)
//! - Records and replays keyboard macros
//! - Enables user customization via YAML keymap files
//!
//! # Architecture
//!
//! ```text
//! winit::KeyEvent → KeyEvent → KeyToken → Engine (trie walk) → Command → Host
//! ```
//!
//! # Loading Keymaps
//!
//! ```ignore
//! let mut engine = Engine::new();
//! engine.load_keymap(&load_default_keymap(), &builtin_commands())?;
//!
//! // Or load from a YAML file
//! engine.load_keymap(&load_keymap_file(path)?, &builtin_commands())?;
//! ```

mod binding;
mod command;
mod config;
mod context;
mod defaults;
mod engine;
mod help;
mod host;
#[allow(clippy::module_inception)]
mod keymap;
mod prefix;
mod recorder;
mod registry;
mod types;
mod winit_adapter;

pub use binding::{KeySpec, Keybinding};
pub use command::{
    builtin_commands, repeat_count, Command, CommandFn, CommandTable, MAX_REPEAT, QUIT_HOOK,
};
pub use config::{load_keymap_file, parse_keymap_yaml, KeymapError, KeymapFile};
pub use context::{KeyContext, Mode};
pub use defaults::{
    default_bindings, default_keymap, get_default_keymap_yaml, load_default_keymap,
    merge_bindings, merge_keymaps, UNBOUND,
};
pub use engine::{DispatchState, Engine, KeyAction, NOTICE_DURATION};
pub use help::{BindingReport, BindingRow, ReportSection, SpecialKeyRow};
pub use host::Host;
pub use keymap::{Entry, KeyMap, Override};
pub use prefix::{is_prefix_argument_key, parse_prefix_argument};
pub use recorder::MacroRecorder;
pub use registry::KeymapRegistry;
pub use types::{display_sequence, parse_sequence, KeyEvent, KeyToken, Modifiers, NamedKey};
pub use winit_adapter::key_event_from_winit;
