//! Default keybindings
//!
//! These are the standard keybindings that ship with keyseq.
//! Can be loaded from keymap.yaml at project root, or falls back to hardcoded defaults.

use super::binding::Keybinding;
use super::config::{load_keymap_file, KeymapFile};
use super::context::Mode;
use super::types::parse_sequence;

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

/// Command name that removes a binding from lower layers
pub const UNBOUND: &str = "unbound";

/// Get the embedded default keymap YAML
pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

/// Load and merge keymaps: defaults + user overrides
///
/// Loading order (each layer overrides the previous):
/// 1. Embedded default keymap (compiled into binary)
/// 2. keymap.yaml in current directory (project-local overrides)
/// 3. User config at ~/.config/keyseq/keymap.yaml
///
/// Bindings with `command: unbound` remove matching lower-layer bindings.
pub fn load_default_keymap() -> KeymapFile {
    // Load base defaults from embedded YAML
    let mut keymap = match super::config::parse_keymap_yaml(DEFAULT_KEYMAP_YAML) {
        Ok(file) => {
            tracing::info!(
                "Loaded embedded default keymap ({} bindings)",
                file.bindings.len()
            );
            file
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded keymap: {}, using hardcoded defaults",
                e
            );
            default_keymap()
        }
    };

    // Try loading project-local keymap.yaml
    if let Ok(local) = load_keymap_file(crate::config_paths::project_keymap_file()) {
        tracing::info!(
            "Merging project keymap.yaml ({} bindings)",
            local.bindings.len()
        );
        keymap = merge_keymaps(keymap, local);
    }

    // Try loading user config
    if let Some(user_path) = crate::config_paths::keymap_file() {
        if user_path.exists() {
            match load_keymap_file(&user_path) {
                Ok(user) => {
                    tracing::info!(
                        "Merging user keymap from {} ({} bindings)",
                        user_path.display(),
                        user.bindings.len()
                    );
                    keymap = merge_keymaps(keymap, user);
                }
                Err(e) => {
                    tracing::warn!("Failed to load user keymap from {}: {}", user_path.display(), e);
                }
            }
        }
    }

    keymap
}

/// Layer `user` over `base`: bindings are merged, copies appended
pub fn merge_keymaps(base: KeymapFile, user: KeymapFile) -> KeymapFile {
    let mut copies = base.copies;
    copies.extend(user.copies);
    KeymapFile {
        bindings: merge_bindings(base.bindings, user.bindings),
        copies,
    }
}

/// Merge user bindings into base bindings
///
/// User bindings override or extend base bindings:
/// - If user binding has same mode + keys → replaces base
/// - If user binding command is `unbound` → removes matching base bindings
/// - Otherwise → user binding is added
pub fn merge_bindings(base: Vec<Keybinding>, user: Vec<Keybinding>) -> Vec<Keybinding> {
    let mut result = base;

    for user_binding in user {
        if user_binding.command == UNBOUND {
            result.retain(|b| !b.same_keys(&user_binding));
            continue;
        }

        if let Some(existing) = result.iter_mut().find(|b| b.same_keys(&user_binding)) {
            *existing = user_binding;
        } else {
            result.push(user_binding);
        }
    }

    result
}

fn bind(mode: Mode, keys: &str, command: &str) -> Keybinding {
    let mut sequence = parse_sequence(keys).unwrap_or_default();
    if sequence.len() == 1 {
        Keybinding::new(mode, sequence.remove(0), command)
    } else {
        Keybinding::new(mode, sequence, command)
    }
}

/// Hardcoded fallback used when the embedded YAML fails to parse
pub fn default_keymap() -> KeymapFile {
    KeymapFile {
        bindings: default_bindings(),
        copies: vec![(Mode::View, Mode::Caret)],
    }
}

/// Generate default keybindings
pub fn default_bindings() -> Vec<Keybinding> {
    let global = Mode::Global;
    let edit = Mode::Edit;
    let view = Mode::View;

    vec![
        // ====================================================================
        // Global: Emacs motion
        // ====================================================================
        bind(global, "C-n", "next-line"),
        bind(global, "C-p", "previous-line"),
        bind(global, "C-f", "forward-char"),
        bind(global, "C-b", "backward-char"),
        bind(global, "C-a", "beginning-of-line"),
        bind(global, "C-e", "end-of-line"),
        bind(global, "C-v", "scroll-up"),
        bind(global, "M-v", "scroll-down"),
        bind(global, "M-<", "beginning-of-buffer").no_repeat(),
        bind(global, "M->", "end-of-buffer").no_repeat(),

        // ====================================================================
        // Edit mode
        // ====================================================================
        bind(edit, "C-d", "delete-char"),
        bind(edit, "C-h", "delete-backward-char"),
        bind(edit, "C-m", "newline"),
        bind(edit, "C-i", "indent"),

        // ====================================================================
        // View mode
        // ====================================================================
        bind(view, "j", "next-line"),
        bind(view, "k", "previous-line"),
        bind(view, "SPC", "scroll-up"),
        bind(view, "b", "scroll-down"),
        bind(view, "g g", "beginning-of-buffer").no_repeat(),
        bind(view, "G", "end-of-buffer").no_repeat(),
    ]
}
