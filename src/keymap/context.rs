//! Modes and the host context used to pick between them
//!
//! Every non-global mode owns its own keymap root; `global` is the fallback
//! consulted whenever the active mode's map has no entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::KeymapError;

/// Context in which a key sequence is interpreted
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Global,
    View,
    Edit,
    Caret,
    Menu,
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Global, Mode::View, Mode::Edit, Mode::Caret, Mode::Menu];

    /// Lowercase identifier used in keymap files
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Global => "global",
            Mode::View => "view",
            Mode::Edit => "edit",
            Mode::Caret => "caret",
            Mode::Menu => "menu",
        }
    }

    /// Heading used in binding reports
    pub const fn title(self) -> &'static str {
        match self {
            Mode::Global => "Global",
            Mode::View => "View mode",
            Mode::Edit => "Edit mode",
            Mode::Caret => "Caret mode",
            Mode::Menu => "Menu mode",
        }
    }

    /// Pick the mode for a fresh sequence
    ///
    /// A writable focus always means edit mode; otherwise caret browsing
    /// decides between caret and view. Menu mode is never selected here.
    pub fn for_context(ctx: &KeyContext) -> Mode {
        if ctx.writable {
            Mode::Edit
        } else if ctx.caret_browsing {
            Mode::Caret
        } else {
            Mode::View
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" => Ok(Mode::Global),
            "view" => Ok(Mode::View),
            "edit" => Ok(Mode::Edit),
            "caret" => Ok(Mode::Caret),
            "menu" => Ok(Mode::Menu),
            _ => Err(KeymapError::InvalidMode(s.to_string())),
        }
    }
}

/// Signals read from the host at the first stroke of every sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyContext {
    /// Whether the focused target accepts text input
    pub writable: bool,
    /// Whether the host is in caret browsing mode
    pub caret_browsing: bool,
}
