//! Keybinding struct representing a mapping from keystroke(s) to command

use super::config::KeymapError;
use super::context::Mode;
use super::types::{display_sequence, KeyToken};

/// The three shapes a bind request can take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
    /// One token bound directly as a leaf
    Single(KeyToken),
    /// One multi-token sequence
    Sequence(Vec<KeyToken>),
    /// Several sequences sharing the same command
    Multi(Vec<Vec<KeyToken>>),
}

impl KeySpec {
    /// Every sequence this request binds
    pub fn sequences(&self) -> Vec<&[KeyToken]> {
        match self {
            KeySpec::Single(token) => vec![std::slice::from_ref(token)],
            KeySpec::Sequence(keys) => vec![keys.as_slice()],
            KeySpec::Multi(all) => all.iter().map(Vec::as_slice).collect(),
        }
    }

    /// Reject empty sequences (and an empty multi-bind)
    pub fn validate(&self) -> Result<(), KeymapError> {
        let sequences = self.sequences();
        if sequences.is_empty() || sequences.iter().any(|keys| keys.is_empty()) {
            return Err(KeymapError::EmptySequence);
        }
        Ok(())
    }

    /// Check if this binds at least one multi-token sequence
    pub fn is_chord(&self) -> bool {
        self.sequences().iter().any(|keys| keys.len() > 1)
    }

    /// `"C-x k, C-x C-k"`
    pub fn display_string(&self) -> String {
        self.sequences()
            .into_iter()
            .map(display_sequence)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<KeyToken> for KeySpec {
    fn from(token: KeyToken) -> Self {
        KeySpec::Single(token)
    }
}

impl From<Vec<KeyToken>> for KeySpec {
    fn from(keys: Vec<KeyToken>) -> Self {
        KeySpec::Sequence(keys)
    }
}

impl From<Vec<Vec<KeyToken>>> for KeySpec {
    fn from(all: Vec<Vec<KeyToken>>) -> Self {
        KeySpec::Multi(all)
    }
}

/// A parsed binding that still refers to its command by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub mode: Mode,
    pub keys: KeySpec,
    /// Name looked up in a `CommandTable` at install time
    pub command: String,
    /// Overrides the command's own description
    pub description: Option<String>,
    pub no_repeat: bool,
}

impl Keybinding {
    pub fn new(mode: Mode, keys: impl Into<KeySpec>, command: impl Into<String>) -> Self {
        Self {
            mode,
            keys: keys.into(),
            command: command.into(),
            description: None,
            no_repeat: false,
        }
    }

    /// Set the description shown in help (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Prevent prefix-argument repetition (builder pattern)
    pub fn no_repeat(mut self) -> Self {
        self.no_repeat = true;
        self
    }

    /// Whether `other` targets the same mode and keys
    pub fn same_keys(&self, other: &Keybinding) -> bool {
        self.mode == other.mode && self.keys == other.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::parse_sequence;

    fn token(s: &str) -> KeyToken {
        KeyToken::parse(s).unwrap()
    }

    #[test]
    fn test_single_binding() {
        let spec = KeySpec::from(token("C-s"));
        assert!(!spec.is_chord());
        assert_eq!(spec.sequences(), vec![&[token("C-s")][..]]);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_chord_binding() {
        let spec = KeySpec::from(parse_sequence("C-x C-s").unwrap());
        assert!(spec.is_chord());
        assert_eq!(spec.display_string(), "C-x C-s");
    }

    #[test]
    fn test_multi_display() {
        let spec = KeySpec::from(vec![
            parse_sequence("C-x k").unwrap(),
            parse_sequence("C-x C-k").unwrap(),
        ]);
        assert_eq!(spec.display_string(), "C-x k, C-x C-k");
    }

    #[test]
    fn test_empty_specs_invalid() {
        assert!(KeySpec::Sequence(vec![]).validate().is_err());
        assert!(KeySpec::Multi(vec![]).validate().is_err());
        assert!(KeySpec::Multi(vec![vec![token("a")], vec![]])
            .validate()
            .is_err());
    }

    #[test]
    fn test_same_keys() {
        let a = Keybinding::new(Mode::Edit, token("C-d"), "delete-char");
        let b = Keybinding::new(Mode::Edit, token("C-d"), "other").no_repeat();
        let c = Keybinding::new(Mode::View, token("C-d"), "delete-char");
        assert!(a.same_keys(&b));
        assert!(!a.same_keys(&c));
    }
}
