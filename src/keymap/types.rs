//! Core types for the keymap system: KeyEvent, Modifiers, NamedKey, KeyToken
//!
//! A [`KeyEvent`] is what the host delivers; a [`KeyToken`] is the canonical
//! string form (`"a"`, `"SPC"`, `"<f1>"`, `"C-M-n"`) used as a map key
//! everywhere else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::KeymapError;

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    /// Check if ctrl is held
    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    /// Check if shift is held
    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    /// Check if alt/option is held
    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    /// Check if meta (cmd/win) is held
    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    /// Control-like: ctrl, or the command key on macOS hosts
    #[inline]
    pub const fn control_like(self) -> bool {
        self.ctrl() || self.meta()
    }

    /// Check if no modifiers are held
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Token prefix for these modifiers. Shift is never folded into a token.
    pub const fn token_prefix(self) -> &'static str {
        match (self.control_like(), self.alt()) {
            (true, true) => "C-M-",
            (false, true) => "M-",
            (true, false) => "C-",
            (false, false) => "",
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Non-printable keys the normalizer knows how to name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Escape,
    Return,
    Enter,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    PageUp,
    PageDown,
    Home,
    End,

    Tab,
    Backspace,
    PrintScreen,
    Insert,
    Delete,

    // Function keys
    F(u8), // F1-F24
}

impl NamedKey {
    /// Canonical token text, or `None` for keys outside the table (e.g. F25)
    pub fn token_name(self) -> Option<String> {
        let name = match self {
            NamedKey::Escape => "ESC",
            NamedKey::Return | NamedKey::Enter => "RET",
            NamedKey::Up => "<up>",
            NamedKey::Down => "<down>",
            NamedKey::Left => "<left>",
            NamedKey::Right => "<right>",
            NamedKey::PageUp => "<prior>",
            NamedKey::PageDown => "<next>",
            NamedKey::Home => "<home>",
            NamedKey::End => "<end>",
            NamedKey::Tab => "<tab>",
            NamedKey::Backspace => "<backspace>",
            NamedKey::PrintScreen => "<print>",
            NamedKey::Insert => "<insert>",
            NamedKey::Delete => "<delete>",
            NamedKey::F(n @ 1..=24) => return Some(format!("<f{}>", n)),
            NamedKey::F(_) => return None,
        };
        Some(name.to_string())
    }

    /// Inverse of [`NamedKey::token_name`]. `RET` maps back to `Return`.
    pub fn from_token_name(name: &str) -> Option<NamedKey> {
        let key = match name {
            "ESC" => NamedKey::Escape,
            "RET" => NamedKey::Return,
            "<up>" => NamedKey::Up,
            "<down>" => NamedKey::Down,
            "<left>" => NamedKey::Left,
            "<right>" => NamedKey::Right,
            "<prior>" => NamedKey::PageUp,
            "<next>" => NamedKey::PageDown,
            "<home>" => NamedKey::Home,
            "<end>" => NamedKey::End,
            "<tab>" => NamedKey::Tab,
            "<backspace>" => NamedKey::Backspace,
            "<print>" => NamedKey::PrintScreen,
            "<insert>" => NamedKey::Insert,
            "<delete>" => NamedKey::Delete,
            _ => {
                let n: u8 = name.strip_prefix("<f")?.strip_suffix('>')?.parse().ok()?;
                if !(1..=24).contains(&n) {
                    return None;
                }
                NamedKey::F(n)
            }
        };
        Some(key)
    }
}

/// A raw key press as delivered by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Character produced by the key, if any
    pub char_code: Option<char>,
    /// Named-key identifier, consulted when there is no printable character
    pub named: Option<NamedKey>,
    pub mods: Modifiers,
}

impl KeyEvent {
    /// Create a new key event
    pub const fn new(char_code: Option<char>, named: Option<NamedKey>, mods: Modifiers) -> Self {
        Self {
            char_code,
            named,
            mods,
        }
    }

    /// A character key with no modifiers
    pub const fn char(c: char) -> Self {
        Self::new(Some(c), None, Modifiers::NONE)
    }

    /// A character key with modifiers
    pub const fn char_with_mods(c: char, mods: Modifiers) -> Self {
        Self::new(Some(c), None, mods)
    }

    /// A named key with no modifiers
    pub const fn named(key: NamedKey) -> Self {
        Self::new(None, Some(key), Modifiers::NONE)
    }

    /// A named key with modifiers
    pub const fn named_with_mods(key: NamedKey, mods: Modifiers) -> Self {
        Self::new(None, Some(key), mods)
    }

    /// The character if it lies in printable ASCII (0x20..=0x7e)
    pub fn printable(&self) -> Option<char> {
        self.char_code.filter(|c| (' '..='~').contains(c))
    }

    /// True for the digit keys 0-9, whatever modifiers are held
    pub fn is_num(&self) -> bool {
        self.char_code.is_some_and(|c| c.is_ascii_digit())
    }

    /// Normalize this event into its canonical token
    ///
    /// Keys that are neither printable nor in the named table get an empty
    /// base, so the token can never match a parsed binding and the event
    /// falls through to default handling.
    pub fn to_token(&self) -> KeyToken {
        let base = match self.printable() {
            Some(' ') => "SPC".to_string(),
            Some(c) => c.to_string(),
            None => self
                .named
                .and_then(NamedKey::token_name)
                .unwrap_or_default(),
        };

        KeyToken(format!("{}{}", self.mods.token_prefix(), base))
    }

    /// Build the event a physical press of `token` would produce
    pub fn from_token(token: &KeyToken) -> Self {
        let (mods, base) = token.split_modifiers();

        if base == "SPC" {
            return Self::char_with_mods(' ', mods);
        }
        if let Some(named) = NamedKey::from_token_name(base) {
            return Self::named_with_mods(named, mods);
        }

        let mut chars = base.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::char_with_mods(c, mods),
            _ => Self::new(None, None, mods),
        }
    }
}

impl FromStr for KeyEvent {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyToken::parse(s).map(|token| KeyEvent::from_token(&token))
    }
}

/// Canonical string form of one keypress, e.g. `"C-x"`, `"SPC"`, `"<f3>"`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyToken(String);

impl KeyToken {
    /// Parse and validate a token against the fixed grammar:
    /// an optional `C-M-`, `M-` or `C-` prefix, then a printable non-space
    /// character, `SPC`, `ESC`, `RET` or a bracketed named key.
    pub fn parse(s: &str) -> Result<Self, KeymapError> {
        let token = KeyToken(s.to_string());
        let (_, base) = token.split_modifiers();

        let mut chars = base.chars();
        let valid = match (chars.next(), chars.next()) {
            (Some(c), None) => ('!'..='~').contains(&c),
            (Some(_), Some(_)) => base == "SPC" || NamedKey::from_token_name(base).is_some(),
            _ => false,
        };

        if valid {
            Ok(token)
        } else {
            Err(KeymapError::InvalidKey(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into modifiers and base key text
    ///
    /// `"C--"` is ctrl + `-`, `"C-M-x"` is ctrl + alt + `x`.
    pub fn split_modifiers(&self) -> (Modifiers, &str) {
        let s = self.0.as_str();
        if s.len() > 4 {
            if let Some(rest) = s.strip_prefix("C-M-") {
                return (Modifiers::CTRL | Modifiers::ALT, rest);
            }
        }
        if s.len() > 2 {
            if let Some(rest) = s.strip_prefix("M-") {
                return (Modifiers::ALT, rest);
            }
            if let Some(rest) = s.strip_prefix("C-") {
                return (Modifiers::CTRL, rest);
            }
        }
        (Modifiers::NONE, s)
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for KeyToken {
    type Error = KeymapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        KeyToken::parse(&value)
    }
}

impl From<KeyToken> for String {
    fn from(token: KeyToken) -> Self {
        token.0
    }
}

impl PartialEq<&str> for KeyToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Parse a space separated key sequence such as `"C-x C-f"`
pub fn parse_sequence(keys: &str) -> Result<Vec<KeyToken>, KeymapError> {
    let tokens = keys
        .split_whitespace()
        .map(KeyToken::parse)
        .collect::<Result<Vec<_>, _>>()?;

    if tokens.is_empty() {
        return Err(KeymapError::EmptySequence);
    }
    Ok(tokens)
}

/// Join a sequence for display in the status area: `"C-x C-f"`
pub fn display_sequence(keys: &[KeyToken]) -> String {
    keys.iter()
        .map(KeyToken::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_empty() {
        let mods = Modifiers::NONE;
        assert!(mods.is_empty());
        assert!(!mods.ctrl());
        assert!(!mods.shift());
        assert!(!mods.alt());
        assert!(!mods.meta());
    }

    #[test]
    fn test_modifiers_new() {
        let mods = Modifiers::new(true, false, true, false);
        assert!(mods.ctrl());
        assert!(!mods.shift());
        assert!(mods.alt());
        assert!(!mods.meta());
    }

    #[test]
    fn test_meta_is_control_like() {
        assert!(Modifiers::META.control_like());
        assert!(!Modifiers::ALT.control_like());
        assert_eq!(Modifiers::META.token_prefix(), "C-");
    }

    #[test]
    fn test_normalize_printable() {
        assert_eq!(KeyEvent::char('a').to_token(), "a");
        assert_eq!(KeyEvent::char('A').to_token(), "A");
        assert_eq!(KeyEvent::char(' ').to_token(), "SPC");
    }

    #[test]
    fn test_normalize_named_with_modifiers() {
        let esc = KeyEvent::named_with_mods(NamedKey::Escape, Modifiers::CTRL);
        assert_eq!(esc.to_token(), "C-ESC");

        let f3 = KeyEvent::named_with_mods(NamedKey::F(3), Modifiers::CTRL | Modifiers::ALT);
        assert_eq!(f3.to_token(), "C-M-<f3>");

        let next = KeyEvent::named_with_mods(NamedKey::PageDown, Modifiers::ALT);
        assert_eq!(next.to_token(), "M-<next>");
    }

    #[test]
    fn test_normalize_return_and_enter() {
        assert_eq!(KeyEvent::named(NamedKey::Return).to_token(), "RET");
        assert_eq!(KeyEvent::named(NamedKey::Enter).to_token(), "RET");
    }

    #[test]
    fn test_shift_not_folded() {
        let stroke = KeyEvent::char_with_mods('N', Modifiers::SHIFT | Modifiers::CTRL);
        assert_eq!(stroke.to_token(), "C-N");
    }

    #[test]
    fn test_unknown_key_keeps_prefix() {
        let unknown = KeyEvent::new(Some('\u{7f}'), None, Modifiers::CTRL);
        assert_eq!(unknown.to_token(), "C-");
        assert!(KeyToken::parse("C-").is_err());
    }

    #[test]
    fn test_is_num() {
        assert!(KeyEvent::char('0').is_num());
        assert!(KeyEvent::char_with_mods('9', Modifiers::CTRL).is_num());
        assert!(!KeyEvent::char('a').is_num());
        assert!(!KeyEvent::named(NamedKey::F(1)).is_num());
    }

    #[test]
    fn test_parse_valid_tokens() {
        for s in ["a", "C-x", "M--", "C-M--", "SPC", "C-SPC", "RET", "<f24>", "M-<left>", "-"] {
            assert!(KeyToken::parse(s).is_ok(), "{} should parse", s);
        }
    }

    #[test]
    fn test_parse_invalid_tokens() {
        for s in ["", "ab", "M-C-x", "<f25>", "<bogus>", "C-", "Ctrl+x", " "] {
            assert!(KeyToken::parse(s).is_err(), "{:?} should be rejected", s);
        }
    }

    #[test]
    fn test_from_token_inverts_normalize() {
        for s in ["a", "C-x", "M--", "C-M-n", "SPC", "RET", "<f12>", "C-<prior>", "C-9"] {
            let token = KeyToken::parse(s).unwrap();
            assert_eq!(KeyEvent::from_token(&token).to_token(), token);
        }
    }

    #[test]
    fn test_event_from_str() {
        let event: KeyEvent = "C-u".parse().unwrap();
        assert_eq!(event.char_code, Some('u'));
        assert!(event.mods.ctrl());
        assert!("C-".parse::<KeyEvent>().is_err());
    }

    #[test]
    fn test_parse_sequence() {
        let seq = parse_sequence("C-x  C-f").unwrap();
        assert_eq!(seq, vec![KeyToken::parse("C-x").unwrap(), KeyToken::parse("C-f").unwrap()]);
        assert!(matches!(parse_sequence("   "), Err(KeymapError::EmptySequence)));
        assert_eq!(display_sequence(&seq), "C-x C-f");
    }
}
