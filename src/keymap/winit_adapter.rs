//! Adapter to convert winit key events to our KeyEvent type

use winit::keyboard::{Key, KeyCode as WinitKeyCode, NamedKey as WinitNamedKey, PhysicalKey};

use super::types::{KeyEvent, Modifiers, NamedKey};

fn named_from_winit(named: &WinitNamedKey) -> Option<NamedKey> {
    let key = match named {
        WinitNamedKey::Enter => NamedKey::Return,
        WinitNamedKey::Escape => NamedKey::Escape,
        WinitNamedKey::Tab => NamedKey::Tab,
        WinitNamedKey::Backspace => NamedKey::Backspace,
        WinitNamedKey::Delete => NamedKey::Delete,
        WinitNamedKey::Insert => NamedKey::Insert,
        WinitNamedKey::PrintScreen => NamedKey::PrintScreen,

        // Arrows
        WinitNamedKey::ArrowUp => NamedKey::Up,
        WinitNamedKey::ArrowDown => NamedKey::Down,
        WinitNamedKey::ArrowLeft => NamedKey::Left,
        WinitNamedKey::ArrowRight => NamedKey::Right,

        // Navigation
        WinitNamedKey::Home => NamedKey::Home,
        WinitNamedKey::End => NamedKey::End,
        WinitNamedKey::PageUp => NamedKey::PageUp,
        WinitNamedKey::PageDown => NamedKey::PageDown,

        // Function keys
        WinitNamedKey::F1 => NamedKey::F(1),
        WinitNamedKey::F2 => NamedKey::F(2),
        WinitNamedKey::F3 => NamedKey::F(3),
        WinitNamedKey::F4 => NamedKey::F(4),
        WinitNamedKey::F5 => NamedKey::F(5),
        WinitNamedKey::F6 => NamedKey::F(6),
        WinitNamedKey::F7 => NamedKey::F(7),
        WinitNamedKey::F8 => NamedKey::F(8),
        WinitNamedKey::F9 => NamedKey::F(9),
        WinitNamedKey::F10 => NamedKey::F(10),
        WinitNamedKey::F11 => NamedKey::F(11),
        WinitNamedKey::F12 => NamedKey::F(12),
        WinitNamedKey::F13 => NamedKey::F(13),
        WinitNamedKey::F14 => NamedKey::F(14),
        WinitNamedKey::F15 => NamedKey::F(15),
        WinitNamedKey::F16 => NamedKey::F(16),
        WinitNamedKey::F17 => NamedKey::F(17),
        WinitNamedKey::F18 => NamedKey::F(18),
        WinitNamedKey::F19 => NamedKey::F(19),
        WinitNamedKey::F20 => NamedKey::F(20),
        WinitNamedKey::F21 => NamedKey::F(21),
        WinitNamedKey::F22 => NamedKey::F(22),
        WinitNamedKey::F23 => NamedKey::F(23),
        WinitNamedKey::F24 => NamedKey::F(24),

        _ => return None,
    };
    Some(key)
}

/// Keypad keys whose logical key did not map
fn numpad_from_physical(physical_key: PhysicalKey) -> Option<(Option<char>, Option<NamedKey>)> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };
    let c = match code {
        WinitKeyCode::Numpad0 => '0',
        WinitKeyCode::Numpad1 => '1',
        WinitKeyCode::Numpad2 => '2',
        WinitKeyCode::Numpad3 => '3',
        WinitKeyCode::Numpad4 => '4',
        WinitKeyCode::Numpad5 => '5',
        WinitKeyCode::Numpad6 => '6',
        WinitKeyCode::Numpad7 => '7',
        WinitKeyCode::Numpad8 => '8',
        WinitKeyCode::Numpad9 => '9',
        WinitKeyCode::NumpadAdd => '+',
        WinitKeyCode::NumpadSubtract => '-',
        WinitKeyCode::NumpadMultiply => '*',
        WinitKeyCode::NumpadDivide => '/',
        WinitKeyCode::NumpadDecimal => '.',
        WinitKeyCode::NumpadEnter => return Some((None, Some(NamedKey::Return))),
        _ => return None,
    };
    Some((Some(c), None))
}

/// Convert winit key event data to a raw [`KeyEvent`]
///
/// Characters keep their case, since `N` and `n` are different tokens.
/// Returns None for keys that produce neither a character nor a known named
/// key (bare modifier presses, dead keys).
pub fn key_event_from_winit(
    logical_key: &Key,
    physical_key: PhysicalKey,
    ctrl: bool,
    shift: bool,
    alt: bool,
    logo: bool, // logo = meta = cmd on macOS
) -> Option<KeyEvent> {
    let mods = Modifiers::new(ctrl, shift, alt, logo);

    let mapped = match logical_key {
        Key::Named(WinitNamedKey::Space) => Some((Some(' '), None)),
        Key::Named(named) => named_from_winit(named).map(|key| (None, Some(key))),
        Key::Character(s) => s.chars().next().map(|c| (Some(c), None)),
        _ => None,
    };

    let (char_code, named) = mapped.or_else(|| numpad_from_physical(physical_key))?;
    Some(KeyEvent::new(char_code, named, mods))
}
