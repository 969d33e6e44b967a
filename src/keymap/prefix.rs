//! Numeric prefix arguments (`C-u`, `M--`, `C-<digit>` ...)
//!
//! The dispatcher collects the raw tokens typed after a starter key and
//! hands them to [`parse_prefix_argument`] once a non-argument key arrives.

use super::types::{KeyEvent, KeyToken};

/// The universal argument key
pub const UNIVERSAL_ARGUMENT: &str = "C-u";

const NEGATIVE_ARGUMENT: [&str; 3] = ["C--", "C-M--", "M--"];

/// Whether `token` (normalized from `event`) starts prefix-argument input
///
/// `M-<digit>` is deliberately not a starter, only control + digit is.
pub fn is_prefix_argument_key(token: &KeyToken, event: &KeyEvent) -> bool {
    let key = token.as_str();
    key == UNIVERSAL_ARGUMENT
        || NEGATIVE_ARGUMENT.contains(&key)
        || (event.mods.ctrl() && event.is_num())
}

/// Whether `token` keeps prefix-argument collection going
pub fn continues_prefix_argument(token: &KeyToken, event: &KeyEvent) -> bool {
    event.is_num() || token.as_str() == UNIVERSAL_ARGUMENT
}

fn digit_of(token: &KeyToken) -> Option<i64> {
    token
        .as_str()
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(i64::from)
}

/// Parse collected prefix-argument tokens into a signed integer
///
/// - `C-u` starts at 4 and every further `C-u` multiplies by 4. Anything
///   else after a `C-u` chain discards the multiplier, so only the trailing
///   digits count (`C-u C-u 4` is 4, not 64 or 16).
/// - `C--`, `C-M--` and `M--` negate whatever digits follow.
/// - Otherwise the first token's last character is the first digit.
///
/// Digits accumulate in typed order: `["C-9", "2"]` is 92. Tokens that carry
/// no digit are skipped. Returns `None` for an empty list.
pub fn parse_prefix_argument(keys: &[KeyToken]) -> Option<i64> {
    let (first, rest) = keys.split_first()?;

    let mut value: i64 = 0;
    let mut sign: i64 = 1;
    let mut digits = rest;

    match first.as_str() {
        UNIVERSAL_ARGUMENT => {
            let chain = rest
                .iter()
                .take_while(|k| k.as_str() == UNIVERSAL_ARGUMENT)
                .count();
            digits = &rest[chain..];
            if digits.is_empty() {
                value = 4i64.saturating_mul(4i64.saturating_pow(chain as u32));
            }
        }
        key if NEGATIVE_ARGUMENT.contains(&key) => sign = -1,
        _ => value = digit_of(first).unwrap_or(0),
    }

    for digit in digits.iter().filter_map(digit_of) {
        value = value.saturating_mul(10).saturating_add(digit);
    }

    Some(sign * value)
}
