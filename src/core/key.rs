//! Key events, normalized key ids, and key patterns.
//!
//! Every key that reaches a component is reduced to a single normalized id
//! string. Binding patterns are parsed into the same form, so matching is plain
//! string equality.
//!
//! Normalization rules:
//! - modifiers are emitted in the fixed order `ctrl+alt+shift`;
//! - named keys are lower-case (`enter`, `escape`, `pageup`, `f5`);
//! - without ctrl/alt a shifted letter folds into its upper-case form (`A`);
//! - with ctrl/alt a letter stays lower-case and keeps an explicit `shift`;
//! - shift on any other character is dropped (`!`, not `shift+1`).

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::KeyPatternError;

const MOD_SHIFT: u8 = 1;
const MOD_ALT: u8 = 2;
const MOD_CTRL: u8 = 4;

const CODEPOINT_ESCAPE: u32 = 27;
const CODEPOINT_TAB: u32 = 9;
const CODEPOINT_ENTER: u32 = 13;
const CODEPOINT_SPACE: u32 = 32;
const CODEPOINT_BACKSPACE: u32 = 127;
const CODEPOINT_KP_ENTER: u32 = 57414;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Space,
    Enter,
    Tab,
    Escape,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    F(u8),
}

impl KeyCode {
    fn name(self) -> Option<&'static str> {
        Some(match self {
            KeyCode::Space => "space",
            KeyCode::Enter => "enter",
            KeyCode::Tab => "tab",
            KeyCode::Escape => "escape",
            KeyCode::Backspace => "backspace",
            KeyCode::Delete => "delete",
            KeyCode::Insert => "insert",
            KeyCode::Home => "home",
            KeyCode::End => "end",
            KeyCode::PageUp => "pageup",
            KeyCode::PageDown => "pagedown",
            KeyCode::Up => "up",
            KeyCode::Down => "down",
            KeyCode::Left => "left",
            KeyCode::Right => "right",
            KeyCode::Char(_) | KeyCode::F(_) => return None,
        })
    }
}

static NAMED_KEYS: Lazy<HashMap<&'static str, KeyCode>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (name, code) in [
        ("space", KeyCode::Space),
        ("enter", KeyCode::Enter),
        ("return", KeyCode::Enter),
        ("tab", KeyCode::Tab),
        ("escape", KeyCode::Escape),
        ("esc", KeyCode::Escape),
        ("backspace", KeyCode::Backspace),
        ("delete", KeyCode::Delete),
        ("del", KeyCode::Delete),
        ("insert", KeyCode::Insert),
        ("ins", KeyCode::Insert),
        ("home", KeyCode::Home),
        ("end", KeyCode::End),
        ("pageup", KeyCode::PageUp),
        ("pgup", KeyCode::PageUp),
        ("pagedown", KeyCode::PageDown),
        ("pgdown", KeyCode::PageDown),
        ("pgdn", KeyCode::PageDown),
        ("up", KeyCode::Up),
        ("down", KeyCode::Down),
        ("left", KeyCode::Left),
        ("right", KeyCode::Right),
    ] {
        map.insert(name, code);
    }
    map
});

/// A single key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        let code = match code {
            KeyCode::Char(' ') => KeyCode::Space,
            other => other,
        };
        Self {
            code,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub fn char(ch: char) -> Self {
        Self::new(KeyCode::Char(ch))
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// `true` when `code` matches and no modifier is held.
    pub fn is(&self, code: KeyCode) -> bool {
        self.code == code && !self.ctrl && !self.alt && !self.shift
    }

    /// Printable text this key inserts into an editable widget, if any.
    pub fn text(&self) -> Option<char> {
        if self.ctrl || self.alt {
            return None;
        }
        match self.code {
            KeyCode::Space => Some(' '),
            KeyCode::Char(ch) if !ch.is_control() => {
                if self.shift && ch.is_ascii_lowercase() {
                    Some(ch.to_ascii_uppercase())
                } else {
                    Some(ch)
                }
            }
            _ => None,
        }
    }

    /// The normalized id this key is matched by.
    pub fn key_id(&self) -> String {
        let (key, shift) = match self.code {
            KeyCode::Char(ch) if ch.is_alphabetic() => {
                let upper = ch.is_uppercase();
                if self.ctrl || self.alt {
                    (ch.to_lowercase().collect::<String>(), self.shift || upper)
                } else if self.shift || upper {
                    (ch.to_uppercase().collect::<String>(), false)
                } else {
                    (ch.to_string(), false)
                }
            }
            KeyCode::Char(ch) => (ch.to_string(), false),
            KeyCode::F(n) => (format!("f{n}"), self.shift),
            named => (named.name().unwrap_or_default().to_string(), self.shift),
        };

        let mut id = String::new();
        if self.ctrl {
            id.push_str("ctrl+");
        }
        if self.alt {
            id.push_str("alt+");
        }
        if shift {
            id.push_str("shift+");
        }
        id.push_str(&key);
        id
    }

    /// Decode one terminal key sequence (legacy, xterm-modified or kitty CSI-u).
    pub fn from_raw(data: &str) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        if let Some(key) = parse_kitty_sequence(data) {
            return Some(key);
        }
        if let Some(key) = legacy_sequence(data) {
            return Some(key);
        }
        if let Some(key) = modified_csi_sequence(data) {
            return Some(key);
        }

        let mut chars = data.chars();
        let first = chars.next()?;
        let rest = chars.as_str();

        if first == '\x1b' && !rest.is_empty() {
            let mut inner = KeyEvent::from_raw(rest)?;
            if inner.alt {
                return None;
            }
            inner.alt = true;
            return Some(inner);
        }

        if !rest.is_empty() {
            return None;
        }
        control_char(first).or_else(|| {
            if first.is_control() {
                None
            } else {
                Some(KeyEvent::char(first))
            }
        })
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key_id())
    }
}

fn control_char(ch: char) -> Option<KeyEvent> {
    let key = match ch {
        '\x1b' => KeyEvent::new(KeyCode::Escape),
        '\t' => KeyEvent::new(KeyCode::Tab),
        '\r' | '\n' => KeyEvent::new(KeyCode::Enter),
        '\x7f' | '\x08' => KeyEvent::new(KeyCode::Backspace),
        '\x00' => KeyEvent::new(KeyCode::Space).with_ctrl(),
        '\x1c' => KeyEvent::char('\\').with_ctrl(),
        '\x1d' => KeyEvent::char(']').with_ctrl(),
        '\x1f' => KeyEvent::char('-').with_ctrl(),
        '\x01'..='\x1a' => {
            let letter = char::from(ch as u8 + 96);
            KeyEvent::char(letter).with_ctrl()
        }
        _ => return None,
    };
    Some(key)
}

fn legacy_sequence(data: &str) -> Option<KeyEvent> {
    let code = match data {
        "\x1b[A" | "\x1bOA" => KeyCode::Up,
        "\x1b[B" | "\x1bOB" => KeyCode::Down,
        "\x1b[C" | "\x1bOC" => KeyCode::Right,
        "\x1b[D" | "\x1bOD" => KeyCode::Left,
        "\x1b[H" | "\x1bOH" | "\x1b[1~" | "\x1b[7~" => KeyCode::Home,
        "\x1b[F" | "\x1bOF" | "\x1b[4~" | "\x1b[8~" => KeyCode::End,
        "\x1b[2~" => KeyCode::Insert,
        "\x1b[3~" => KeyCode::Delete,
        "\x1b[5~" => KeyCode::PageUp,
        "\x1b[6~" => KeyCode::PageDown,
        "\x1bOM" => KeyCode::Enter,
        "\x1bOP" => KeyCode::F(1),
        "\x1bOQ" => KeyCode::F(2),
        "\x1bOR" => KeyCode::F(3),
        "\x1bOS" => KeyCode::F(4),
        "\x1b[15~" => KeyCode::F(5),
        "\x1b[17~" => KeyCode::F(6),
        "\x1b[18~" => KeyCode::F(7),
        "\x1b[19~" => KeyCode::F(8),
        "\x1b[20~" => KeyCode::F(9),
        "\x1b[21~" => KeyCode::F(10),
        "\x1b[23~" => KeyCode::F(11),
        "\x1b[24~" => KeyCode::F(12),
        "\x1b[Z" => return Some(KeyEvent::new(KeyCode::Tab).with_shift()),
        _ => return None,
    };
    Some(KeyEvent::new(code))
}

/// `ESC [ 1 ; <mod> <letter>` and `ESC [ <n> ; <mod> ~`.
fn modified_csi_sequence(data: &str) -> Option<KeyEvent> {
    let body = data.strip_prefix("\x1b[")?;
    let split = body.len().checked_sub(1)?;
    if !body.is_char_boundary(split) {
        return None;
    }
    let (params, terminator) = body.split_at(split);
    let (number, modifier) = params.split_once(';')?;
    let modifier = modifier.parse::<u8>().ok()?.checked_sub(1)?;

    let code = match (number, terminator) {
        ("1", "A") => KeyCode::Up,
        ("1", "B") => KeyCode::Down,
        ("1", "C") => KeyCode::Right,
        ("1", "D") => KeyCode::Left,
        ("1", "H") => KeyCode::Home,
        ("1", "F") => KeyCode::End,
        ("2", "~") => KeyCode::Insert,
        ("3", "~") => KeyCode::Delete,
        ("5", "~") => KeyCode::PageUp,
        ("6", "~") => KeyCode::PageDown,
        _ => return None,
    };
    Some(apply_modifier_bits(KeyEvent::new(code), modifier))
}

/// Kitty keyboard protocol: `ESC [ <codepoint>[:...] [; <mod>[:event]] u`.
fn parse_kitty_sequence(data: &str) -> Option<KeyEvent> {
    let body = data.strip_prefix("\x1b[")?.strip_suffix('u')?;
    let (code_part, mod_part) = match body.split_once(';') {
        Some((left, right)) => (left, Some(right)),
        None => (body, None),
    };
    let codepoint = code_part.split(':').next()?.parse::<u32>().ok()?;
    let modifier = match mod_part {
        Some(part) => part
            .split(':')
            .next()?
            .parse::<u8>()
            .ok()?
            .checked_sub(1)?,
        None => 0,
    };

    let key = match codepoint {
        CODEPOINT_ESCAPE => KeyEvent::new(KeyCode::Escape),
        CODEPOINT_TAB => KeyEvent::new(KeyCode::Tab),
        CODEPOINT_ENTER | CODEPOINT_KP_ENTER => KeyEvent::new(KeyCode::Enter),
        CODEPOINT_SPACE => KeyEvent::new(KeyCode::Space),
        CODEPOINT_BACKSPACE => KeyEvent::new(KeyCode::Backspace),
        cp => KeyEvent::char(char::from_u32(cp).filter(|ch| !ch.is_control())?),
    };
    Some(apply_modifier_bits(key, modifier))
}

fn apply_modifier_bits(mut key: KeyEvent, modifier: u8) -> KeyEvent {
    key.shift = modifier & MOD_SHIFT != 0;
    key.alt = modifier & MOD_ALT != 0;
    key.ctrl = modifier & MOD_CTRL != 0;
    key
}

/// A parsed, normalized binding chord such as `ctrl+s` or `shift+tab`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPattern {
    id: String,
}

impl KeyPattern {
    pub fn parse(pattern: &str) -> Result<Self, KeyPatternError> {
        if pattern.is_empty() {
            return Err(KeyPatternError::Empty);
        }
        // A lone space is the space key, not an empty pattern.
        let trimmed = if pattern.trim().is_empty() {
            pattern
        } else {
            pattern.trim()
        };

        let (mods_part, key_part) = if trimmed == "+" {
            ("", "+")
        } else if let Some(prefix) = trimmed.strip_suffix("++") {
            (prefix, "+")
        } else {
            match trimmed.rsplit_once('+') {
                Some((mods, key)) => (mods, key),
                None => ("", trimmed),
            }
        };

        if key_part.is_empty() {
            return Err(KeyPatternError::MissingKey {
                pattern: pattern.to_string(),
            });
        }

        let mut key = KeyEvent::new(parse_key_name(pattern, key_part)?);
        if !mods_part.is_empty() {
            for modifier in mods_part.split('+') {
                match modifier.to_ascii_lowercase().as_str() {
                    "ctrl" | "control" => key.ctrl = true,
                    "alt" | "meta" | "option" => key.alt = true,
                    "shift" => key.shift = true,
                    _ => {
                        return Err(KeyPatternError::UnknownModifier {
                            pattern: pattern.to_string(),
                            modifier: modifier.to_string(),
                        })
                    }
                }
            }
        }

        // Letter case carries no meaning next to ctrl/alt; `ctrl+S` is `ctrl+s`.
        if key.ctrl || key.alt {
            if let KeyCode::Char(ch) = key.code {
                key.code = KeyCode::Char(ch.to_lowercase().next().unwrap_or(ch));
            }
        }

        Ok(Self { id: key.key_id() })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.id == key.key_id()
    }
}

impl FromStr for KeyPattern {
    type Err = KeyPatternError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

fn parse_key_name(pattern: &str, name: &str) -> Result<KeyCode, KeyPatternError> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(ch));
    }

    let lowered = name.to_ascii_lowercase();
    if let Some(code) = NAMED_KEYS.get(lowered.as_str()) {
        return Ok(*code);
    }
    if let Some(number) = lowered.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=24).contains(&number) {
            return Ok(KeyCode::F(number));
        }
    }

    Err(KeyPatternError::UnknownKey {
        pattern: pattern.to_string(),
        key: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{KeyCode, KeyEvent, KeyPattern};
    use crate::error::KeyPatternError;

    #[test]
    fn key_ids_use_canonical_modifier_order() {
        let key = KeyEvent::new(KeyCode::Up).with_shift().with_alt().with_ctrl();
        assert_eq!(key.key_id(), "ctrl+alt+shift+up");
        assert_eq!(KeyEvent::char('c').with_ctrl().key_id(), "ctrl+c");
        assert_eq!(KeyEvent::new(KeyCode::Tab).with_shift().key_id(), "shift+tab");
    }

    #[test]
    fn shifted_letters_fold_without_ctrl() {
        assert_eq!(KeyEvent::char('a').with_shift().key_id(), "A");
        assert_eq!(KeyEvent::char('A').key_id(), "A");
        assert_eq!(KeyEvent::char('A').with_ctrl().key_id(), "ctrl+shift+a");
        assert_eq!(KeyEvent::char('!').with_shift().key_id(), "!");
    }

    #[test]
    fn char_space_is_space_key() {
        assert_eq!(KeyEvent::char(' ').code, KeyCode::Space);
        assert_eq!(KeyEvent::char(' ').text(), Some(' '));
    }

    #[test]
    fn patterns_normalize_aliases_and_order() {
        let cases = [
            ("Ctrl+S", "ctrl+s"),
            ("shift+ctrl+Up", "ctrl+shift+up"),
            ("esc", "escape"),
            ("return", "enter"),
            ("pgdn", "pagedown"),
            ("shift+a", "A"),
            ("ctrl++", "ctrl++"),
            ("+", "+"),
            (" ", "space"),
            ("F5", "f5"),
            ("meta+x", "alt+x"),
        ];
        for (pattern, expected) in cases {
            let parsed = KeyPattern::parse(pattern).expect("pattern parses");
            assert_eq!(parsed.id(), expected, "pattern {pattern:?}");
        }
    }

    #[test]
    fn malformed_patterns_are_errors() {
        assert_eq!(KeyPattern::parse(""), Err(KeyPatternError::Empty));
        assert!(matches!(
            KeyPattern::parse("ctrl+"),
            Err(KeyPatternError::MissingKey { .. })
        ));
        assert!(matches!(
            KeyPattern::parse("hyper+a"),
            Err(KeyPatternError::UnknownModifier { .. })
        ));
        assert!(matches!(
            KeyPattern::parse("launch"),
            Err(KeyPatternError::UnknownKey { .. })
        ));
    }

    #[test]
    fn raw_sequences_decode() {
        let cases = [
            ("\r", "enter"),
            ("\x1b", "escape"),
            ("\t", "tab"),
            ("\x1b[Z", "shift+tab"),
            ("\x03", "ctrl+c"),
            ("\x7f", "backspace"),
            ("\x1b[A", "up"),
            ("\x1b[1;5C", "ctrl+right"),
            ("\x1b[3;2~", "shift+delete"),
            ("\x1bb", "alt+b"),
            ("\x1b\r", "alt+enter"),
            ("\x1b[99;5u", "ctrl+c"),
            ("\x1b[13;2u", "shift+enter"),
            ("q", "q"),
            ("Q", "Q"),
            ("é", "é"),
        ];
        for (raw, expected) in cases {
            let key = KeyEvent::from_raw(raw).expect("sequence decodes");
            assert_eq!(key.key_id(), expected, "raw {raw:?}");
        }
        assert_eq!(KeyEvent::from_raw("ab"), None);
        assert_eq!(KeyEvent::from_raw("\x1b\x1b\x1b"), None);
    }

    #[test]
    fn pattern_matches_decoded_key() {
        let pattern = KeyPattern::parse("ctrl+left").expect("pattern parses");
        let key = KeyEvent::from_raw("\x1b[1;5D").expect("sequence decodes");
        assert!(pattern.matches(&key));
        assert!(!pattern.matches(&KeyEvent::new(KeyCode::Left)));
    }
}
