//! Key chords.
//!
//! A chord is written as modifiers and a key joined by `+`, e.g. `Shift+F3` or `Ctrl+Alt+f`.
//! Parsing is case-insensitive; [`Display`](fmt::Display) produces the canonical form
//! (`Ctrl`, `Alt`, `Shift`, `Meta` in that order, letters uppercase).

use crate::error::KeymapError;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// A non-modifier key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// A printable character, stored lowercase.
    Char(char),
    /// Function key `F1`..=`F24`.
    F(u8),
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
}

/// Modifier keys held with a chord.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modifiers {
    /// Control.
    pub ctrl: bool,
    /// Alt / Option.
    pub alt: bool,
    /// Shift.
    pub shift: bool,
    /// Meta / Command / Super.
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Shift only.
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    /// Alt only.
    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };

    /// Ctrl only.
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
}

/// A key plus the modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyChord {
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// The key.
    pub key: Key,
}

impl KeyChord {
    /// Create a chord.
    pub fn new(modifiers: Modifiers, key: Key) -> Self {
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self { modifiers, key }
    }

    /// A chord without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(Modifiers::NONE, key)
    }
}

fn parse_key(chord: &str, token: &str) -> Result<Key, KeymapError> {
    let lower = token.to_ascii_lowercase();
    let key = match lower.as_str() {
        "enter" | "return" => Key::Enter,
        "escape" | "esc" => Key::Escape,
        "tab" => Key::Tab,
        "backspace" => Key::Backspace,
        "space" => Key::Char(' '),
        "plus" => Key::Char('+'),
        _ => {
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                (Some('f'), Some(_)) => {
                    let unknown = || KeymapError::chord(chord, format!("unknown key '{token}'"));
                    let n: u8 = lower[1..].parse().map_err(|_| unknown())?;
                    if !(1..=24).contains(&n) {
                        return Err(KeymapError::chord(chord, format!("no function key F{n}")));
                    }
                    Key::F(n)
                }
                _ => {
                    return Err(KeymapError::chord(chord, format!("unknown key '{token}'")));
                }
            }
        }
    };
    Ok(key)
}

impl FromStr for KeyChord {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split('+').map(str::trim).collect();
        let Some((key_token, modifier_tokens)) = tokens.split_last() else {
            return Err(KeymapError::chord(s, "empty chord"));
        };
        if key_token.is_empty() {
            return Err(KeymapError::chord(s, "missing key"));
        }

        let mut modifiers = Modifiers::NONE;
        for token in modifier_tokens {
            let slot = match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => &mut modifiers.ctrl,
                "alt" | "option" => &mut modifiers.alt,
                "shift" => &mut modifiers.shift,
                "meta" | "cmd" | "super" => &mut modifiers.meta,
                "" => return Err(KeymapError::chord(s, "empty modifier")),
                other => {
                    return Err(KeymapError::chord(s, format!("unknown modifier '{other}'")));
                }
            };
            if *slot {
                return Err(KeymapError::chord(s, format!("modifier '{token}' repeated")));
            }
            *slot = true;
        }

        Ok(KeyChord::new(modifiers, parse_key(s, key_token)?))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => write!(f, "Space"),
            Key::Char('+') => write!(f, "Plus"),
            Key::Char(c) => write!(f, "{}", c.to_uppercase()),
            Key::F(n) => write!(f, "F{n}"),
            Key::Enter => write!(f, "Enter"),
            Key::Escape => write!(f, "Escape"),
            Key::Tab => write!(f, "Tab"),
            Key::Backspace => write!(f, "Backspace"),
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, name) in [
            (m.ctrl, "Ctrl"),
            (m.alt, "Alt"),
            (m.shift, "Shift"),
            (m.meta, "Meta"),
        ] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

impl Serialize for KeyChord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyChord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
