//! Chord-to-command binding table.

use crate::chord::{Key, KeyChord, Modifiers};
use crate::error::KeymapError;
use findmark_core::{FindCommand, FindEngine, PreferenceStore, TextTree};
use std::collections::{BTreeMap, HashMap};

/// Maps key chords to [`FindCommand`]s.
///
/// A chord resolves to at most one command; a command may have several chords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<KeyChord, FindCommand>,
}

impl Default for Keymap {
    /// `Alt+F` opens, `Escape` closes, `Enter`/`F3` go forward and `Shift+Enter`/`Shift+F3`
    /// go back.
    fn default() -> Self {
        let mut keymap = Self::empty();
        keymap.bind(KeyChord::new(Modifiers::ALT, Key::Char('f')), FindCommand::Open);
        keymap.bind(KeyChord::plain(Key::Escape), FindCommand::Close);
        keymap.bind(KeyChord::plain(Key::Enter), FindCommand::NextMatch);
        keymap.bind(KeyChord::plain(Key::F(3)), FindCommand::NextMatch);
        keymap.bind(
            KeyChord::new(Modifiers::SHIFT, Key::Enter),
            FindCommand::PreviousMatch,
        );
        keymap.bind(
            KeyChord::new(Modifiers::SHIFT, Key::F(3)),
            FindCommand::PreviousMatch,
        );
        keymap
    }
}

impl Keymap {
    /// A keymap with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// The default bindings with the overrides from a JSON object applied.
    ///
    /// Keys are chords, values are command names (`"open"`, `"close"`, `"nextMatch"`,
    /// `"previousMatch"`) or `null` to remove a default binding:
    ///
    /// ```rust
    /// use findmark_core::FindCommand;
    /// use findmark_keymap::{KeyChord, Keymap};
    ///
    /// let keymap = Keymap::from_json(r#"{ "Ctrl+F": "open", "Alt+F": null }"#).unwrap();
    /// let ctrl_f: KeyChord = "Ctrl+F".parse().unwrap();
    /// assert_eq!(keymap.resolve(&ctrl_f), Some(FindCommand::Open));
    /// assert_eq!(keymap.resolve(&"Alt+F".parse().unwrap()), None);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, KeymapError> {
        let mut keymap = Self::default();
        keymap.apply_json(json)?;
        Ok(keymap)
    }

    /// Apply JSON overrides on top of the current bindings.
    ///
    /// Nothing is applied if any entry is invalid.
    pub fn apply_json(&mut self, json: &str) -> Result<(), KeymapError> {
        let table: BTreeMap<String, Option<String>> = serde_json::from_str(json)?;
        let mut parsed = Vec::with_capacity(table.len());
        for (chord, command) in &table {
            let chord: KeyChord = chord.parse()?;
            let command = command
                .as_deref()
                .map(|name| {
                    FindCommand::from_name(name)
                        .ok_or_else(|| KeymapError::UnknownCommand(name.to_string()))
                })
                .transpose()?;
            parsed.push((chord, command));
        }

        for (chord, command) in parsed {
            match command {
                Some(command) => self.bind(chord, command),
                None => {
                    self.unbind(&chord);
                }
            }
        }
        Ok(())
    }

    /// Serialize the bindings as a JSON object in canonical chord spelling.
    pub fn to_json(&self) -> Result<String, KeymapError> {
        let table: BTreeMap<&KeyChord, &FindCommand> = self.bindings.iter().collect();
        Ok(serde_json::to_string_pretty(&table)?)
    }

    /// Bind `chord` to `command`, replacing any previous binding of that chord.
    pub fn bind(&mut self, chord: KeyChord, command: FindCommand) {
        self.bindings.insert(chord, command);
    }

    /// Remove the binding of `chord`, returning the command it was bound to.
    pub fn unbind(&mut self, chord: &KeyChord) -> Option<FindCommand> {
        self.bindings.remove(chord)
    }

    /// The command bound to `chord`.
    pub fn resolve(&self, chord: &KeyChord) -> Option<FindCommand> {
        self.bindings.get(chord).copied()
    }

    /// Chords bound to `command`, sorted.
    pub fn chords_for(&self, command: FindCommand) -> Vec<KeyChord> {
        let mut chords: Vec<KeyChord> = self
            .bindings
            .iter()
            .filter(|(_, c)| **c == command)
            .map(|(chord, _)| *chord)
            .collect();
        chords.sort();
        chords
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Resolve `chord` and run the command against `engine`.
    ///
    /// Returns `true` if the chord was bound (the host should then swallow the key event).
    pub fn dispatch<S, T>(
        &self,
        engine: &mut FindEngine<S>,
        tree: &mut T,
        chord: &KeyChord,
    ) -> bool
    where
        S: PreferenceStore,
        T: TextTree + ?Sized,
    {
        match self.resolve(chord) {
            Some(command) => {
                engine.execute(tree, command);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keymap = Keymap::default();
        assert_eq!(keymap.len(), 6);
        assert_eq!(
            keymap.chords_for(FindCommand::PreviousMatch),
            vec![
                KeyChord::new(Modifiers::SHIFT, Key::F(3)),
                KeyChord::new(Modifiers::SHIFT, Key::Enter),
            ]
        );
    }

    #[test]
    fn test_invalid_override_applies_nothing() {
        let mut keymap = Keymap::default();
        let err = keymap
            .apply_json(r#"{ "Ctrl+G": "nextMatch", "F4": "jump" }"#)
            .unwrap_err();
        assert!(matches!(err, KeymapError::UnknownCommand(ref name) if name == "jump"));
        assert_eq!(keymap, Keymap::default());
    }
}
