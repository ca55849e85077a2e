//! The engine's command surface.
//!
//! Key bindings are a host concern; whatever chord the host maps, it ends up as one of the
//! four [`FindCommand`]s.
//!
//! ```rust
//! use findmark_core::{Document, FindCommand, FindEngine, MemoryPreferences, PreferenceStore};
//! use findmark_core::TextTree;
//!
//! let mut doc = Document::default();
//! let p = doc.append_element(doc.root(), "p").unwrap();
//! doc.append_text(p, "one two one").unwrap();
//!
//! let mut store = MemoryPreferences::default();
//! store.set_query("one");
//! let mut engine = FindEngine::new(store);
//!
//! engine.execute(&mut doc, FindCommand::Open);
//! engine.run_deferred(&mut doc);
//! assert_eq!(engine.status().label(), "1/2");
//!
//! engine.execute(&mut doc, FindCommand::NextMatch);
//! assert_eq!(engine.status().label(), "2/2");
//!
//! engine.execute(&mut doc, FindCommand::Close);
//! assert_eq!(doc.text_content(doc.root()), "one two one");
//! ```

use crate::engine::FindEngine;
use crate::preferences::PreferenceStore;
use crate::tree::TextTree;
use serde::{Deserialize, Serialize};

/// A user-level engine command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FindCommand {
    /// Show the widget and search.
    Open,
    /// Hide the widget and remove all marks.
    Close,
    /// Step to the next match.
    NextMatch,
    /// Step to the previous match.
    PreviousMatch,
}

impl FindCommand {
    /// Every command, in a stable order.
    pub const ALL: [FindCommand; 4] = [
        FindCommand::Open,
        FindCommand::Close,
        FindCommand::NextMatch,
        FindCommand::PreviousMatch,
    ];

    /// Stable identifier, as used in serialized keymaps.
    pub fn name(&self) -> &'static str {
        match self {
            FindCommand::Open => "open",
            FindCommand::Close => "close",
            FindCommand::NextMatch => "nextMatch",
            FindCommand::PreviousMatch => "previousMatch",
        }
    }

    /// Inverse of [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl<S: PreferenceStore> FindEngine<S> {
    /// Execute a command against `tree`.
    pub fn execute<T: TextTree + ?Sized>(&mut self, tree: &mut T, command: FindCommand) {
        match command {
            FindCommand::Open => self.open(tree),
            FindCommand::Close => self.close(tree),
            FindCommand::NextMatch => self.next(tree),
            FindCommand::PreviousMatch => self.previous(tree),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for command in FindCommand::ALL {
            assert_eq!(FindCommand::from_name(command.name()), Some(command));
            let json = serde_json::to_string(&command).unwrap();
            assert_eq!(json, format!("\"{}\"", command.name()));
        }
        assert_eq!(FindCommand::from_name("toggle"), None);
    }
}
