#![warn(missing_docs)]
//! findmark Keymap - Key Chord Bindings
//!
//! Maps key chords to the four [`FindCommand`](findmark_core::FindCommand)s of
//! `findmark-core`. Hosts translate their native key events into a [`KeyChord`], then
//! [`Keymap::dispatch`] resolves and runs the bound command.
//!
//! ```rust
//! use findmark_core::{Document, FindEngine, MemoryPreferences, PreferenceStore, TextTree};
//! use findmark_keymap::{KeyChord, Keymap};
//!
//! let mut doc = Document::default();
//! let p = doc.append_element(doc.root(), "p").unwrap();
//! doc.append_text(p, "needle haystack needle").unwrap();
//!
//! let mut store = MemoryPreferences::default();
//! store.set_query("needle");
//! let mut engine = FindEngine::new(store);
//! let keymap = Keymap::default();
//!
//! let alt_f: KeyChord = "Alt+F".parse().unwrap();
//! assert!(keymap.dispatch(&mut engine, &mut doc, &alt_f));
//! engine.run_deferred(&mut doc);
//! assert_eq!(engine.status().label(), "1/2");
//!
//! keymap.dispatch(&mut engine, &mut doc, &"F3".parse().unwrap());
//! assert_eq!(engine.status().label(), "2/2");
//! ```

pub mod chord;
pub mod error;
pub mod keymap;

pub use chord::{Key, KeyChord, Modifiers};
pub use error::KeymapError;
pub use keymap::Keymap;
