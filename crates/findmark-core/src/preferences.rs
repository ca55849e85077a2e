//! Persisted user preferences.
//!
//! Preferences (the four option flags and the last query) are owned by the host. The engine
//! reads snapshots through [`PreferenceStore`], writes only through explicit
//! [`set_query`](PreferenceStore::set_query) / [`toggle_flag`](PreferenceStore::toggle_flag)
//! requests, and learns about external edits when the host forwards them to
//! [`FindEngine::preferences_changed`](crate::FindEngine::preferences_changed).
//!
//! [`MemoryPreferences`] is a reference store with change subscriptions and JSON persistence.
//!
//! # Example
//!
//! ```rust
//! use findmark_core::{MemoryPreferences, OptionFlag, PreferenceStore};
//! use std::sync::{Arc, Mutex};
//!
//! let mut store = MemoryPreferences::default();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! store.subscribe(move |prefs| sink.lock().unwrap().push(prefs.clone()));
//!
//! store.toggle_flag(OptionFlag::WholeWord);
//! assert!(store.preferences().options.whole_word);
//! assert_eq!(seen.lock().unwrap().len(), 1);
//! ```

use crate::error::PreferencesError;
use crate::rule::{OptionFlag, SearchOptions};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// A snapshot of the persisted preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Matching mode flags.
    pub options: SearchOptions,
    /// Last query typed by the user.
    pub query: String,
}

/// Host-owned preference storage.
pub trait PreferenceStore {
    /// Current snapshot.
    fn preferences(&self) -> Preferences;

    /// Persist the query text.
    fn set_query(&mut self, query: &str);

    /// Flip one option flag.
    fn toggle_flag(&mut self, flag: OptionFlag);
}

/// Preferences change callback function type
pub type PreferencesCallback = Box<dyn FnMut(&Preferences) + Send>;

/// In-memory [`PreferenceStore`] with subscriptions and JSON load/save.
#[derive(Default)]
pub struct MemoryPreferences {
    current: Preferences,
    callbacks: Vec<PreferencesCallback>,
    write_count: u64,
}

impl std::fmt::Debug for MemoryPreferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryPreferences")
            .field("current", &self.current)
            .field("subscribers", &self.callbacks.len())
            .field("write_count", &self.write_count)
            .finish()
    }
}

impl MemoryPreferences {
    /// Create a store holding `preferences`.
    pub fn new(preferences: Preferences) -> Self {
        Self {
            current: preferences,
            callbacks: Vec::new(),
            write_count: 0,
        }
    }

    /// Read a store from JSON. Missing keys take their defaults.
    pub fn load<R: Read>(reader: R) -> Result<Self, PreferencesError> {
        let preferences: Preferences = serde_json::from_reader(reader)?;
        Ok(Self::new(preferences))
    }

    /// Write the current snapshot as JSON.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), PreferencesError> {
        serde_json::to_writer_pretty(writer, &self.current)?;
        Ok(())
    }

    /// Subscribe to changes (including writes made through [`PreferenceStore`]).
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&Preferences) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Replace the whole snapshot, as an external sync would.
    pub fn replace(&mut self, preferences: Preferences) {
        if self.current != preferences {
            self.current = preferences;
            self.commit();
        }
    }

    /// Number of writes that changed the stored value.
    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    fn commit(&mut self) {
        self.write_count += 1;
        for callback in &mut self.callbacks {
            callback(&self.current);
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn preferences(&self) -> Preferences {
        self.current.clone()
    }

    fn set_query(&mut self, query: &str) {
        if self.current.query != query {
            self.current.query = query.to_string();
            self.commit();
        }
    }

    fn toggle_flag(&mut self, flag: OptionFlag) {
        self.current.options = self.current.options.toggled(flag);
        self.commit();
    }
}
