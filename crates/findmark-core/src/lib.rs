#![warn(missing_docs)]
//! findmark Core - Headless In-Page Find Engine
//!
//! # Overview
//!
//! `findmark-core` finds, highlights and navigates text matches inside a rendered page. It
//! never touches a concrete DOM: the page is reached through the [`TextTree`] trait, and
//! [`Document`] is an in-memory implementation used by tests and non-browser hosts.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  FindEngine (open/close/rescan/next/prev)   │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Navigator (active match, restore cache)    │  ← Navigation
//! ├─────────────────────────────────────────────┤
//! │  HighlightManager (wrap/unwrap marks)       │  ← Reversible annotation
//! ├─────────────────────────────────────────────┤
//! │  Scanner (eligible text nodes, ranges)      │  ← Content scanning
//! ├─────────────────────────────────────────────┤
//! │  Rule compiler (query + flags -> regex)     │  ← Matching
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use findmark_core::{Document, FindEngine, MemoryPreferences, OptionFlag, TextTree};
//!
//! let mut doc = Document::default();
//! let p = doc.append_element(doc.root(), "p").unwrap();
//! doc.append_text(p, "Cat cats category").unwrap();
//!
//! let mut engine = FindEngine::new(MemoryPreferences::default());
//! engine.open(&mut doc);
//! engine.set_query(&mut doc, "cat");
//! assert_eq!(engine.status().match_count, 3);
//!
//! engine.toggle_option(&mut doc, OptionFlag::WholeWord);
//! assert_eq!(engine.status().match_count, 1);
//!
//! // layout has happened: pick the active match and persist the query
//! engine.run_deferred(&mut doc);
//! assert_eq!(engine.active_index(), Some(0));
//!
//! engine.close(&mut doc);
//! assert_eq!(doc.text_content(doc.root()), "Cat cats category");
//! ```
//!
//! # Module Description
//!
//! - [`rule`] - query compilation
//! - [`tree`] - text-tree abstraction and geometry
//! - [`dom`] - in-memory arena document
//! - [`scanner`] - content scanning
//! - [`highlight`] - reversible mark materialization
//! - [`navigation`] - active match state machine
//! - [`engine`] - the engine state object and deferred work
//! - [`commands`] - the four user commands
//! - [`preferences`] - host-owned preference storage
//! - [`state`] - status reporting
//!
//! # Logging
//!
//! Recovered failures (invalid patterns, skipped nodes, dropped matches) are reported through
//! the [`log`] facade at `debug` level; scan totals at `trace`.

pub mod commands;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod navigation;
pub mod preferences;
pub mod rule;
pub mod scanner;
pub mod state;
pub mod tree;

pub use commands::FindCommand;
pub use config::FindConfig;
pub use dom::{Document, Visibility};
pub use engine::{DeferredTask, FindEngine};
pub use error::{PreferencesError, RuleError, TreeError};
pub use highlight::{HighlightManager, Mark};
pub use navigation::{Navigator, RestorePoint, nearest_to_viewport};
pub use preferences::{MemoryPreferences, PreferenceStore, Preferences, PreferencesCallback};
pub use rule::{MatchRule, OptionFlag, SearchOptions, TextMatch, compile};
pub use scanner::{MatchRange, scan, scan_text};
pub use state::{FindStatus, StatusCallback, StatusChange, StatusChangeType};
pub use tree::{ElementRole, NodeId, NodeKind, Rect, ScrollBehavior, TextTree, Viewport};
