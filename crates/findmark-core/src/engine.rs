//! The find engine state object.
//!
//! [`FindEngine`] ties the pipeline together:
//!
//! ```text
//! query/options change
//!   -> rule::compile
//!   -> scanner::scan           (ordered MatchRanges)
//!   -> HighlightManager        (clear old marks, materialize new ones)
//!   -> Navigator               (deferred default selection, next/previous)
//! ```
//!
//! # Event-loop model
//!
//! Everything runs on the caller's thread. Two kinds of work are queued as
//! [`DeferredTask`]s and executed by [`run_deferred`](FindEngine::run_deferred), which the
//! host calls on the next turn of its event loop:
//!
//! - persisting the query to the [`PreferenceStore`] (pending writes coalesce)
//! - picking the default active mark, which needs the new marks to be laid out
//!
//! Each rescan bumps a generation counter, so a selection queued by a superseded scan is
//! dropped instead of applied to the wrong mark set.

use crate::config::FindConfig;
use crate::highlight::{HighlightManager, Mark};
use crate::navigation::Navigator;
use crate::preferences::{PreferenceStore, Preferences};
use crate::rule::{self, OptionFlag, SearchOptions};
use crate::scanner;
use crate::state::{FindStatus, StatusCallback, StatusChange, StatusChangeType};
use crate::tree::TextTree;
use std::collections::VecDeque;

/// Work postponed to the next event-loop turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredTask {
    /// Write the query to the preference store.
    PersistQuery(String),
    /// Pick the default active mark for the scan with this generation.
    SelectDefault {
        /// Scan generation the task belongs to.
        generation: u64,
    },
}

/// In-page find engine.
///
/// The engine owns the mark list and the active index; the document is borrowed per call.
pub struct FindEngine<S: PreferenceStore> {
    store: S,
    config: FindConfig,
    options: SearchOptions,
    query: String,
    visible: bool,
    /// Query the current mark set was built for.
    scanned_query: Option<String>,
    highlights: HighlightManager,
    navigator: Navigator,
    pending: VecDeque<DeferredTask>,
    generation: u64,
    version: u64,
    callbacks: Vec<StatusCallback>,
}

impl<S: PreferenceStore> FindEngine<S> {
    /// Create a hidden engine with the default config, seeded from `store`.
    pub fn new(store: S) -> Self {
        Self::with_config(store, FindConfig::default())
    }

    /// Create a hidden engine with an explicit config.
    pub fn with_config(store: S, config: FindConfig) -> Self {
        let Preferences { options, query } = store.preferences();
        Self {
            highlights: HighlightManager::new(&config),
            navigator: Navigator::new(config.scroll_behavior),
            store,
            config,
            options,
            query,
            visible: false,
            scanned_query: None,
            pending: VecDeque::new(),
            generation: 0,
            version: 0,
            callbacks: Vec::new(),
        }
    }

    /// The preference store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the preference store.
    ///
    /// Changes made here reach the engine only through
    /// [`preferences_changed`](Self::preferences_changed).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The presentation config.
    pub fn config(&self) -> &FindConfig {
        &self.config
    }

    /// Whether the widget is open.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current in-memory query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current option snapshot.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Current marks, in document order.
    pub fn marks(&self) -> &[Mark] {
        self.highlights.marks()
    }

    /// Index of the active mark.
    pub fn active_index(&self) -> Option<usize> {
        self.navigator.active()
    }

    /// Incremented on every status report.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Tasks waiting for [`run_deferred`](Self::run_deferred).
    pub fn pending_tasks(&self) -> impl Iterator<Item = &DeferredTask> {
        self.pending.iter()
    }

    /// Returns `true` if [`run_deferred`](Self::run_deferred) has work to do.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// What the widget should display.
    pub fn status(&self) -> FindStatus {
        FindStatus {
            visible: self.visible,
            query: self.scanned_query.clone().unwrap_or_default(),
            match_count: self.highlights.len(),
            active_index: self.navigator.active(),
        }
    }

    /// Subscribe to status reports.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StatusChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Show the widget and search with the current query.
    pub fn open<T: TextTree + ?Sized>(&mut self, tree: &mut T) {
        if self.visible {
            return;
        }
        self.visible = true;
        self.notify(StatusChangeType::Opened);
        self.rescan(tree);
    }

    /// Hide the widget, caching the active position and removing every mark.
    pub fn close<T: TextTree + ?Sized>(&mut self, tree: &mut T) {
        if !self.visible {
            return;
        }
        self.visible = false;
        let query = self.scanned_query.take().unwrap_or_default();
        self.navigator.close(tree, &mut self.highlights, &query);
        self.pending
            .retain(|task| !matches!(task, DeferredTask::SelectDefault { .. }));
        self.notify(StatusChangeType::Closed);
    }

    /// Open if hidden, close if open.
    pub fn toggle_visibility<T: TextTree + ?Sized>(&mut self, tree: &mut T) {
        if self.visible {
            self.close(tree);
        } else {
            self.open(tree);
        }
    }

    /// Update the query from user input.
    ///
    /// The rescan happens immediately; the write to the store is deferred.
    pub fn set_query<T: TextTree + ?Sized>(&mut self, tree: &mut T, query: &str) {
        if self.query == query {
            return;
        }
        self.query = query.to_string();
        self.pending
            .retain(|task| !matches!(task, DeferredTask::PersistQuery(_)));
        self.pending
            .push_back(DeferredTask::PersistQuery(self.query.clone()));
        if self.visible {
            self.rescan(tree);
        }
    }

    /// Ask the store to flip `flag`, then apply the resulting options.
    pub fn toggle_option<T: TextTree + ?Sized>(&mut self, tree: &mut T, flag: OptionFlag) {
        self.store.toggle_flag(flag);
        let options = self.store.preferences().options;
        self.apply(tree, options, None);
    }

    /// React to a preference change coming from the store.
    ///
    /// An incoming query is ignored while a local query write is still pending.
    pub fn preferences_changed<T: TextTree + ?Sized>(
        &mut self,
        tree: &mut T,
        preferences: Preferences,
    ) {
        let persist_pending = self
            .pending
            .iter()
            .any(|task| matches!(task, DeferredTask::PersistQuery(_)));
        let query = (!persist_pending).then_some(preferences.query);
        self.apply(tree, preferences.options, query);
    }

    fn apply<T: TextTree + ?Sized>(
        &mut self,
        tree: &mut T,
        options: SearchOptions,
        query: Option<String>,
    ) {
        let mut changed = options != self.options;
        self.options = options;
        if let Some(query) = query.filter(|q| *q != self.query) {
            self.query = query;
            changed = true;
        }
        if changed && self.visible {
            self.rescan(tree);
        }
    }

    /// Replace the mark set with the matches of the current query and options.
    ///
    /// Does nothing while the widget is hidden.
    pub fn rescan<T: TextTree + ?Sized>(&mut self, tree: &mut T) {
        if !self.visible {
            return;
        }
        self.generation += 1;
        if let Some(outgoing) = self.scanned_query.take() {
            self.navigator.begin_rescan(&outgoing);
        }
        self.highlights.clear(tree);
        self.pending
            .retain(|task| !matches!(task, DeferredTask::SelectDefault { .. }));

        let ranges = match rule::compile(&self.query, self.options) {
            Ok(Some(rule)) => scanner::scan(tree, &rule, self.options),
            Ok(None) => Vec::new(),
            Err(err) => {
                log::debug!("query treated as no matches: {}", err);
                Vec::new()
            }
        };
        self.highlights.materialize(tree, &ranges);
        self.scanned_query = Some(self.query.clone());

        if !self.highlights.is_empty() {
            self.pending.push_back(DeferredTask::SelectDefault {
                generation: self.generation,
            });
        }
        self.notify(StatusChangeType::ScanCompleted);
    }

    /// Run the tasks queued before this call. Tasks queued while running wait for the
    /// next call.
    pub fn run_deferred<T: TextTree + ?Sized>(&mut self, tree: &mut T) {
        let tasks: Vec<DeferredTask> = self.pending.drain(..).collect();
        for task in tasks {
            match task {
                DeferredTask::PersistQuery(query) => self.store.set_query(&query),
                DeferredTask::SelectDefault { generation } => {
                    if generation != self.generation || !self.visible {
                        log::debug!("dropping stale default selection (scan {})", generation);
                        continue;
                    }
                    let query = self.scanned_query.clone().unwrap_or_default();
                    self.navigator
                        .select_default(tree, &mut self.highlights, &query);
                    self.notify(StatusChangeType::ActiveChanged);
                }
            }
        }
    }

    /// Step to the next match (wrapping). No-op while hidden or without matches.
    pub fn next<T: TextTree + ?Sized>(&mut self, tree: &mut T) {
        if !self.visible || self.highlights.is_empty() {
            return;
        }
        self.navigator.next(tree, &mut self.highlights);
        self.notify(StatusChangeType::ActiveChanged);
    }

    /// Step to the previous match (wrapping). No-op while hidden or without matches.
    pub fn previous<T: TextTree + ?Sized>(&mut self, tree: &mut T) {
        if !self.visible || self.highlights.is_empty() {
            return;
        }
        self.navigator.previous(tree, &mut self.highlights);
        self.notify(StatusChangeType::ActiveChanged);
    }

    fn notify(&mut self, change_type: StatusChangeType) {
        self.version += 1;
        let change = StatusChange {
            change_type,
            status: self.status(),
            version: self.version,
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}
