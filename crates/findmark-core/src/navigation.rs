//! Active match navigation.
//!
//! [`Navigator`] is a small state machine over `{ inactive, active(i) }`:
//!
//! - a new mark set for an unchanged query restores the previous index when it is in range
//! - otherwise the default is the mark nearest to the viewport (see [`nearest_to_viewport`])
//! - next/previous wrap around at both ends
//! - closing caches `{ index, query }` for the next open, or clears the cache when nothing
//!   was active
//!
//! Every transition moves the active styling and scrolls the new active mark into view.

use crate::highlight::HighlightManager;
use crate::tree::{ScrollBehavior, TextTree};

/// Cached position used to restore the active match for an unchanged query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorePoint {
    /// Index of the active match.
    pub index: usize,
    /// Query text the index belongs to.
    pub query: String,
}

/// Active match state.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    active: Option<usize>,
    restore: Option<RestorePoint>,
    behavior: ScrollBehavior,
}

impl Navigator {
    /// Create an inactive navigator.
    pub fn new(behavior: ScrollBehavior) -> Self {
        Self {
            active: None,
            restore: None,
            behavior,
        }
    }

    /// Index of the active match, `None` when inactive.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// The cached restore position, if any.
    pub fn restore_point(&self) -> Option<&RestorePoint> {
        self.restore.as_ref()
    }

    /// Remember the current position before the mark set is replaced, and go inactive.
    ///
    /// `scanned_query` is the query the outgoing mark set was built for.
    pub fn begin_rescan(&mut self, scanned_query: &str) {
        if let Some(index) = self.active.take() {
            self.restore = Some(RestorePoint {
                index,
                query: scanned_query.to_string(),
            });
        }
    }

    /// Pick the initial active mark for a freshly materialized mark set.
    ///
    /// Must run after layout: it reads mark geometry.
    pub fn select_default<T: TextTree + ?Sized>(
        &mut self,
        tree: &mut T,
        marks: &mut HighlightManager,
        query: &str,
    ) -> Option<usize> {
        let count = marks.len();
        let restored = self
            .restore
            .take()
            .filter(|r| r.query == query && r.index < count)
            .map(|r| r.index);

        let index = if count == 0 {
            None
        } else {
            restored.or_else(|| nearest_to_viewport(tree, marks))
        };
        self.activate(tree, marks, index);
        index
    }

    /// Advance to the next mark, wrapping to the first after the last.
    pub fn next<T: TextTree + ?Sized>(
        &mut self,
        tree: &mut T,
        marks: &mut HighlightManager,
    ) -> Option<usize> {
        let count = marks.len();
        if count == 0 {
            return self.active;
        }
        let index = self.active.map_or(0, |i| (i + 1) % count);
        self.activate(tree, marks, Some(index));
        self.active
    }

    /// Step back to the previous mark, wrapping to the last before the first.
    pub fn previous<T: TextTree + ?Sized>(
        &mut self,
        tree: &mut T,
        marks: &mut HighlightManager,
    ) -> Option<usize> {
        let count = marks.len();
        if count == 0 {
            return self.active;
        }
        let index = self.active.map_or(count - 1, |i| (i + count - 1) % count);
        self.activate(tree, marks, Some(index));
        self.active
    }

    /// Cache the position for `query`, go inactive and clear every mark.
    ///
    /// Closing with no active mark leaves nothing to restore.
    pub fn close<T: TextTree + ?Sized>(
        &mut self,
        tree: &mut T,
        marks: &mut HighlightManager,
        query: &str,
    ) {
        self.restore = self.active.take().map(|index| RestorePoint {
            index,
            query: query.to_string(),
        });
        marks.clear(tree);
    }

    fn activate<T: TextTree + ?Sized>(
        &mut self,
        tree: &mut T,
        marks: &mut HighlightManager,
        index: Option<usize>,
    ) {
        marks.set_active(tree, index);
        self.active = marks.active();

        let Some(mark) = self.active.and_then(|i| marks.get(i)) else {
            return;
        };
        if let Err(err) = tree.scroll_into_view(mark.element, self.behavior) {
            log::debug!("failed to reveal mark {:?}: {}", mark.element, err);
        }
    }
}

/// Default selection for a new query.
///
/// Returns 0 when the page is scrolled to the very top or when no mark lies fully inside the
/// viewport; otherwise the in-viewport mark whose vertical center is closest to the viewport's
/// vertical center (the earliest one on ties). `None` only for an empty mark set.
pub fn nearest_to_viewport<T: TextTree + ?Sized>(
    tree: &T,
    marks: &HighlightManager,
) -> Option<usize> {
    if marks.is_empty() {
        return None;
    }
    let viewport = tree.viewport();
    if viewport.is_at_top() {
        return Some(0);
    }

    let center = viewport.center_y();
    let mut best: Option<(usize, f64)> = None;
    for index in 0..marks.len() {
        let Some(rect) = marks.rect(tree, index) else {
            continue;
        };
        if !viewport.contains(&rect) {
            continue;
        }
        let distance = (rect.center_y() - center).abs();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }

    Some(best.map_or(0, |(index, _)| index))
}
