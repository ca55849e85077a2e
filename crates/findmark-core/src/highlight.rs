//! Reversible match highlighting.
//!
//! [`HighlightManager`] owns the current mark list. Marks are created from scanner output by
//! wrapping ranges in **reverse document order**: wrapping splits a text node, and the node
//! keeps only the text before the wrapped range, so every range not processed yet (which
//! lies earlier in the document) keeps valid offsets.
//!
//! [`clear`](HighlightManager::clear) unwraps every mark and re-merges the split text nodes,
//! so a later scan sees the page's original flat text structure.

use crate::config::FindConfig;
use crate::scanner::MatchRange;
use crate::tree::{NodeId, Rect, TextTree};

/// A materialized highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    /// The mark element.
    pub element: NodeId,
    /// The range it was created from (offsets as they were at scan time).
    pub source: MatchRange,
}

/// Owner of the current mark list and of mark styling.
#[derive(Debug, Clone, Default)]
pub struct HighlightManager {
    marks: Vec<Mark>,
    active: Option<usize>,
    match_color: String,
    active_color: String,
}

impl HighlightManager {
    /// Create an empty manager painting with the given config's colors.
    pub fn new(config: &FindConfig) -> Self {
        Self {
            marks: Vec::new(),
            active: None,
            match_color: config.match_color.clone(),
            active_color: config.active_color.clone(),
        }
    }

    /// Marks in document order.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Number of marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` if there are no marks.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Mark at `index`.
    pub fn get(&self, index: usize) -> Option<&Mark> {
        self.marks.get(index)
    }

    /// Index of the mark carrying the active styling.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Current viewport-relative rectangle of the mark at `index`.
    pub fn rect<T: TextTree + ?Sized>(&self, tree: &T, index: usize) -> Option<Rect> {
        let mark = self.marks.get(index)?;
        tree.bounding_rect(mark.element).ok()
    }

    /// Wrap every range and return how many marks were created.
    ///
    /// Existing marks are cleared first. Ranges must be in document order; a range whose
    /// wrap fails is dropped without affecting the others.
    pub fn materialize<T: TextTree + ?Sized>(
        &mut self,
        tree: &mut T,
        ranges: &[MatchRange],
    ) -> usize {
        self.clear(tree);

        let mut created = Vec::with_capacity(ranges.len());
        for range in ranges.iter().rev() {
            match tree.wrap_range(range.node, range.start, range.end) {
                Ok(element) => {
                    if let Err(err) = tree.paint_mark(element, &self.match_color) {
                        log::debug!("failed to paint mark {:?}: {}", element, err);
                    }
                    created.push(Mark {
                        element,
                        source: *range,
                    });
                }
                Err(err) => log::debug!("dropping match {:?}: {}", range, err),
            }
        }
        created.reverse();

        log::trace!("materialized {} of {} matches", created.len(), ranges.len());
        self.marks = created;
        self.marks.len()
    }

    /// Remove every mark, restoring plain text. Safe to call repeatedly.
    pub fn clear<T: TextTree + ?Sized>(&mut self, tree: &mut T) {
        for mark in self.marks.drain(..) {
            if let Err(err) = tree.unwrap_mark(mark.element) {
                log::debug!("mark {:?} already gone: {}", mark.element, err);
            }
        }
        self.active = None;
    }

    /// Move the active styling to `index` (or remove it with `None`).
    ///
    /// Out-of-range indices clear the active styling.
    pub fn set_active<T: TextTree + ?Sized>(&mut self, tree: &mut T, index: Option<usize>) {
        let index = index.filter(|i| *i < self.marks.len());
        if let Some(prev) = self.active.take() {
            if Some(prev) != index {
                self.paint(tree, prev, false);
            }
        }
        if let Some(next) = index {
            self.paint(tree, next, true);
        }
        self.active = index;
    }

    fn paint<T: TextTree + ?Sized>(&self, tree: &mut T, index: usize, active: bool) {
        let Some(mark) = self.marks.get(index) else {
            return;
        };
        let color = if active {
            &self.active_color
        } else {
            &self.match_color
        };
        if let Err(err) = tree.paint_mark(mark.element, color) {
            log::debug!("failed to paint mark {:?}: {}", mark.element, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_ACTIVE_COLOR, DEFAULT_MATCH_COLOR};
    use crate::dom::Document;

    fn doc_with(texts: &[&str]) -> (Document, Vec<NodeId>) {
        let mut doc = Document::default();
        let mut nodes = Vec::new();
        for text in texts {
            let p = doc.append_element(doc.root(), "p").unwrap();
            nodes.push(doc.append_text(p, text).unwrap());
        }
        (doc, nodes)
    }

    #[test]
    fn test_materialize_reverse_keeps_offsets_valid() {
        let (mut doc, nodes) = doc_with(&["ab ab ab"]);
        let t = nodes[0];
        let ranges = [
            MatchRange::new(t, 0, 2),
            MatchRange::new(t, 3, 5),
            MatchRange::new(t, 6, 8),
        ];

        let mut manager = HighlightManager::new(&FindConfig::default());
        assert_eq!(manager.materialize(&mut doc, &ranges), 3);

        let texts: Vec<String> = manager
            .marks()
            .iter()
            .map(|m| doc.text_content(m.element))
            .collect();
        assert_eq!(texts, vec!["ab", "ab", "ab"]);
        assert_eq!(
            manager.marks().iter().map(|m| m.element).collect::<Vec<_>>(),
            doc.mark_elements()
        );
        assert_eq!(doc.background(manager.marks()[0].element), Some(DEFAULT_MATCH_COLOR));
    }

    #[test]
    fn test_failed_wrap_drops_only_that_match() {
        let (mut doc, nodes) = doc_with(&["abc", "abc"]);
        let ranges = [
            MatchRange::new(nodes[0], 0, 3),
            MatchRange::new(nodes[1], 1, 99),
            MatchRange::new(nodes[1], 0, 1),
        ];

        let mut manager = HighlightManager::new(&FindConfig::default());
        assert_eq!(manager.materialize(&mut doc, &ranges), 2);
        assert_eq!(manager.marks()[1].source, ranges[2]);
    }

    #[test]
    fn test_clear_restores_text_and_is_idempotent() {
        let (mut doc, nodes) = doc_with(&["one fish two fish"]);
        let before = doc.text_content(doc.root());
        let ranges = [
            MatchRange::new(nodes[0], 4, 8),
            MatchRange::new(nodes[0], 13, 17),
        ];

        let mut manager = HighlightManager::new(&FindConfig::default());
        manager.materialize(&mut doc, &ranges);
        manager.clear(&mut doc);
        manager.clear(&mut doc);

        assert!(manager.is_empty());
        assert_eq!(doc.text_content(doc.root()), before);
        assert_eq!(doc.text_leaves(), vec![nodes[0]]);
    }

    #[test]
    fn test_single_active_mark() {
        let (mut doc, nodes) = doc_with(&["x x x"]);
        let t = nodes[0];
        let ranges = [
            MatchRange::new(t, 0, 1),
            MatchRange::new(t, 2, 3),
            MatchRange::new(t, 4, 5),
        ];

        let mut manager = HighlightManager::new(&FindConfig::default());
        manager.materialize(&mut doc, &ranges);
        manager.set_active(&mut doc, Some(1));
        manager.set_active(&mut doc, Some(2));

        let colors: Vec<Option<&str>> = manager
            .marks()
            .iter()
            .map(|m| doc.background(m.element))
            .collect();
        assert_eq!(
            colors,
            vec![
                Some(DEFAULT_MATCH_COLOR),
                Some(DEFAULT_MATCH_COLOR),
                Some(DEFAULT_ACTIVE_COLOR)
            ]
        );

        manager.set_active(&mut doc, Some(7));
        assert_eq!(manager.active(), None);
        assert_eq!(doc.background(manager.marks()[2].element), Some(DEFAULT_MATCH_COLOR));
    }
}
