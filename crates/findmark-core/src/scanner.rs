//! Content scanning.
//!
//! Walks a [`TextTree`]'s text nodes in pre-order and applies a [`MatchRule`] to every node
//! that is eligible for matching. A node is skipped if:
//!
//! - its text is empty or whitespace-only
//! - its parent element is not rendered (`display: none` / `visibility: hidden`)
//! - its parent element is a mark, or it lives inside the search widget
//! - `only_viewport` is set and its parent element is not fully inside the viewport

use crate::error::TreeError;
use crate::rule::{MatchRule, SearchOptions, TextMatch};
use crate::tree::{ElementRole, NodeId, TextTree, Viewport};

/// A match inside one text node, as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    /// The text node.
    pub node: NodeId,
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl MatchRange {
    /// Create a new range.
    pub fn new(node: NodeId, start: usize, end: usize) -> Self {
        Self { node, start, end }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Find every match of `rule` in one text segment.
pub fn scan_text(rule: &MatchRule, text: &str) -> Vec<TextMatch> {
    rule.find_all(text)
}

/// Scan the whole document and return matches in document order.
pub fn scan<T: TextTree + ?Sized>(
    tree: &T,
    rule: &MatchRule,
    options: SearchOptions,
) -> Vec<MatchRange> {
    let viewport = tree.viewport();
    let mut ranges = Vec::new();
    let mut skipped = 0usize;

    for node in tree.text_leaves() {
        match scan_node(tree, node, rule, options, &viewport) {
            Ok(Some(found)) => {
                ranges.extend(found.iter().map(|m| MatchRange::new(node, m.start, m.end)));
            }
            Ok(None) => skipped += 1,
            Err(err) => {
                skipped += 1;
                log::debug!("skipping text node {:?}: {}", node, err);
            }
        }
    }

    log::trace!(
        "scan of /{}/ produced {} matches ({} nodes skipped)",
        rule.pattern(),
        ranges.len(),
        skipped
    );
    ranges
}

/// Matches in a single node, or `Ok(None)` if the node is not eligible.
fn scan_node<T: TextTree + ?Sized>(
    tree: &T,
    node: NodeId,
    rule: &MatchRule,
    options: SearchOptions,
    viewport: &Viewport,
) -> Result<Option<Vec<TextMatch>>, TreeError> {
    let text = tree.text(node)?;
    if text.trim().is_empty() {
        return Ok(None);
    }

    let element = tree.parent_element(node).ok_or(TreeError::Detached(node))?;
    if !tree.is_rendered(element) || tree.role(element) == ElementRole::Mark {
        return Ok(None);
    }
    if inside_search_widget(tree, element) {
        return Ok(None);
    }
    if options.only_viewport && !viewport.contains(&tree.bounding_rect(element)?) {
        return Ok(None);
    }

    Ok(Some(scan_text(rule, text)))
}

fn inside_search_widget<T: TextTree + ?Sized>(tree: &T, element: NodeId) -> bool {
    let mut current = Some(element);
    while let Some(id) = current {
        if tree.role(id) == ElementRole::SearchWidget {
            return true;
        }
        current = tree.parent_element(id);
    }
    false
}
