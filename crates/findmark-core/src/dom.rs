//! In-memory arena document.
//!
//! [`Document`] is a small element/text tree implementing [`TextTree`]. It models the parts
//! of a rendered page the engine cares about: computed display/visibility, element roles,
//! layout rectangles (in page coordinates) and the scroll position of the window.
//!
//! Mark wrapping follows the DOM's `Range.surroundContents` on a single text node: the
//! original node keeps the text before the range, the matched text moves into a new `<mark>`
//! element, and the remainder becomes a new text node after it.
//!
//! # Example
//!
//! ```rust
//! use findmark_core::{Document, Rect, TextTree, Viewport};
//!
//! let mut doc = Document::new(Viewport::new(800.0, 600.0));
//! let p = doc.append_element(doc.root(), "p").unwrap();
//! let text = doc.append_text(p, "hello world").unwrap();
//! doc.set_rect(p, Rect::new(0.0, 10.0, 300.0, 20.0)).unwrap();
//!
//! let mark = doc.wrap_range(text, 6, 11).unwrap();
//! assert_eq!(doc.text_content(mark), "world");
//!
//! doc.unwrap_mark(mark).unwrap();
//! assert_eq!(doc.text_content(doc.root()), "hello world");
//! assert_eq!(doc.text_leaves().len(), 1);
//! ```

use crate::error::TreeError;
use crate::rule::CharIndex;
use crate::tree::{ElementRole, NodeId, NodeKind, Rect, ScrollBehavior, TextTree, Viewport};

/// Computed `visibility` of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// `visibility: visible`
    Visible,
    /// `visibility: hidden`
    Hidden,
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    role: ElementRole,
    display_none: bool,
    /// `None` inherits from the parent.
    visibility: Option<Visibility>,
    /// Layout box in page coordinates.
    rect: Option<Rect>,
    background: Option<String>,
}

impl Element {
    fn new(tag: &str, role: ElementRole) -> Self {
        Self {
            tag: tag.to_string(),
            role,
            display_none: false,
            visibility: None,
            rect: None,
            background: None,
        }
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
    data: NodeData,
}

/// An in-memory document implementing [`TextTree`].
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    viewport: Viewport,
    last_scroll: Option<(NodeId, ScrollBehavior)>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Viewport::new(1024.0, 768.0))
    }
}

impl Document {
    /// Create an empty document whose root is a `body` element.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                attached: true,
                data: NodeData::Element(Element::new("body", ElementRole::Content)),
            }],
            root: NodeId(0),
            viewport,
            last_scroll: None,
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes
            .get(id.0)
            .filter(|n| n.attached)
            .ok_or(TreeError::Detached(id))
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id).ok()?.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, TreeError> {
        match self.nodes.get_mut(id.0) {
            Some(Node {
                attached: true,
                data: NodeData::Element(el),
                ..
            }) => Ok(el),
            Some(Node { attached: true, .. }) => Err(TreeError::NotElement(id)),
            _ => Err(TreeError::Detached(id)),
        }
    }

    fn alloc(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            attached: parent.is_some(),
            data,
        });
        id
    }

    fn require_element(&self, id: NodeId) -> Result<(), TreeError> {
        match self.node(id)?.data {
            NodeData::Element(_) => Ok(()),
            NodeData::Text(_) => Err(TreeError::NotElement(id)),
        }
    }

    /// Append a new element under `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, TreeError> {
        self.require_element(parent)?;
        let id = self.alloc(
            Some(parent),
            NodeData::Element(Element::new(tag, ElementRole::Content)),
        );
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Append a new text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, TreeError> {
        self.require_element(parent)?;
        let id = self.alloc(Some(parent), NodeData::Text(text.to_string()));
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Tag name of `element`.
    pub fn tag(&self, element: NodeId) -> Option<&str> {
        self.element(element).map(|el| el.tag.as_str())
    }

    /// Set or clear `display: none`.
    pub fn set_display_none(&mut self, element: NodeId, none: bool) -> Result<(), TreeError> {
        self.element_mut(element)?.display_none = none;
        Ok(())
    }

    /// Set `visibility` explicitly (`None` inherits).
    pub fn set_visibility(
        &mut self,
        element: NodeId,
        visibility: Option<Visibility>,
    ) -> Result<(), TreeError> {
        self.element_mut(element)?.visibility = visibility;
        Ok(())
    }

    /// Set the role of `element`; use [`ElementRole::SearchWidget`] for the widget's root.
    pub fn set_role(&mut self, element: NodeId, role: ElementRole) -> Result<(), TreeError> {
        self.element_mut(element)?.role = role;
        Ok(())
    }

    /// Set the layout box of `element`, in page coordinates.
    ///
    /// Nodes without their own box report the box of their nearest laid-out ancestor.
    pub fn set_rect(&mut self, element: NodeId, rect: Rect) -> Result<(), TreeError> {
        self.element_mut(element)?.rect = Some(rect);
        Ok(())
    }

    /// The color last applied with [`TextTree::paint_mark`].
    pub fn background(&self, element: NodeId) -> Option<&str> {
        self.element(element)?.background.as_deref()
    }

    /// Scroll the window to an absolute position.
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.viewport.scroll_x = x.max(0.0);
        self.viewport.scroll_y = y.max(0.0);
    }

    /// Resize the window.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Target and behavior of the most recent [`TextTree::scroll_into_view`] call.
    pub fn last_scroll(&self) -> Option<(NodeId, ScrollBehavior)> {
        self.last_scroll
    }

    /// Returns `true` if `node` still belongs to the document.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.node(node).is_ok()
    }

    /// Attached elements with role [`ElementRole::Mark`], in document order.
    pub fn mark_elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let Some(el) = self.element(id) {
                if el.role == ElementRole::Mark {
                    out.push(id);
                }
                stack.extend(self.nodes[id.0].children.iter().rev());
            }
        }
        out
    }

    /// Detach `node` from its parent.
    pub fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        let parent = self.node(node)?.parent.ok_or(TreeError::Detached(node))?;
        self.nodes[parent.0].children.retain(|c| *c != node);
        self.detach_subtree(node);
        Ok(())
    }

    fn detach_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let n = &mut self.nodes[id.0];
            n.attached = false;
            stack.extend(n.children.iter().copied());
        }
        self.nodes[node.0].parent = None;
    }

    fn insert_after(&mut self, parent: NodeId, anchor: NodeId, nodes: &[NodeId]) {
        let children = &mut self.nodes[parent.0].children;
        let at = children
            .iter()
            .position(|c| *c == anchor)
            .map_or(children.len(), |i| i + 1);
        children.splice(at..at, nodes.iter().copied());
    }

    /// Merge adjacent text children of `element` and drop empty ones.
    pub fn normalize(&mut self, element: NodeId) -> Result<(), TreeError> {
        self.require_element(element)?;
        let children = std::mem::take(&mut self.nodes[element.0].children);
        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
        let mut removed: Vec<NodeId> = Vec::new();

        for child in children {
            let NodeData::Text(text) = &self.nodes[child.0].data else {
                kept.push(child);
                continue;
            };
            if text.is_empty() {
                removed.push(child);
                continue;
            }
            let text = text.clone();
            match kept.last().copied() {
                Some(prev) if matches!(self.nodes[prev.0].data, NodeData::Text(_)) => {
                    if let NodeData::Text(prev_text) = &mut self.nodes[prev.0].data {
                        prev_text.push_str(&text);
                    }
                    removed.push(child);
                }
                _ => kept.push(child),
            }
        }

        self.nodes[element.0].children = kept;
        for id in removed {
            self.detach_subtree(id);
        }
        Ok(())
    }

    fn layout_rect(&self, node: NodeId) -> Rect {
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(rect) = self.element(id).and_then(|el| el.rect) {
                return rect;
            }
            current = self.parent(id);
        }
        Rect::default()
    }
}

impl TextTree for Document {
    fn root(&self) -> NodeId {
        self.root
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).ok()?.parent
    }

    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        match self.node(node).ok()?.data {
            NodeData::Element(_) => Some(NodeKind::Element),
            NodeData::Text(_) => Some(NodeKind::Text),
        }
    }

    fn text(&self, node: NodeId) -> Result<&str, TreeError> {
        match &self.node(node)?.data {
            NodeData::Text(text) => Ok(text),
            NodeData::Element(_) => Err(TreeError::NotText(node)),
        }
    }

    fn is_rendered(&self, element: NodeId) -> bool {
        let mut visibility = None;
        let mut current = Some(element);
        while let Some(id) = current {
            let Some(el) = self.element(id) else {
                return false;
            };
            if el.display_none {
                return false;
            }
            if visibility.is_none() {
                visibility = el.visibility;
            }
            current = self.nodes[id.0].parent;
        }
        visibility != Some(Visibility::Hidden)
    }

    fn role(&self, element: NodeId) -> ElementRole {
        self.element(element).map(|el| el.role).unwrap_or_default()
    }

    fn bounding_rect(&self, node: NodeId) -> Result<Rect, TreeError> {
        self.node(node)?;
        let rect = self.layout_rect(node);
        Ok(rect.offset_by(self.viewport.scroll_x, self.viewport.scroll_y))
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn wrap_range(&mut self, node: NodeId, start: usize, end: usize) -> Result<NodeId, TreeError> {
        let parent = self.node(node)?.parent.ok_or(TreeError::Detached(node))?;
        let text = self.text(node)?.to_string();
        if self.role(parent) == ElementRole::Mark {
            return Err(TreeError::Collision { node, start, end });
        }

        let index = CharIndex::new(&text);
        let len = index.char_count();
        if start >= end || end > len {
            return Err(TreeError::OutOfBounds {
                node,
                start,
                end,
                len,
            });
        }

        let start_byte = index.char_to_byte(start);
        let end_byte = index.char_to_byte(end);

        let mark = self.alloc(
            Some(parent),
            NodeData::Element(Element::new("mark", ElementRole::Mark)),
        );
        let inner = self.alloc(
            Some(mark),
            NodeData::Text(text[start_byte..end_byte].to_string()),
        );
        self.nodes[mark.0].children.push(inner);

        let mut inserted = vec![mark];
        if end_byte < text.len() {
            inserted.push(self.alloc(Some(parent), NodeData::Text(text[end_byte..].to_string())));
        }
        self.nodes[node.0].data = NodeData::Text(text[..start_byte].to_string());
        self.insert_after(parent, node, &inserted);

        Ok(mark)
    }

    fn unwrap_mark(&mut self, mark: NodeId) -> Result<(), TreeError> {
        if self.role(mark) != ElementRole::Mark {
            self.node(mark)?;
            return Err(TreeError::NotMark(mark));
        }
        let parent = self.node(mark)?.parent.ok_or(TreeError::Detached(mark))?;
        let text = self.text_content(mark);

        let replacement = self.alloc(Some(parent), NodeData::Text(text));
        self.insert_after(parent, mark, &[replacement]);
        self.nodes[parent.0].children.retain(|c| *c != mark);
        self.detach_subtree(mark);

        self.normalize(parent)
    }

    fn paint_mark(&mut self, mark: NodeId, color: &str) -> Result<(), TreeError> {
        let el = self.element_mut(mark)?;
        if el.role != ElementRole::Mark {
            return Err(TreeError::NotMark(mark));
        }
        el.background = Some(color.to_string());
        Ok(())
    }

    fn scroll_into_view(
        &mut self,
        node: NodeId,
        behavior: ScrollBehavior,
    ) -> Result<(), TreeError> {
        let rect = self.bounding_rect(node)?;
        let Viewport {
            width,
            height,
            scroll_x,
            scroll_y,
        } = self.viewport;

        let dy = nearest_delta(rect.top, rect.bottom, height);
        let dx = nearest_delta(rect.left, rect.right, width);
        self.scroll_to(scroll_x + dx, scroll_y + dy);
        self.last_scroll = Some((node, behavior));
        Ok(())
    }
}

/// Smallest scroll delta that brings `[lo, hi]` into `[0, extent]`; the leading edge wins
/// when the box is larger than the window.
fn nearest_delta(lo: f64, hi: f64, extent: f64) -> f64 {
    if lo < 0.0 {
        lo
    } else if hi > extent {
        (hi - extent).min(lo)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(doc: &mut Document, text: &str) -> (NodeId, NodeId) {
        let p = doc.append_element(doc.root(), "p").unwrap();
        let t = doc.append_text(p, text).unwrap();
        (p, t)
    }

    #[test]
    fn test_wrap_keeps_prefix_in_original_node() {
        let mut doc = Document::default();
        let (p, t) = paragraph(&mut doc, "one two three");

        let mark = doc.wrap_range(t, 4, 7).unwrap();
        assert_eq!(doc.text(t).unwrap(), "one ");
        assert_eq!(doc.text_content(mark), "two");
        assert_eq!(doc.children(p).len(), 3);
        assert_eq!(doc.text_content(p), "one two three");

        // earlier offsets in the same node are still valid
        let first = doc.wrap_range(t, 0, 3).unwrap();
        assert_eq!(doc.text_content(first), "one");
        assert_eq!(doc.mark_elements(), vec![first, mark]);
    }

    #[test]
    fn test_wrap_rejects_bad_ranges() {
        let mut doc = Document::default();
        let (p, t) = paragraph(&mut doc, "abc");

        assert!(matches!(
            doc.wrap_range(t, 2, 9),
            Err(TreeError::OutOfBounds { len: 3, .. })
        ));
        assert!(matches!(doc.wrap_range(t, 2, 2), Err(TreeError::OutOfBounds { .. })));
        assert_eq!(doc.wrap_range(p, 0, 1), Err(TreeError::NotText(p)));

        let mark = doc.wrap_range(t, 0, 3).unwrap();
        let inner = doc.children(mark)[0];
        assert!(matches!(
            doc.wrap_range(inner, 0, 1),
            Err(TreeError::Collision { .. })
        ));
    }

    #[test]
    fn test_unwrap_merges_and_is_idempotent() {
        let mut doc = Document::default();
        let (p, t) = paragraph(&mut doc, "aXbXc");
        let second = doc.wrap_range(t, 3, 4).unwrap();
        let first = doc.wrap_range(t, 1, 2).unwrap();
        assert_eq!(doc.children(p).len(), 5);

        doc.unwrap_mark(first).unwrap();
        doc.unwrap_mark(second).unwrap();
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text_content(p), "aXbXc");

        assert_eq!(doc.unwrap_mark(first), Err(TreeError::Detached(first)));
        assert_eq!(doc.unwrap_mark(p), Err(TreeError::NotMark(p)));
    }

    #[test]
    fn test_rendering_rules() {
        let mut doc = Document::default();
        let outer = doc.append_element(doc.root(), "div").unwrap();
        let inner = doc.append_element(outer, "span").unwrap();
        assert!(doc.is_rendered(inner));

        doc.set_display_none(outer, true).unwrap();
        assert!(!doc.is_rendered(inner));
        doc.set_display_none(outer, false).unwrap();

        doc.set_visibility(outer, Some(Visibility::Hidden)).unwrap();
        assert!(!doc.is_rendered(inner));
        doc.set_visibility(inner, Some(Visibility::Visible)).unwrap();
        assert!(doc.is_rendered(inner));
    }

    #[test]
    fn test_rects_follow_scroll_and_inherit() {
        let mut doc = Document::new(Viewport::new(400.0, 300.0));
        let (p, t) = paragraph(&mut doc, "text");
        doc.set_rect(p, Rect::new(10.0, 500.0, 100.0, 20.0)).unwrap();

        assert_eq!(doc.bounding_rect(t).unwrap().top, 500.0);
        doc.scroll_to(0.0, 450.0);
        let rect = doc.bounding_rect(t).unwrap();
        assert_eq!((rect.top, rect.bottom), (50.0, 70.0));
    }

    #[test]
    fn test_scroll_into_view_is_nearest_fit() {
        let mut doc = Document::new(Viewport::new(400.0, 300.0));
        let (below, _) = paragraph(&mut doc, "below");
        let (above, _) = paragraph(&mut doc, "above");
        doc.set_rect(below, Rect::new(0.0, 1000.0, 100.0, 20.0)).unwrap();
        doc.set_rect(above, Rect::new(0.0, 100.0, 100.0, 20.0)).unwrap();

        doc.scroll_into_view(below, ScrollBehavior::Smooth).unwrap();
        // bottom edge aligned with the window's bottom edge
        assert_eq!(doc.viewport().scroll_y, 720.0);

        doc.scroll_into_view(above, ScrollBehavior::Instant).unwrap();
        assert_eq!(doc.viewport().scroll_y, 100.0);
        assert_eq!(doc.last_scroll(), Some((above, ScrollBehavior::Instant)));

        // already visible: no movement
        doc.scroll_into_view(above, ScrollBehavior::Smooth).unwrap();
        assert_eq!(doc.viewport().scroll_y, 100.0);
    }
}
