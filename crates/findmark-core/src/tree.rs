//! Text-tree abstraction.
//!
//! The engine never touches a concrete DOM. Hosts implement [`TextTree`] over whatever
//! document model they have (a browser DOM via bindings, a parsed HTML tree, or the in-memory
//! [`Document`](crate::dom::Document) shipped with this crate).
//!
//! Required capabilities:
//!
//! - structure: root, children, parent, node kind
//! - per-element queries: rendered or not, role (plain / mark / search widget), geometry
//! - a reversible edit primitive: [`wrap_range`](TextTree::wrap_range) /
//!   [`unwrap_mark`](TextTree::unwrap_mark)
//! - presentation hooks: [`paint_mark`](TextTree::paint_mark),
//!   [`scroll_into_view`](TextTree::scroll_into_view)

use crate::error::TreeError;
use serde::{Deserialize, Serialize};

/// Opaque node identity within a [`TextTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// Kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// An element (may have children).
    Element,
    /// A text leaf.
    Text,
}

/// What an element means to the find engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementRole {
    /// Ordinary page content.
    #[default]
    Content,
    /// A mark created by [`TextTree::wrap_range`].
    Mark,
    /// The root of the search widget's own UI. Nothing inside it is ever scanned.
    SearchWidget,
}

/// A rectangle relative to the visible window (like `getBoundingClientRect`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Distance from the viewport's top edge.
    pub top: f64,
    /// Distance from the viewport's left edge.
    pub left: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Right edge.
    pub right: f64,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            bottom: top + height,
            right: left + width,
        }
    }

    /// Vertical center.
    pub fn center_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Translate by `(-dx, -dy)`.
    pub fn offset_by(&self, dx: f64, dy: f64) -> Self {
        Self {
            top: self.top - dy,
            left: self.left - dx,
            bottom: self.bottom - dy,
            right: self.right - dx,
        }
    }
}

/// The visible window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Inner width.
    pub width: f64,
    /// Inner height.
    pub height: f64,
    /// Horizontal scroll offset of the page.
    pub scroll_x: f64,
    /// Vertical scroll offset of the page.
    pub scroll_y: f64,
}

impl Viewport {
    /// Create an unscrolled viewport.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Strict containment: the whole rectangle lies inside the window.
    pub fn contains(&self, rect: &Rect) -> bool {
        rect.top >= 0.0
            && rect.left >= 0.0
            && rect.bottom <= self.height
            && rect.right <= self.width
    }

    /// Vertical center of the window, in viewport coordinates.
    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }

    /// Whether the page is scrolled to the very top.
    pub fn is_at_top(&self) -> bool {
        self.scroll_y <= 0.0
    }
}

/// How [`TextTree::scroll_into_view`] should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Animated scrolling.
    #[default]
    Smooth,
    /// Jump immediately.
    Instant,
}

/// The document model the engine scans and annotates.
///
/// Offsets passed to [`wrap_range`](Self::wrap_range) are character offsets into the text
/// node's **current** content. Implementations must keep the original node holding the text
/// before `start`, so that ranges with smaller offsets in the same node stay valid.
pub trait TextTree {
    /// The document root.
    fn root(&self) -> NodeId;

    /// Children of `node`, in document order. Empty for text nodes and unknown nodes.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Parent of `node`, or `None` for the root and detached nodes.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Kind of `node`, or `None` if it is detached or unknown.
    fn kind(&self, node: NodeId) -> Option<NodeKind>;

    /// Current content of a text node.
    fn text(&self, node: NodeId) -> Result<&str, TreeError>;

    /// Whether `element` is rendered (computed display is not `none` and computed visibility
    /// is not `hidden`).
    fn is_rendered(&self, element: NodeId) -> bool;

    /// Role of `element`.
    fn role(&self, element: NodeId) -> ElementRole;

    /// Bounding rectangle of `node`, relative to the viewport.
    fn bounding_rect(&self, node: NodeId) -> Result<Rect, TreeError>;

    /// Current viewport.
    fn viewport(&self) -> Viewport;

    /// Wrap chars `start..end` of a text node in a new mark element and return the mark.
    fn wrap_range(&mut self, node: NodeId, start: usize, end: usize) -> Result<NodeId, TreeError>;

    /// Replace a mark with a plain text node holding its text, then merge adjacent text nodes
    /// under the mark's former parent.
    fn unwrap_mark(&mut self, mark: NodeId) -> Result<(), TreeError>;

    /// Set the mark's highlight color.
    fn paint_mark(&mut self, mark: NodeId, color: &str) -> Result<(), TreeError>;

    /// Scroll so that `node` is visible, using nearest-fit block positioning.
    fn scroll_into_view(
        &mut self,
        node: NodeId,
        behavior: ScrollBehavior,
    ) -> Result<(), TreeError>;

    /// Nearest element ancestor of `node` (its parent for text nodes).
    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if self.kind(id) == Some(NodeKind::Element) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// All text nodes in pre-order document order.
    fn text_leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            match self.kind(node) {
                Some(NodeKind::Text) => out.push(node),
                Some(NodeKind::Element) => {
                    stack.extend(self.children(node).into_iter().rev());
                }
                None => {}
            }
        }
        out
    }

    /// Concatenated text of every text node under `node`, in document order.
    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            match self.kind(id) {
                Some(NodeKind::Text) => {
                    if let Ok(text) = self.text(id) {
                        out.push_str(text);
                    }
                }
                Some(NodeKind::Element) => stack.extend(self.children(id).into_iter().rev()),
                None => {}
            }
        }
        out
    }
}
