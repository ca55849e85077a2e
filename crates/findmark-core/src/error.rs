//! Error types.
//!
//! None of these ever escape [`FindEngine`](crate::FindEngine) operations: the engine logs them
//! and degrades to "fewer or zero matches". They are public so hosts and custom
//! [`TextTree`](crate::TextTree) implementations can produce and inspect them.

use crate::tree::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while compiling a query into a [`MatchRule`](crate::MatchRule).
pub enum RuleError {
    #[error("invalid pattern '{pattern}': {source}")]
    /// The query (in regex mode) is not a valid pattern.
    InvalidPattern {
        /// The pattern text handed to the regex compiler.
        pattern: String,
        /// The compiler error.
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by [`TextTree`](crate::TextTree) operations.
pub enum TreeError {
    #[error("node {0:?} is detached or unknown")]
    /// The node no longer belongs to the document.
    Detached(NodeId),

    #[error("node {0:?} is not a text node")]
    /// A text operation was requested on a non-text node.
    NotText(NodeId),

    #[error("node {0:?} is not an element")]
    /// An element operation was requested on a text node.
    NotElement(NodeId),

    #[error("node {0:?} is not a mark")]
    /// A mark operation was requested on a node that is not a mark element.
    NotMark(NodeId),

    #[error("range {start}..{end} is out of bounds for node {node:?} (length {len})")]
    /// Offsets do not fit the node's current text.
    OutOfBounds {
        /// The text node.
        node: NodeId,
        /// Requested start (chars).
        start: usize,
        /// Requested end (chars).
        end: usize,
        /// Current text length (chars).
        len: usize,
    },

    #[error("range {start}..{end} in node {node:?} collides with an existing mark")]
    /// The range overlaps text that is already wrapped.
    Collision {
        /// The text node.
        node: NodeId,
        /// Requested start (chars).
        start: usize,
        /// Requested end (chars).
        end: usize,
    },
}

#[derive(Debug, Error)]
/// Errors produced when loading or saving persisted preferences.
pub enum PreferencesError {
    #[error("JSON error: {0}")]
    /// Serialization or parsing failed.
    Json(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    /// Reading or writing the backing file failed.
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PreferencesError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            PreferencesError::Io(err.into())
        } else {
            PreferencesError::Json(err)
        }
    }
}
