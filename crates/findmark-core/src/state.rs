//! Status reporting.
//!
//! The engine reports to the presentation layer through subscribed callbacks. Every scan
//! completion and every navigation transition produces a [`StatusChange`].

/// What triggered a status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChangeType {
    /// A scan finished and the mark set was replaced.
    ScanCompleted,
    /// The active match changed (default selection, next, previous).
    ActiveChanged,
    /// The widget was opened.
    Opened,
    /// The widget was closed and all marks were removed.
    Closed,
}

/// Snapshot of what the widget displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FindStatus {
    /// Whether the widget is open.
    pub visible: bool,
    /// The query the marks were built for.
    pub query: String,
    /// Number of marks.
    pub match_count: usize,
    /// Active mark, `None` when there is no current match.
    pub active_index: Option<usize>,
}

impl FindStatus {
    /// Active index with `-1` standing for "no current match".
    pub fn active_index_signed(&self) -> isize {
        self.active_index.map_or(-1, |i| i as isize)
    }

    /// Pagination label: `"3/10"`, or `"0/10"` without an active match.
    pub fn label(&self) -> String {
        match self.active_index {
            Some(i) if self.match_count > 0 => format!("{}/{}", i + 1, self.match_count),
            _ => format!("0/{}", self.match_count),
        }
    }
}

/// Status change record
#[derive(Debug, Clone)]
pub struct StatusChange {
    /// Change type
    pub change_type: StatusChangeType,
    /// Status after the change
    pub status: FindStatus,
    /// Engine version after the change
    pub version: u64,
}

/// Status change callback function type
pub type StatusCallback = Box<dyn FnMut(&StatusChange) + Send>;
