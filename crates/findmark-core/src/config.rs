//! Engine presentation settings.

use crate::tree::ScrollBehavior;
use serde::{Deserialize, Serialize};

/// Default highlight color of an unselected mark.
pub const DEFAULT_MATCH_COLOR: &str = "#ffff00";
/// Default highlight color of the active mark.
pub const DEFAULT_ACTIVE_COLOR: &str = "#ff9632";

/// How marks are painted and how the active mark is revealed.
///
/// ```rust
/// use findmark_core::{FindConfig, ScrollBehavior};
///
/// let config = FindConfig::from_json(r##"{ "activeColor": "#f00", "scrollBehavior": "instant" }"##)
///     .unwrap();
/// assert_eq!(config.active_color, "#f00");
/// assert_eq!(config.match_color, "#ffff00");
/// assert_eq!(config.scroll_behavior, ScrollBehavior::Instant);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindConfig {
    /// Background of unselected marks.
    pub match_color: String,
    /// Background of the active mark.
    pub active_color: String,
    /// Animation used when revealing the active mark.
    pub scroll_behavior: ScrollBehavior,
}

impl Default for FindConfig {
    fn default() -> Self {
        Self {
            match_color: DEFAULT_MATCH_COLOR.to_string(),
            active_color: DEFAULT_ACTIVE_COLOR.to_string(),
            scroll_behavior: ScrollBehavior::Smooth,
        }
    }
}

impl FindConfig {
    /// Parse a (possibly partial) JSON config; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
