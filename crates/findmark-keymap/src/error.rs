//! Error types.

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while parsing chords or loading a keymap.
pub enum KeymapError {
    #[error("invalid key chord '{chord}': {reason}")]
    /// The chord text could not be parsed.
    InvalidChord {
        /// The chord as written.
        chord: String,
        /// What was wrong with it.
        reason: String,
    },

    #[error("unknown command '{0}'")]
    /// A binding names a command the engine does not have.
    UnknownCommand(String),

    #[error("keymap json error: {0}")]
    /// The binding table is not valid JSON.
    Json(#[from] serde_json::Error),
}

impl KeymapError {
    pub(crate) fn chord(chord: &str, reason: impl Into<String>) -> Self {
        Self::InvalidChord {
            chord: chord.to_string(),
            reason: reason.into(),
        }
    }
}
