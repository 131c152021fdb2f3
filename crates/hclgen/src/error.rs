//! Error types for state rendering.
//!
//! Formatting failures keep the unformatted text around so a caller can still
//! emit something for the resource and report the fault.

use thiserror::Error;

/// Errors that can occur while reading state or rendering config.
#[derive(Debug, Error)]
pub enum Error {
    /// The generated block text was rejected by the formatter
    #[error("failed to format generated config: {message}")]
    Format {
        /// Parser message from the formatter
        message: String,
        /// The unformatted block text
        raw: String,
    },

    /// A list mixes element shapes (the first element decides the shape)
    #[error("attribute '{name}' has a mixed list: element {index} does not match the first element")]
    MixedList {
        /// Attribute name that owns the list
        name: String,
        /// Index of the first offending element
        index: usize,
    },

    /// A list element is itself a list, which has no block form
    #[error("attribute '{name}' has a list nested directly in a list")]
    NestedList {
        /// Attribute name that owns the list
        name: String,
    },

    /// The flattened attribute encoding could not be expanded
    #[error("invalid flattened attribute '{key}': {message}")]
    InvalidFlatmap {
        /// Flat key that failed to parse
        key: String,
        /// What was wrong with it
        message: String,
    },

    /// The state document uses a schema version this crate does not read
    #[error("unsupported state version {0} (supported: 1-3)")]
    UnsupportedStateVersion(u64),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error came from the formatter.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// The unformatted block text, if this is a formatter failure.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Format { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;
