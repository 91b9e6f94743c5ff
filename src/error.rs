//! Error types for express-decorate.
//!
//! Decoration is best-effort: the page orchestrator turns every error a pass
//! returns into a logged warning and moves on, so the authored HTML always
//! stays usable even when an enhancement is skipped.

/// Error type for decoration operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A fetched resource could not be retrieved.
    #[error("fetching {location} failed: {reason}")]
    Fetch {
        /// Path or URL that was requested.
        location: String,
        /// What went wrong.
        reason: String,
    },

    /// A fetched JSON resource did not have the expected shape.
    #[error("malformed JSON from {location}: {source}")]
    Json {
        /// Path or URL the JSON came from.
        location: String,
        /// Underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// The authored markup did not have the shape a decorator expects.
    #[error("unexpected markup in {block}: expected {expected}")]
    Shape {
        /// Block or page region being decorated.
        block: String,
        /// Human readable description of the expected shape.
        expected: String,
    },

    /// The page URL (or a URL found in content) could not be parsed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Shape`] error.
    pub(crate) fn shape(block: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Shape {
            block: block.into(),
            expected: expected.into(),
        }
    }
}

/// Result type alias for decoration operations.
pub type Result<T> = std::result::Result<T, Error>;
