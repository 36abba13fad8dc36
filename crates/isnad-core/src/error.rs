//! Core error types shared by crates that don't need a richer domain error.

use thiserror::Error;

/// Generic error surfaced by the shared glue (canonicalization, config, time).
#[derive(Debug, Error)]
pub enum CoreError {
    /// A field required for canonical encoding was malformed.
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        /// Field name.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Wrapped I/O error (e.g. reading a config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias for `isnad-core` operations.
pub type Result<T> = std::result::Result<T, CoreError>;
