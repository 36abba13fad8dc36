//! Errors for audit trail serialization.

use thiserror::Error;

/// Errors surfaced by `isnad-audit`.
///
/// Hash-chain breakage is never one of these -- `verify_integrity`
/// reports it as `(false, Some(index))`, not an `Err`.
/// These variants cover the one thing that can genuinely fail:
/// (de)serializing a trail to or from JSON.
#[derive(Debug, Error)]
pub enum AuditError {
    /// JSON (de)serialization failed.
    #[error("audit trail serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience result alias for `isnad-audit` operations.
pub type AuditResult<T> = std::result::Result<T, AuditError>;
