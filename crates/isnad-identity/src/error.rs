//! Error types for identity and signed-record operations.

use thiserror::Error;

/// Errors surfaced by `isnad-identity`.
///
/// A failed signature check is never an error here -- it's a `false`
/// return from `verify()`. These variants are reserved for
/// genuine invariant violations: signing with the wrong key, malformed key
/// material, or a structurally invalid record.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// `sign()` was called with an identity whose `agent_id` does not match
    /// the record's declared signer field.
    #[error("wrong signer: identity {identity_id} does not match record signer {record_signer}")]
    WrongSigner {
        /// The identity that attempted to sign.
        identity_id: String,
        /// The signer the record declares.
        record_signer: String,
    },

    /// Key material was the wrong length or otherwise malformed.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// A record violated a structural invariant at construction time.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A required field was empty or otherwise malformed.
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        /// Field name.
        field: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Convenience result alias for `isnad-identity` operations.
pub type IdentityResult<T> = std::result::Result<T, IdentityError>;
