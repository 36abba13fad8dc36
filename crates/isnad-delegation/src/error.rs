//! Errors for delegation chain operations.

use thiserror::Error;

/// Errors surfaced by `isnad-delegation`.
#[derive(Debug, Error)]
pub enum DelegationError {
    /// The delegation's own signature didn't verify.
    #[error("signature invalid for delegation {delegation_id}")]
    SignatureInvalid {
        /// The id of the rejected delegation.
        delegation_id: String,
    },

    /// `parent_id` was set but no such delegation is registered.
    #[error("parent delegation {0} not found")]
    ParentNotFound(String),

    /// The delegator of a child delegation isn't the delegate of its
    /// declared parent -- the chain doesn't actually link up.
    #[error("delegation chain broken: {delegator} is not the delegate of parent {parent_id}")]
    ChainBroken {
        /// The delegator that should have matched the parent's delegate.
        delegator: String,
        /// The parent delegation id.
        parent_id: String,
    },

    /// A child delegation claimed a scope its parent didn't grant.
    #[error("scope expansion: child claims '{scope}' not granted by parent")]
    ScopeExpansion {
        /// The disallowed scope.
        scope: String,
    },

    /// A child delegation's expiry was later than its parent's, or the
    /// child had no expiry while the parent did.
    #[error("expiry expansion: child delegation outlives its parent")]
    ExpiryExpansion,

    /// Adding this delegation would exceed the registry's maximum chain
    /// depth.
    #[error("delegation chain depth {depth} exceeds maximum {max_depth}")]
    DepthExceeded {
        /// The depth the new delegation would sit at.
        depth: usize,
        /// The registry's configured maximum.
        max_depth: usize,
    },
}

/// Convenience result alias for `isnad-delegation` operations.
pub type DelegationResult<T> = std::result::Result<T, DelegationError>;
