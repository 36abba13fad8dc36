//! The facade's own error type, wrapping each subsystem's errors.

use thiserror::Error;

/// Errors surfaced by [`crate::TrustSubstrate`].
#[derive(Debug, Error)]
pub enum SubstrateError {
    /// An attestation or revocation entry failed to verify or register.
    #[error(transparent)]
    Chain(#[from] isnad_chain::ChainError),

    /// A delegation failed to verify or register.
    #[error(transparent)]
    Delegation(#[from] isnad_delegation::DelegationError),
}

/// Convenience result alias for [`crate::TrustSubstrate`] operations.
pub type SubstrateResult<T> = std::result::Result<T, SubstrateError>;
