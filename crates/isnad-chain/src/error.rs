//! Errors for trust chain and revocation operations.

use thiserror::Error;

/// Errors surfaced by `isnad-chain`.
#[derive(Debug, Error)]
pub enum ChainError {
    /// An attestation or revocation entry's signature didn't verify
    /// against its own declared signer and is rejected at construction
    /// time rather than silently stored unsigned.
    #[error("signature invalid for record {record_id}")]
    SignatureInvalid {
        /// The id of the rejected record.
        record_id: String,
    },

    /// A signed bundle's envelope signature didn't verify. A signed
    /// bundle is rejected atomically: nothing in it is applied, unlike
    /// an unsigned bundle where bad items are filtered individually.
    #[error("bundle signature invalid, rejecting bundle of {count} records")]
    BundleSignatureInvalid {
        /// Number of records the rejected bundle carried.
        count: usize,
    },

    /// The bundle's `format` tag was not a version this crate understands.
    #[error("unsupported bundle format: {0}")]
    UnsupportedBundleFormat(String),

    /// An attestation's own `attestation_id` has been revoked. Revoking an
    /// attestation id is final: re-submitting the same attestation can
    /// never re-admit it.
    #[error("attestation {attestation_id} is revoked")]
    AttestationRevoked {
        /// The id of the revoked attestation.
        attestation_id: String,
    },
}

/// Convenience result alias for `isnad-chain` operations.
pub type ChainResult<T> = std::result::Result<T, ChainError>;
