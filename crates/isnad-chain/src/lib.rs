//! Trust chain scoring and revocation for the isnad trust substrate.
//!
//! [`chain::TrustChain`] stores verified attestations and computes direct
//! ([`chain::TrustChain::trust_score`]) and transitive
//! ([`chain::TrustChain::chain_trust`]) trust. [`revocation::RevocationRegistry`]
//! holds the signed revocation entries both scoring functions consult.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod error;
pub mod revocation;

pub use chain::{AttestationBundle, BundleSignature, TrustChain, BUNDLE_FORMAT};
pub use error::{ChainError, ChainResult};
pub use revocation::RevocationRegistry;
