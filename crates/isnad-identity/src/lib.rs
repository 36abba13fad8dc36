//! Agent identity and the signed-record framework for the isnad trust
//! substrate.
//!
//! An [`identity::AgentIdentity`] is an ed25519 keypair together with its
//! derived `agent_id`. Every other record type in this crate --
//! [`attestation::Attestation`], [`revocation::RevocationEntry`],
//! [`delegation::Delegation`], [`rotation::KeyRotation`] -- implements
//! [`record::SignedRecord`], which gives them a single, uniform
//! sign/verify path instead of each rolling its own.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attestation;
pub mod delegation;
pub mod error;
pub mod identity;
pub mod record;
pub mod revocation;
pub mod rotation;

pub use attestation::Attestation;
pub use delegation::Delegation;
pub use error::{IdentityError, IdentityResult};
pub use identity::{agent_id_from_pubkey, AgentIdentity};
pub use record::SignedRecord;
pub use revocation::RevocationEntry;
pub use rotation::KeyRotation;
