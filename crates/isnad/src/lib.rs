//! A trust substrate for autonomous software agents.
//!
//! This crate re-exports every subsystem --
//! [identity](isnad_identity), [trust chains](isnad_chain),
//! [delegation](isnad_delegation), [policy](isnad_policy), and the
//! [audit trail](isnad_audit) -- and adds [`substrate::TrustSubstrate`],
//! the thread-safe facade a host service binds to. Persistence, the wire
//! protocol, and any outer network surface are out of scope; those
//! belong to whatever binds this crate into a service.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod substrate;

pub use error::{SubstrateError, SubstrateResult};
pub use substrate::TrustSubstrate;

pub use isnad_audit::{AuditEntry, AuditTrail, GENESIS_HASH};
pub use isnad_chain::{AttestationBundle, BundleSignature, RevocationRegistry, TrustChain, BUNDLE_FORMAT};
pub use isnad_core::config::TrustConfig;
pub use isnad_delegation::{DelegationRegistry, DEFAULT_MAX_DEPTH};
pub use isnad_identity::{AgentIdentity, Attestation, Delegation, IdentityError, KeyRotation, RevocationEntry, SignedRecord};
pub use isnad_policy::{presets, Action, Decision, EvaluationContext, Policy, PolicyEngine, Requirement, Rule};
