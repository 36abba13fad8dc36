//! Hash-chained audit trail for the isnad trust substrate.
//!
//! [`trail::AuditTrail`] is an append-only log: each [`trail::AuditEntry`]
//! embeds the previous entry's hash, so [`trail::AuditTrail::verify_integrity`]
//! can detect any edit, reorder, or deletion after the fact.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod trail;

pub use error::{AuditError, AuditResult};
pub use trail::{AuditEntry, AuditQuery, AuditTrail, GENESIS_HASH};
