//! Bounded-depth, scope-narrowing delegation chains for the isnad trust
//! substrate.
//!
//! [`registry::DelegationRegistry`] enforces chain continuity, scope
//! narrowing, and non-expanding expiry at the moment a delegation is
//! added, so a registry's contents never need re-validating from
//! scratch -- only revocation and expiry are re-checked at query time,
//! since those can change after the fact.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod registry;

pub use error::{DelegationError, DelegationResult};
pub use registry::{DelegationRegistry, DEFAULT_MAX_DEPTH};
