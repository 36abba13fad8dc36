//! Delegations: an agent authorizing another agent to act within a
//! narrowed scope, optionally chained off a prior delegation.

use isnad_core::canonical::{sha256_hex_prefix, CanonicalBuilder};
use isnad_core::time::now_iso8601;
use serde::{Deserialize, Serialize};

use crate::record::SignedRecord;

/// A signed grant from `delegator` to `delegate`, covering `scopes`,
/// optionally expiring at `expires_at`, and optionally chained off a
/// parent delegation by `parent_id`.
///
/// Chains are linked by `parent_id` rather than by the parent's content
/// hash: parent-id-linking tolerates a parent being independently
/// re-signed without breaking every child that points at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delegation {
    /// `sha256(canonical content)[0:16]`.
    pub delegation_id: String,
    /// `agent_id` of the agent granting the delegation.
    pub delegator: String,
    /// `agent_id` of the agent receiving the delegation.
    pub delegate: String,
    /// Scopes this delegation grants. Must be a subset of the parent's
    /// scopes when `parent_id` is set (scope narrowing).
    pub scopes: Vec<String>,
    /// Optional ISO-8601 UTC expiry. Must not be later than the parent's
    /// expiry when `parent_id` is set (non-expanding expiry).
    pub expires_at: Option<String>,
    /// `delegation_id` of the delegation this one is sub-delegated from,
    /// if any.
    pub parent_id: Option<String>,
    /// ISO-8601 UTC timestamp of issuance.
    pub timestamp: String,
    /// Hex-encoded ed25519 signature over [`Delegation::canonical_bytes`].
    pub signature: Option<String>,
    /// Hex-encoded ed25519 public key of `delegator`.
    pub delegator_pubkey: Option<String>,
}

impl Delegation {
    /// Build a new, unsigned root delegation timestamped now.
    pub fn new(
        delegator: impl Into<String>,
        delegate: impl Into<String>,
        scopes: Vec<String>,
        expires_at: Option<String>,
    ) -> Self {
        Self::new_with_parent(delegator, delegate, scopes, expires_at, None)
    }

    /// Build a new, unsigned delegation chained off `parent_id`.
    pub fn new_with_parent(
        delegator: impl Into<String>,
        delegate: impl Into<String>,
        scopes: Vec<String>,
        expires_at: Option<String>,
        parent_id: Option<String>,
    ) -> Self {
        let delegator = delegator.into();
        let delegate = delegate.into();
        let timestamp = now_iso8601();
        let mut delegation = Self {
            delegation_id: String::new(),
            delegator,
            delegate,
            scopes,
            expires_at,
            parent_id,
            timestamp,
            signature: None,
            delegator_pubkey: None,
        };
        delegation.delegation_id = delegation.compute_id();
        delegation
    }

    fn content_bytes(&self) -> Vec<u8> {
        let scopes_joined = self.scopes.join(",");
        CanonicalBuilder::new("delegation")
            .field(&self.delegator)
            .field(&self.delegate)
            .field(&scopes_joined)
            .optional(self.expires_at.as_deref())
            .optional(self.parent_id.as_deref())
            .field(&self.timestamp)
            .finish()
    }

    fn compute_id(&self) -> String {
        sha256_hex_prefix(&self.content_bytes(), 16)
    }
}

impl SignedRecord for Delegation {
    fn canonical_bytes(&self) -> Vec<u8> {
        self.content_bytes()
    }

    fn signer_agent_id(&self) -> &str {
        &self.delegator
    }

    fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    fn signer_pubkey(&self) -> Option<&str> {
        self.delegator_pubkey.as_deref()
    }

    fn set_signature(&mut self, signature: String, pubkey_hex: String) {
        self.signature = Some(signature);
        self.delegator_pubkey = Some(pubkey_hex);
    }
}
