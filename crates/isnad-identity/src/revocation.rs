//! Revocation entries: an agent or authority withdrawing trust.

use isnad_core::canonical::{sha256_hex_prefix, CanonicalBuilder};
use isnad_core::time::now_iso8601;
use serde::{Deserialize, Serialize};

use crate::record::SignedRecord;

/// A signed statement that `target` should no longer be trusted, either
/// globally (`scope: None`) or within a specific scope.
///
/// `RevocationRegistry` (in `isnad-chain`) is the thing that actually
/// indexes and applies these; this type is just the signed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationEntry {
    /// `sha256(canonical content)[0:16]`.
    pub revocation_id: String,
    /// `agent_id` of the agent being revoked.
    pub target: String,
    /// `None` revokes `target` globally; `Some(scope)` revokes it only
    /// within that scope.
    pub scope: Option<String>,
    /// Human-readable reason for the revocation.
    pub reason: String,
    /// `agent_id` of whoever is issuing the revocation.
    pub revoked_by: String,
    /// ISO-8601 UTC timestamp.
    pub timestamp: String,
    /// Hex-encoded ed25519 signature over [`RevocationEntry::canonical_bytes`].
    pub signature: Option<String>,
    /// Hex-encoded ed25519 public key of `revoked_by`.
    pub revoker_pubkey: Option<String>,
}

impl RevocationEntry {
    /// Build a new, unsigned revocation entry timestamped now.
    pub fn new(
        target: impl Into<String>,
        scope: Option<String>,
        reason: impl Into<String>,
        revoked_by: impl Into<String>,
    ) -> Self {
        let target = target.into();
        let reason = reason.into();
        let revoked_by = revoked_by.into();
        let timestamp = now_iso8601();
        let mut entry = Self {
            revocation_id: String::new(),
            target,
            scope,
            reason,
            revoked_by,
            timestamp,
            signature: None,
            revoker_pubkey: None,
        };
        entry.revocation_id = entry.compute_id();
        entry
    }

    fn content_bytes(&self) -> Vec<u8> {
        CanonicalBuilder::new("revocation")
            .field(&self.target)
            .optional(self.scope.as_deref())
            .field(&self.reason)
            .field(&self.revoked_by)
            .field(&self.timestamp)
            .finish()
    }

    fn compute_id(&self) -> String {
        sha256_hex_prefix(&self.content_bytes(), 16)
    }

    /// Whether this entry, if active, revokes trust for `scope` -- a
    /// global entry (`scope: None`) covers every scope, a scoped entry
    /// only covers an exact match.
    pub fn covers(&self, scope: Option<&str>) -> bool {
        match &self.scope {
            None => true,
            Some(entry_scope) => scope == Some(entry_scope.as_str()),
        }
    }
}

impl SignedRecord for RevocationEntry {
    fn canonical_bytes(&self) -> Vec<u8> {
        self.content_bytes()
    }

    fn signer_agent_id(&self) -> &str {
        &self.revoked_by
    }

    fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    fn signer_pubkey(&self) -> Option<&str> {
        self.revoker_pubkey.as_deref()
    }

    fn set_signature(&mut self, signature: String, pubkey_hex: String) {
        self.signature = Some(signature);
        self.revoker_pubkey = Some(pubkey_hex);
    }
}
