//! Key rotation: an identity retiring its keypair in favor of a new one.

use isnad_core::canonical::{sha256_hex_prefix, CanonicalBuilder};
use isnad_core::time::now_iso8601;
use serde::{Deserialize, Serialize};

use crate::identity::agent_id_from_pubkey;
use crate::record::SignedRecord;

/// A signed statement, made with the *old* key, that `old_agent_id` has
/// rotated to a new keypair whose derived id is `new_agent_id`.
///
/// Signing with the old key (rather than the new one) is what lets a
/// verifier who already trusts `old_agent_id` extend that trust to
/// `new_agent_id` without an out-of-band introduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRotation {
    /// `sha256(canonical content)[0:16]`.
    pub rotation_id: String,
    /// `agent_id` derived from the retiring key.
    pub old_agent_id: String,
    /// `agent_id` derived from the incoming key.
    pub new_agent_id: String,
    /// Hex-encoded ed25519 public key of the incoming identity.
    pub new_pubkey: String,
    /// ISO-8601 UTC timestamp of the rotation.
    pub timestamp: String,
    /// Hex-encoded ed25519 signature, made with the *old* key, over
    /// [`KeyRotation::canonical_bytes`].
    pub signature: Option<String>,
    /// Hex-encoded ed25519 public key of the retiring identity.
    pub old_pubkey: Option<String>,
}

impl KeyRotation {
    /// Build a new, unsigned key rotation timestamped now.
    ///
    /// `new_agent_id` is derived from `new_pubkey` rather than taken on
    /// trust, so a rotation record can never claim a `new_agent_id` that
    /// doesn't match the key it carries.
    pub fn new(old_agent_id: impl Into<String>, new_pubkey_hex: impl Into<String>) -> Self {
        let old_agent_id = old_agent_id.into();
        let new_pubkey = new_pubkey_hex.into();
        let new_agent_id = hex::decode(&new_pubkey)
            .ok()
            .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok())
            .map(|arr| agent_id_from_pubkey(&arr))
            .unwrap_or_default();
        let timestamp = now_iso8601();
        let mut rotation = Self {
            rotation_id: String::new(),
            old_agent_id,
            new_agent_id,
            new_pubkey,
            timestamp,
            signature: None,
            old_pubkey: None,
        };
        rotation.rotation_id = rotation.compute_id();
        rotation
    }

    fn content_bytes(&self) -> Vec<u8> {
        CanonicalBuilder::new("key_rotation")
            .field(&self.old_agent_id)
            .field(&self.new_agent_id)
            .field(&self.new_pubkey)
            .field(&self.timestamp)
            .finish()
    }

    fn compute_id(&self) -> String {
        sha256_hex_prefix(&self.content_bytes(), 16)
    }
}

impl SignedRecord for KeyRotation {
    fn canonical_bytes(&self) -> Vec<u8> {
        self.content_bytes()
    }

    fn signer_agent_id(&self) -> &str {
        &self.old_agent_id
    }

    fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    fn signer_pubkey(&self) -> Option<&str> {
        self.old_pubkey.as_deref()
    }

    fn set_signature(&mut self, signature: String, pubkey_hex: String) {
        self.signature = Some(signature);
        self.old_pubkey = Some(pubkey_hex);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AgentIdentity;

    #[test]
    fn rotation_derives_new_agent_id_from_new_pubkey() {
        let new_identity = AgentIdentity::generate();
        let rotation = KeyRotation::new("agent:old", new_identity.public_key_hex());
        assert_eq!(rotation.new_agent_id, new_identity.agent_id());
    }

    #[test]
    fn signed_with_old_key_verifies() {
        let old_identity = AgentIdentity::generate();
        let new_identity = AgentIdentity::generate();
        let mut rotation = KeyRotation::new(old_identity.agent_id(), new_identity.public_key_hex());
        rotation.sign(&old_identity).unwrap();
        assert!(rotation.verify());
    }

    #[test]
    fn signing_with_new_key_is_rejected() {
        let old_identity = AgentIdentity::generate();
        let new_identity = AgentIdentity::generate();
        let mut rotation = KeyRotation::new(old_identity.agent_id(), new_identity.public_key_hex());
        assert!(rotation.sign(&new_identity).is_err());
    }
}
