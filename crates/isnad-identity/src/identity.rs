//! Agent identity: an ed25519 keypair and its derived `agent_id`.

use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use isnad_core::canonical::sha256_hex_prefix;
use rand::rngs::OsRng;

use crate::error::{IdentityError, IdentityResult};
use crate::record::SignedRecord;
use crate::rotation::KeyRotation;

/// `agent_id`s are 32 hex characters, derived as
/// `"agent:" ++ hex(sha256(pubkey))[0:32]`.
const AGENT_ID_HEX_LEN: usize = 32;

/// Derive the canonical `agent_id` for a raw 32-byte ed25519 public key.
pub fn agent_id_from_pubkey(pubkey: &[u8; 32]) -> String {
    format!("agent:{}", sha256_hex_prefix(pubkey, AGENT_ID_HEX_LEN))
}

/// A live ed25519 keypair bound to its derived `agent_id`.
///
/// This is the thing a process holds to sign records on behalf of an
/// agent. What travels on the wire and gets stored in records is only the
/// `agent_id` and, once a record is signed, the public key and signature
/// -- never this struct.
pub struct AgentIdentity {
    signing_key: SigningKey,
    agent_id: String,
}

impl AgentIdentity {
    /// Generate a fresh identity with a new random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self::from_signing_key(signing_key)
    }

    /// Reconstruct an identity from a 32-byte ed25519 seed, e.g. one
    /// loaded from secret storage.
    pub fn from_seed(seed: &[u8]) -> IdentityResult<Self> {
        let seed: [u8; 32] = seed
            .try_into()
            .map_err(|_| IdentityError::InvalidKey("seed must be 32 bytes".into()))?;
        Ok(Self::from_signing_key(SigningKey::from_bytes(&seed)))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let agent_id = agent_id_from_pubkey(&signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            agent_id,
        }
    }

    /// This identity's `agent_id`.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Hex-encoded ed25519 public key, as embedded in signed records.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    /// The raw verifying key, for callers that want to verify without
    /// going through a [`crate::record::SignedRecord`].
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Export the 32-byte seed for persistence. Callers are responsible
    /// for zeroizing and protecting the returned bytes.
    pub fn export_seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Sign arbitrary bytes, returning a hex-encoded signature. Used by
    /// [`crate::record::SignedRecord::sign`]; exposed directly for callers
    /// that need to sign something outside the record framework (e.g. a
    /// key-rotation challenge).
    pub fn sign_bytes(&self, bytes: &[u8]) -> String {
        hex::encode(self.signing_key.sign(bytes).to_bytes())
    }

    /// Generate a fresh identity and a [`KeyRotation`] record linking it
    /// back to this one, signed with this identity's (old) key.
    ///
    /// The returned `KeyRotation` is already signed; callers publish it
    /// so that holders of attestations/delegations against the old
    /// `agent_id` can follow the link to the new one.
    pub fn rotate(&self) -> (AgentIdentity, KeyRotation) {
        let new_identity = AgentIdentity::generate();
        let mut rotation = KeyRotation::new(self.agent_id.clone(), new_identity.public_key_hex());
        rotation
            .sign(self)
            .expect("KeyRotation::signer_agent_id() is always the rotating identity's own id");
        (new_identity, rotation)
    }
}

impl std::fmt::Debug for AgentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentIdentity")
            .field("agent_id", &self.agent_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_is_deterministic_for_same_key() {
        let identity = AgentIdentity::generate();
        let seed = identity.export_seed();
        let reloaded = AgentIdentity::from_seed(&seed).unwrap();
        assert_eq!(identity.agent_id(), reloaded.agent_id());
    }

    #[test]
    fn agent_id_has_expected_shape() {
        let identity = AgentIdentity::generate();
        assert!(identity.agent_id().starts_with("agent:"));
        assert_eq!(identity.agent_id().len(), "agent:".len() + AGENT_ID_HEX_LEN);
    }

    #[test]
    fn distinct_keys_yield_distinct_ids() {
        let a = AgentIdentity::generate();
        let b = AgentIdentity::generate();
        assert_ne!(a.agent_id(), b.agent_id());
    }

    #[test]
    fn rejects_wrong_length_seed() {
        assert!(AgentIdentity::from_seed(&[0u8; 16]).is_err());
    }

    #[test]
    fn rotate_yields_a_verifiable_rotation_signed_by_the_old_identity() {
        let old_identity = AgentIdentity::generate();
        let (new_identity, rotation) = old_identity.rotate();
        assert!(rotation.verify());
        assert_eq!(rotation.old_agent_id, old_identity.agent_id());
        assert_eq!(rotation.new_agent_id, new_identity.agent_id());
        assert_ne!(new_identity.agent_id(), old_identity.agent_id());
    }

    #[test]
    fn sign_bytes_is_verifiable() {
        let identity = AgentIdentity::generate();
        let sig_hex = identity.sign_bytes(b"hello isnad");
        let sig_bytes = hex::decode(sig_hex).unwrap();
        let sig_array: [u8; 64] = sig_bytes.try_into().unwrap();
        let signature = ed25519_dalek::Signature::from_bytes(&sig_array);
        use ed25519_dalek::Verifier;
        assert!(identity
            .verifying_key()
            .verify(b"hello isnad", &signature)
            .is_ok());
    }
}
