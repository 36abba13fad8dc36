//! The signed-record framework shared by every record type in isnad.
//!
//! One signing/verification path rather than each record type rolling
//! its own: a record exposes a deterministic byte encoding and the id of
//! the agent that must sign it, and this trait supplies `sign`/`verify`
//! against that contract.

use crate::error::{IdentityError, IdentityResult};
use crate::identity::{agent_id_from_pubkey, AgentIdentity};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// A record that can be signed by an [`AgentIdentity`] and later verified
/// by anyone holding the record alone.
///
/// Implementors supply the canonical byte encoding and the identity of the
/// agent that is supposed to sign the record; `sign` and `verify` are then
/// uniform across every record type.
pub trait SignedRecord {
    /// Deterministic bytes to sign and verify. Must not include the
    /// signature or public key fields themselves.
    fn canonical_bytes(&self) -> Vec<u8>;

    /// The `agent_id` of whoever is supposed to sign this record (the
    /// witness for an attestation, the revoker for a revocation entry, the
    /// delegator for a delegation, the prior identity for a key rotation).
    fn signer_agent_id(&self) -> &str;

    /// Hex-encoded ed25519 signature, if the record has been signed.
    fn signature(&self) -> Option<&str>;

    /// Hex-encoded ed25519 public key of the signer, if the record has
    /// been signed.
    fn signer_pubkey(&self) -> Option<&str>;

    /// Attach a signature and the signer's public key to the record.
    fn set_signature(&mut self, signature: String, pubkey_hex: String);

    /// Sign this record with `identity`.
    ///
    /// Fails with [`IdentityError::WrongSigner`] if `identity.agent_id()`
    /// does not match [`SignedRecord::signer_agent_id`] -- signing a
    /// record on behalf of someone else is a programming error, not a
    /// recoverable runtime condition.
    fn sign(&mut self, identity: &AgentIdentity) -> IdentityResult<()> {
        if identity.agent_id() != self.signer_agent_id() {
            return Err(IdentityError::WrongSigner {
                identity_id: identity.agent_id().to_string(),
                record_signer: self.signer_agent_id().to_string(),
            });
        }
        let bytes = self.canonical_bytes();
        let signature = identity.sign_bytes(&bytes);
        self.set_signature(signature, identity.public_key_hex());
        Ok(())
    }

    /// Verify the attached signature against the attached public key, and
    /// that the public key actually derives [`SignedRecord::signer_agent_id`].
    ///
    /// Never errors: an unsigned, malformed, or forged record simply
    /// verifies to `false`.
    fn verify(&self) -> bool {
        let (Some(sig_hex), Some(pubkey_hex)) = (self.signature(), self.signer_pubkey()) else {
            return false;
        };
        let Ok(pubkey_bytes) = hex::decode(pubkey_hex) else {
            return false;
        };
        let Ok(pubkey_array): Result<[u8; 32], _> = pubkey_bytes.try_into() else {
            return false;
        };
        if agent_id_from_pubkey(&pubkey_array) != self.signer_agent_id() {
            return false;
        }
        let Ok(verifying_key) = VerifyingKey::from_bytes(&pubkey_array) else {
            return false;
        };
        let Ok(sig_bytes) = hex::decode(sig_hex) else {
            return false;
        };
        let Ok(sig_array): Result<[u8; 64], _> = sig_bytes.try_into() else {
            return false;
        };
        let signature = Signature::from_bytes(&sig_array);
        verifying_key.verify(&self.canonical_bytes(), &signature).is_ok()
    }
}
