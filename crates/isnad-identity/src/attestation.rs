//! Attestations: a witness vouching for a subject's claim.

use isnad_core::canonical::{sha256_hex_prefix, CanonicalBuilder};
use isnad_core::time::now_iso8601;
use serde::{Deserialize, Serialize};

use crate::record::SignedRecord;

/// A witness's signed vouch for a subject performing some task, e.g. "I
/// observed agent X successfully complete a code review".
///
/// `attestation_id` is derived from the content fields alone, so two
/// attestations with identical subject/witness/task/evidence/timestamp
/// collide by design -- callers that want distinct ids for repeat
/// attestations should vary the timestamp or evidence text.
///
/// Self-attestation (`subject == witness`) is permitted at this layer;
/// rejecting it is left to a service layer that cares about Sybil
/// resistance, not to the core data model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attestation {
    /// `sha256(canonical content)[0:16]`.
    pub attestation_id: String,
    /// `agent_id` of the agent being vouched for.
    pub subject: String,
    /// `agent_id` of the agent making the vouch.
    pub witness: String,
    /// Free-form scope label naming what task the subject is being
    /// vouched for, e.g. `"code-review"` or `"deploy-prod"`. Scoped score
    /// queries match against this field by substring.
    pub task: String,
    /// Free-form URI or description backing the claim -- a PR link, a
    /// commit hash, a ticket id. Carries no scoring weight; purely
    /// evidentiary.
    pub evidence: String,
    /// ISO-8601 UTC timestamp of the attestation.
    pub timestamp: String,
    /// Hex-encoded ed25519 signature over [`Attestation::canonical_bytes`].
    pub signature: Option<String>,
    /// Hex-encoded ed25519 public key of `witness`.
    pub witness_pubkey: Option<String>,
}

impl Attestation {
    /// Build a new, unsigned attestation timestamped now.
    pub fn new(
        subject: impl Into<String>,
        witness: impl Into<String>,
        task: impl Into<String>,
        evidence: impl Into<String>,
    ) -> Self {
        let subject = subject.into();
        let witness = witness.into();
        let task = task.into();
        let evidence = evidence.into();
        let timestamp = now_iso8601();
        let mut attestation = Self {
            attestation_id: String::new(),
            subject,
            witness,
            task,
            evidence,
            timestamp,
            signature: None,
            witness_pubkey: None,
        };
        attestation.attestation_id = attestation.compute_id();
        attestation
    }

    fn content_bytes(&self) -> Vec<u8> {
        CanonicalBuilder::new("attestation")
            .field(&self.subject)
            .field(&self.witness)
            .field(&self.task)
            .field(&self.evidence)
            .field(&self.timestamp)
            .finish()
    }

    fn compute_id(&self) -> String {
        sha256_hex_prefix(&self.content_bytes(), 16)
    }
}

impl SignedRecord for Attestation {
    fn canonical_bytes(&self) -> Vec<u8> {
        self.content_bytes()
    }

    fn signer_agent_id(&self) -> &str {
        &self.witness
    }

    fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    fn signer_pubkey(&self) -> Option<&str> {
        self.witness_pubkey.as_deref()
    }

    fn set_signature(&mut self, signature: String, pubkey_hex: String) {
        self.signature = Some(signature);
        self.witness_pubkey = Some(pubkey_hex);
    }
}
