//! `TrustChain`: the attestation store plus the direct and transitive
//! trust scoring algorithms.

use std::collections::{HashMap, HashSet, VecDeque};

use isnad_core::canonical::sha256_hex;
use isnad_core::config::TrustConfig;
use isnad_identity::{Attestation, SignedRecord};
use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};
use crate::revocation::RevocationRegistry;

/// The bundle format tag this crate reads and writes.
pub const BUNDLE_FORMAT: &str = "isnad-bundle/v1";

/// An envelope signature over an entire [`AttestationBundle`].
///
/// When present, the bundle is verified and applied atomically: a single
/// invalid attestation rejects the whole bundle. When absent, the bundle
/// is treated as a loose batch and bad attestations are filtered
/// individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleSignature {
    /// `agent_id` of whoever signed the bundle envelope.
    pub signer: String,
    /// Hex-encoded ed25519 signature over the bundle's digest.
    pub signature: String,
    /// Hex-encoded ed25519 public key of `signer`.
    pub signer_pubkey: String,
}

/// A portable batch of attestations, as exported by [`TrustChain::export_bundle`]
/// and consumed by [`TrustChain::import_bundle`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationBundle {
    /// Format tag, currently always [`BUNDLE_FORMAT`].
    pub format: String,
    /// The attestations carried by this bundle.
    pub attestations: Vec<Attestation>,
    /// Optional envelope signature over the whole bundle.
    pub bundle_signature: Option<BundleSignature>,
}

impl AttestationBundle {
    /// Digest covering every attestation id in the bundle, in the order
    /// they appear. This is what a bundle envelope signature signs.
    pub fn digest(&self) -> String {
        let joined = self
            .attestations
            .iter()
            .map(|a| a.attestation_id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        sha256_hex(joined.as_bytes())
    }

    fn verify_envelope(&self) -> bool {
        let Some(envelope) = &self.bundle_signature else {
            return false;
        };
        let Ok(pubkey_bytes) = hex::decode(&envelope.signer_pubkey) else {
            return false;
        };
        let Ok(pubkey_array): Result<[u8; 32], _> = pubkey_bytes.try_into() else {
            return false;
        };
        if isnad_identity::agent_id_from_pubkey(&pubkey_array) != envelope.signer {
            return false;
        }
        let Ok(verifying_key) = ed25519_dalek::VerifyingKey::from_bytes(&pubkey_array) else {
            return false;
        };
        let Ok(sig_bytes) = hex::decode(&envelope.signature) else {
            return false;
        };
        let Ok(sig_array): Result<[u8; 64], _> = sig_bytes.try_into() else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&sig_array);
        use ed25519_dalek::Verifier;
        verifying_key
            .verify(self.digest().as_bytes(), &signature)
            .is_ok()
    }
}

/// The store of verified attestations between agents, and the scoring
/// algorithms computed over it.
///
/// `TrustChain` holds no locks and no shared mutable state -- callers that
/// need concurrent access wrap an instance in whatever synchronization
/// primitive fits their service.
#[derive(Debug, Default)]
pub struct TrustChain {
    attestations: Vec<Attestation>,
    by_subject: HashMap<String, Vec<usize>>,
    by_witness: HashMap<String, Vec<usize>>,
}

impl TrustChain {
    /// An empty trust chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify and add a single attestation.
    ///
    /// Rejects an attestation whose signature doesn't verify, and one
    /// whose own `attestation_id` has itself been revoked -- a revoked
    /// attestation can never be re-admitted by re-submitting it.
    pub fn add(&mut self, attestation: Attestation, revocations: &RevocationRegistry) -> ChainResult<()> {
        if !attestation.verify() {
            return Err(ChainError::SignatureInvalid {
                record_id: attestation.attestation_id.clone(),
            });
        }
        if revocations.is_revoked(&attestation.attestation_id, None) {
            return Err(ChainError::AttestationRevoked {
                attestation_id: attestation.attestation_id.clone(),
            });
        }
        tracing::debug!(
            attestation_id = %attestation.attestation_id,
            witness = %attestation.witness,
            subject = %attestation.subject,
            "attestation added"
        );
        self.insert_verified(attestation);
        Ok(())
    }

    /// Administrative reset: remove every attestation naming `agent_id` as
    /// subject or witness, returning how many were removed. Rebuilds the
    /// secondary indexes from scratch.
    pub fn delete_agent(&mut self, agent_id: &str) -> usize {
        let before = self.attestations.len();
        self.attestations
            .retain(|a| a.subject != agent_id && a.witness != agent_id);
        let removed = before - self.attestations.len();
        if removed > 0 {
            self.by_subject.clear();
            self.by_witness.clear();
            for (index, attestation) in self.attestations.iter().enumerate() {
                self.by_subject.entry(attestation.subject.clone()).or_default().push(index);
                self.by_witness.entry(attestation.witness.clone()).or_default().push(index);
            }
            tracing::warn!(agent_id, removed, "agent deleted from trust chain");
        }
        removed
    }

    fn insert_verified(&mut self, attestation: Attestation) {
        let index = self.attestations.len();
        self.by_subject
            .entry(attestation.subject.clone())
            .or_default()
            .push(index);
        self.by_witness
            .entry(attestation.witness.clone())
            .or_default()
            .push(index);
        self.attestations.push(attestation);
    }

    /// Import a bundle of attestations.
    ///
    /// If the bundle carries an envelope signature, the whole bundle is
    /// rejected atomically on any invalid attestation or a bad envelope
    /// signature. If it doesn't, invalid attestations are dropped
    /// individually and the rest are applied. Returns the number of
    /// attestations actually added.
    pub fn import_bundle(&mut self, bundle: &AttestationBundle) -> ChainResult<usize> {
        if bundle.format != BUNDLE_FORMAT {
            return Err(ChainError::UnsupportedBundleFormat(bundle.format.clone()));
        }

        if bundle.bundle_signature.is_some() {
            if !bundle.verify_envelope() {
                return Err(ChainError::BundleSignatureInvalid {
                    count: bundle.attestations.len(),
                });
            }
            if !bundle.attestations.iter().all(|a| a.verify()) {
                return Err(ChainError::BundleSignatureInvalid {
                    count: bundle.attestations.len(),
                });
            }
            for attestation in &bundle.attestations {
                self.insert_verified(attestation.clone());
            }
            return Ok(bundle.attestations.len());
        }

        let mut added = 0;
        for attestation in &bundle.attestations {
            if attestation.verify() {
                self.insert_verified(attestation.clone());
                added += 1;
            } else {
                tracing::warn!(
                    attestation_id = %attestation.attestation_id,
                    "dropping unverifiable attestation from unsigned bundle"
                );
            }
        }
        Ok(added)
    }

    /// Export every attestation naming `subject` as an unsigned bundle.
    pub fn export_bundle(&self, subject: &str) -> AttestationBundle {
        let attestations = self
            .by_subject
            .get(subject)
            .map(|indices| indices.iter().map(|&i| self.attestations[i].clone()).collect())
            .unwrap_or_default();
        AttestationBundle {
            format: BUNDLE_FORMAT.to_string(),
            attestations,
            bundle_signature: None,
        }
    }

    /// All attestations naming `subject`, in insertion order.
    pub fn attestations_for_subject(&self, subject: &str) -> Vec<&Attestation> {
        self.by_subject
            .get(subject)
            .map(|indices| indices.iter().map(|&i| &self.attestations[i]).collect())
            .unwrap_or_default()
    }

    /// All attestations made by `witness`, in insertion order.
    pub fn attestations_by_witness(&self, witness: &str) -> Vec<&Attestation> {
        self.by_witness
            .get(witness)
            .map(|indices| indices.iter().map(|&i| &self.attestations[i]).collect())
            .unwrap_or_default()
    }

    /// Direct trust score for `subject` within an optional `scope`.
    ///
    /// `scope`, when given, filters to attestations whose `task` contains
    /// it as a substring -- not an exact match -- so a scope of `"deploy"`
    /// picks up both `"deploy-staging"` and `"deploy-prod"` attestations.
    /// Attestations are grouped by witness; a witness's k-th attestation
    /// (0-indexed) contributes `config.base * config.repeat_decay.powi(k)`,
    /// so repeated vouching from the same witness yields diminishing
    /// returns rather than linear accumulation. Contributions from every
    /// witness are summed.
    ///
    /// Returns `0.0` if `subject` is revoked (globally, or within `scope`
    /// when given) -- revocation overrides every prior attestation rather
    /// than just suppressing future ones.
    pub fn trust_score(
        &self,
        subject: &str,
        scope: Option<&str>,
        config: &TrustConfig,
        revocations: &RevocationRegistry,
    ) -> f64 {
        if revocations.is_revoked(subject, scope) {
            return 0.0;
        }

        let mut per_witness: HashMap<&str, usize> = HashMap::new();
        let mut score = 0.0;
        for attestation in self.attestations_for_subject(subject) {
            if revocations.is_revoked(&attestation.witness, scope) {
                continue;
            }
            if revocations.is_revoked(&attestation.attestation_id, None) {
                continue;
            }
            if let Some(wanted) = scope {
                if !attestation.task.contains(wanted) {
                    continue;
                }
            }
            let repeat = per_witness.entry(attestation.witness.as_str()).or_insert(0);
            score += config.base * config.repeat_decay.powi(*repeat as i32);
            *repeat += 1;
        }
        score
    }

    /// Transitive trust from `from` to `to`, computed as the best
    /// (highest-scoring) witness path through the attestation graph:
    /// `config.chain_decay.powi(hop_count)`, one hop being a direct
    /// attestation.
    ///
    /// A breadth-first search over "has attested for" edges, bounded by
    /// `max_hops` (default [`TrustConfig::default_max_hops`]) and guarded
    /// against cycles with a visited set, since the attestation graph is
    /// not guaranteed to be acyclic. Returns `0.0` for a self-query: there
    /// is no path from an agent to itself, only the trivial empty one.
    pub fn chain_trust(
        &self,
        from: &str,
        to: &str,
        scope: Option<&str>,
        config: &TrustConfig,
        revocations: &RevocationRegistry,
        max_hops: Option<usize>,
    ) -> f64 {
        if revocations.is_revoked(to, scope) || revocations.is_revoked(from, scope) {
            return 0.0;
        }

        let max_hops = max_hops.unwrap_or(config.default_max_hops);
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(from);
        let mut frontier: VecDeque<(&str, f64, usize)> = VecDeque::new();
        frontier.push_back((from, 1.0, 0));
        let mut best: f64 = 0.0;

        while let Some((node, carried, hops)) = frontier.pop_front() {
            if hops >= max_hops {
                continue;
            }
            for attestation in self.attestations_by_witness(node) {
                if revocations.is_revoked(&attestation.subject, scope) {
                    continue;
                }
                if revocations.is_revoked(&attestation.attestation_id, None) {
                    continue;
                }
                if let Some(wanted) = scope {
                    if !attestation.task.contains(wanted) {
                        continue;
                    }
                }
                let next_score = carried * config.chain_decay;
                if attestation.subject == to {
                    best = best.max(next_score);
                    continue;
                }
                if visited.insert(attestation.subject.as_str()) {
                    frontier.push_back((attestation.subject.as_str(), next_score, hops + 1));
                }
            }
        }

        best
    }
}
