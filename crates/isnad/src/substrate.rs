//! `TrustSubstrate`: the concurrency-wrapped facade tying every subsystem
//! together.
//!
//! Each core type (`TrustChain`, `RevocationRegistry`, `DelegationRegistry`,
//! `AuditTrail`) is a plain owned struct with no internal locking -- that
//! discipline lives here instead, at the one layer that actually needs
//! shared access across concurrent callers.

use std::sync::{Mutex, RwLock};

use isnad_audit::AuditTrail;
use isnad_chain::{RevocationRegistry, TrustChain};
use isnad_core::config::TrustConfig;
use isnad_delegation::DelegationRegistry;
use isnad_identity::{Attestation, Delegation, RevocationEntry};
use isnad_policy::{Action, Decision, EvaluationContext, PolicyEngine};

use crate::error::SubstrateResult;

/// A single, thread-safe handle onto a trust chain, revocation registry,
/// delegation registry, policy engine, and audit trail.
///
/// `TrustSubstrate` is the thing a service binds to an HTTP handler or a
/// gRPC service -- it is out of scope for this crate itself but
/// everything needed to build one lives here.
pub struct TrustSubstrate {
    chain: RwLock<TrustChain>,
    revocations: RwLock<RevocationRegistry>,
    delegations: RwLock<DelegationRegistry>,
    audit: Mutex<AuditTrail>,
    policy: PolicyEngine,
    config: TrustConfig,
}

impl TrustSubstrate {
    /// Build a substrate with the default [`TrustConfig`] and the given
    /// policy engine.
    pub fn new(policy: PolicyEngine) -> Self {
        Self::with_config(policy, TrustConfig::default())
    }

    /// Build a substrate with a custom [`TrustConfig`].
    pub fn with_config(policy: PolicyEngine, config: TrustConfig) -> Self {
        Self {
            chain: RwLock::new(TrustChain::new()),
            revocations: RwLock::new(RevocationRegistry::new()),
            delegations: RwLock::new(DelegationRegistry::new()),
            audit: Mutex::new(AuditTrail::new()),
            policy,
            config,
        }
    }

    /// Register a verified attestation and record it in the audit trail.
    pub fn attest(&self, attestation: Attestation) -> SubstrateResult<()> {
        let subject = attestation.subject.clone();
        let witness = attestation.witness.clone();
        let revocations = self.revocations.read().expect("revocation registry lock poisoned");
        self.chain
            .write()
            .expect("trust chain lock poisoned")
            .add(attestation, &revocations)?;
        drop(revocations);
        self.audit
            .lock()
            .expect("audit trail lock poisoned")
            .log_note("attestation_added", &subject, format!("witnessed by {witness}"));
        Ok(())
    }

    /// Register a verified revocation entry and record it in the audit
    /// trail.
    pub fn revoke(&self, entry: RevocationEntry) -> SubstrateResult<()> {
        let target = entry.target.clone();
        let revoked_by = entry.revoked_by.clone();
        self.revocations
            .write()
            .expect("revocation registry lock poisoned")
            .revoke(entry)?;
        self.audit
            .lock()
            .expect("audit trail lock poisoned")
            .log_note("revocation_issued", &target, format!("revoked by {revoked_by}"));
        Ok(())
    }

    /// Register a verified delegation and record it in the audit trail.
    pub fn add_delegation(&self, delegation: Delegation) -> SubstrateResult<()> {
        let delegator = delegation.delegator.clone();
        let delegate = delegation.delegate.clone();
        self.delegations
            .write()
            .expect("delegation registry lock poisoned")
            .add(delegation)?;
        self.audit
            .lock()
            .expect("audit trail lock poisoned")
            .log_note("delegation_added", &delegate, format!("delegated by {delegator}"));
        Ok(())
    }

    /// Direct trust score for `subject`, optionally scoped.
    pub fn trust_score(&self, subject: &str, scope: Option<&str>) -> f64 {
        let chain = self.chain.read().expect("trust chain lock poisoned");
        let revocations = self.revocations.read().expect("revocation registry lock poisoned");
        chain.trust_score(subject, scope, &self.config, &revocations)
    }

    /// Transitive trust from `from` to `to`, optionally scoped.
    pub fn chain_trust(&self, from: &str, to: &str, scope: Option<&str>) -> f64 {
        let chain = self.chain.read().expect("trust chain lock poisoned");
        let revocations = self.revocations.read().expect("revocation registry lock poisoned");
        chain.chain_trust(from, to, scope, &self.config, &revocations, None)
    }

    /// Whether `agent_id` is currently revoked, optionally scoped.
    pub fn is_revoked(&self, agent_id: &str, scope: Option<&str>) -> bool {
        self.revocations
            .read()
            .expect("revocation registry lock poisoned")
            .is_revoked(agent_id, scope)
    }

    /// Whether `agent_id` holds a valid delegation authorizing `scope`.
    pub fn is_authorized(&self, agent_id: &str, scope: &str) -> bool {
        let delegations = self.delegations.read().expect("delegation registry lock poisoned");
        let revocations = self.revocations.read().expect("revocation registry lock poisoned");
        delegations.is_authorized(agent_id, scope, &revocations)
    }

    /// Gather trust score, chain trust (if `relative_to` is given),
    /// revocation, and delegation facts for `agent_id`, and resolve the
    /// configured policy engine's decision. Logs the outcome to the audit
    /// trail.
    pub fn evaluate(&self, agent_id: &str, scope: Option<&str>, relative_to: Option<&str>) -> Decision {
        let trust_score = self.trust_score(agent_id, scope);
        let chain_trust = relative_to.map(|from| self.chain_trust(from, agent_id, scope));
        let is_revoked = self.is_revoked(agent_id, scope);
        let is_delegated_authorized = scope
            .map(|s| self.is_authorized(agent_id, s))
            .unwrap_or(false);

        let mut ctx = EvaluationContext::new(agent_id, trust_score).with_revoked(is_revoked);
        if let Some(scope) = scope {
            ctx = ctx.with_scope(scope);
        }
        if let Some(chain_trust) = chain_trust {
            ctx = ctx.with_chain_trust(chain_trust);
        }
        ctx = ctx.with_delegated_authorized(is_delegated_authorized);

        let action = self.policy.evaluate(&ctx);
        let decision = Decision {
            action,
            controlling_rule: None,
        };
        self.audit.lock().expect("audit trail lock poisoned").log_note(
            "policy_decision",
            agent_id,
            format!("{action:?}"),
        );
        decision
    }

    /// The most recently resolved action, without logging -- a cheap
    /// variant of [`TrustSubstrate::evaluate`] for callers that only
    /// need `Action`.
    pub fn evaluate_action(&self, agent_id: &str, scope: Option<&str>, relative_to: Option<&str>) -> Action {
        self.evaluate(agent_id, scope, relative_to).action
    }

    /// Every audit entry logged so far, matching `event_type` if given.
    pub fn audit_entries(&self, event_type: Option<&str>) -> Vec<isnad_audit::AuditEntry> {
        self.audit
            .lock()
            .expect("audit trail lock poisoned")
            .query(event_type)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Audit entries matching an [`isnad_audit::AuditQuery`] filter.
    pub fn audit_entries_filtered(&self, filter: &isnad_audit::AuditQuery) -> Vec<isnad_audit::AuditEntry> {
        self.audit
            .lock()
            .expect("audit trail lock poisoned")
            .query_filtered(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Whether the audit trail is internally consistent.
    pub fn verify_audit_integrity(&self) -> (bool, Option<usize>) {
        self.audit.lock().expect("audit trail lock poisoned").verify_integrity()
    }

    /// Administrative reset: clear every revocation entry recorded against
    /// `target`, reinstating it. Logs the reset to the audit trail.
    pub fn unrevoke(&self, target: &str) -> usize {
        let removed = self
            .revocations
            .write()
            .expect("revocation registry lock poisoned")
            .unrevoke(target);
        if removed > 0 {
            self.audit.lock().expect("audit trail lock poisoned").log_note(
                "revocation_reset",
                target,
                format!("{removed} entries cleared"),
            );
        }
        removed
    }

    /// Administrative reset: remove `agent_id` from the trust chain and
    /// delegation registry wherever it appears, cascading to every
    /// attestation and delegation naming it. Logs the reset to the audit
    /// trail.
    pub fn delete_agent(&self, agent_id: &str) -> usize {
        let chain_removed = self
            .chain
            .write()
            .expect("trust chain lock poisoned")
            .delete_agent(agent_id);
        let delegations_removed = self
            .delegations
            .write()
            .expect("delegation registry lock poisoned")
            .delete_agent(agent_id);
        let removed = chain_removed + delegations_removed;
        if removed > 0 {
            self.audit.lock().expect("audit trail lock poisoned").log_note(
                "agent_deleted",
                agent_id,
                format!("{chain_removed} attestations, {delegations_removed} delegations removed"),
            );
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isnad_identity::{AgentIdentity, SignedRecord};
    use isnad_policy::presets;

    #[test]
    fn end_to_end_attest_and_evaluate() {
        let alice = AgentIdentity::generate();
        let mut a = Attestation::new("agent:bob", alice.agent_id(), "shipped release", "v1.2.3");
        a.sign(&alice).unwrap();

        let engine = PolicyEngine::with_policies(vec![presets::moderate()]);
        let substrate = TrustSubstrate::new(engine);
        substrate.attest(a).unwrap();

        let decision = substrate.evaluate("agent:bob", None, None);
        assert_eq!(decision.action, Action::RateLimit);
        assert_eq!(substrate.verify_audit_integrity(), (true, None));
        assert_eq!(substrate.audit_entries(Some("attestation_added")).len(), 1);
    }

    #[test]
    fn revocation_flows_through_to_policy_decision() {
        let alice = AgentIdentity::generate();
        let mut a = Attestation::new("agent:bob", alice.agent_id(), "shipped release", "v1.2.3");
        a.sign(&alice).unwrap();

        let mut entry = RevocationEntry::new("agent:bob", None, "compromised", alice.agent_id());
        entry.sign(&alice).unwrap();

        let engine = PolicyEngine::with_policies(vec![presets::permissive()]);
        let substrate = TrustSubstrate::new(engine);
        substrate.attest(a).unwrap();
        substrate.revoke(entry).unwrap();

        let decision = substrate.evaluate("agent:bob", None, None);
        assert_eq!(decision.action, Action::Deny);
    }

    #[test]
    fn unrevoke_reinstates_trust_score() {
        let alice = AgentIdentity::generate();
        let mut a = Attestation::new("agent:bob", alice.agent_id(), "shipped release", "v1.2.3");
        a.sign(&alice).unwrap();

        let mut entry = RevocationEntry::new("agent:bob", None, "compromised", alice.agent_id());
        entry.sign(&alice).unwrap();

        let engine = PolicyEngine::with_policies(vec![presets::permissive()]);
        let substrate = TrustSubstrate::new(engine);
        substrate.attest(a).unwrap();
        substrate.revoke(entry).unwrap();
        assert!(substrate.is_revoked("agent:bob", None));

        let removed = substrate.unrevoke("agent:bob");
        assert_eq!(removed, 1);
        assert!(!substrate.is_revoked("agent:bob", None));
        assert!(substrate.trust_score("agent:bob", None) > 0.0);
    }

    #[test]
    fn delete_agent_cascades_through_chain_and_delegations() {
        let alice = AgentIdentity::generate();
        let mut a = Attestation::new("agent:bob", alice.agent_id(), "shipped release", "v1.2.3");
        a.sign(&alice).unwrap();

        let mut delegation = isnad_identity::Delegation::new(alice.agent_id(), "agent:bob", vec!["deploy".to_string()], None);
        delegation.sign(&alice).unwrap();

        let engine = PolicyEngine::with_policies(vec![presets::permissive()]);
        let substrate = TrustSubstrate::new(engine);
        substrate.attest(a).unwrap();
        substrate.add_delegation(delegation).unwrap();
        assert!(substrate.is_authorized("agent:bob", "deploy"));

        let removed = substrate.delete_agent("agent:bob");
        assert_eq!(removed, 2);
        assert_eq!(substrate.trust_score("agent:bob", None), 0.0);
        assert!(!substrate.is_authorized("agent:bob", "deploy"));
    }
}
