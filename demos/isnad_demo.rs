//! End-to-end walkthrough: two agents build trust, one gets revoked, and
//! a delegated agent acts within scope.

use isnad::{presets, AgentIdentity, Attestation, Delegation, PolicyEngine, RevocationEntry, SignedRecord, TrustSubstrate};

fn main() {
    isnad_core::logging::init();

    let alice = AgentIdentity::generate();
    let bob = AgentIdentity::generate();
    let carol = AgentIdentity::generate();

    let engine = PolicyEngine::with_policies(vec![presets::moderate()]);
    let substrate = TrustSubstrate::new(engine);

    for i in 0..3 {
        let mut a = Attestation::new(bob.agent_id(), alice.agent_id(), "deploy-prod", format!("run #{i} succeeded"));
        a.sign(&alice).unwrap();
        substrate.attest(a).unwrap();
    }
    tracing::info!(
        score = substrate.trust_score(bob.agent_id(), None),
        "bob's trust score after three endorsements from alice"
    );

    let root = {
        let mut d = Delegation::new(bob.agent_id(), carol.agent_id(), vec!["deploy".to_string()], None);
        d.sign(&bob).unwrap();
        d
    };
    substrate.add_delegation(root).unwrap();
    tracing::info!(
        authorized = substrate.is_authorized(carol.agent_id(), "deploy"),
        "carol's delegated deploy authorization"
    );

    let action_before = substrate.evaluate(bob.agent_id(), None, None).action;
    tracing::info!(?action_before, "policy decision for bob before revocation");

    let mut revocation = RevocationEntry::new(bob.agent_id(), None, "key compromise reported", alice.agent_id());
    revocation.sign(&alice).unwrap();
    substrate.revoke(revocation).unwrap();

    let action_after = substrate.evaluate(bob.agent_id(), None, None).action;
    tracing::info!(?action_after, "policy decision for bob after revocation");
    tracing::info!(
        authorized = substrate.is_authorized(carol.agent_id(), "deploy"),
        "carol's delegated deploy authorization after bob's revocation"
    );

    let (intact, _) = substrate.verify_audit_integrity();
    tracing::info!(intact, entries = substrate.audit_entries(None).len(), "audit trail state");
}
