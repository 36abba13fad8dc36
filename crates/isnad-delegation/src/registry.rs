//! `DelegationRegistry`: bounded-depth, scope-narrowing delegation chains.

use std::collections::HashMap;

use isnad_chain::RevocationRegistry;
use isnad_core::time::now_iso8601;
use isnad_identity::{AgentIdentity, Delegation, SignedRecord};

use crate::error::{DelegationError, DelegationResult};

/// Default bound on how many hops a delegation chain may have before
/// `add` refuses to extend it further.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// The store of signed delegations and the chain-validity checks over it.
///
/// Chains are linked by `parent_id`: adding a child
/// delegation checks that its delegator is the parent's delegate, that
/// its scopes are a subset of the parent's, and that its expiry is no
/// later than the parent's. None of this is re-derived at query time --
/// it's enforced once, at `add`, so a registry's contents are always
/// internally consistent.
#[derive(Debug)]
pub struct DelegationRegistry {
    by_id: HashMap<String, Delegation>,
    by_delegate: HashMap<String, Vec<String>>,
    max_depth: usize,
}

impl Default for DelegationRegistry {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl DelegationRegistry {
    /// An empty registry using [`DEFAULT_MAX_DEPTH`].
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry with a custom maximum chain depth.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            by_id: HashMap::new(),
            by_delegate: HashMap::new(),
            max_depth,
        }
    }

    /// Verify and register a delegation, enforcing chain continuity,
    /// scope narrowing, non-expanding expiry, and the depth bound.
    pub fn add(&mut self, delegation: Delegation) -> DelegationResult<()> {
        if !delegation.verify() {
            return Err(DelegationError::SignatureInvalid {
                delegation_id: delegation.delegation_id.clone(),
            });
        }

        let depth = match &delegation.parent_id {
            None => 0,
            Some(parent_id) => {
                let parent = self
                    .by_id
                    .get(parent_id)
                    .ok_or_else(|| DelegationError::ParentNotFound(parent_id.clone()))?;

                if delegation.delegator != parent.delegate {
                    return Err(DelegationError::ChainBroken {
                        delegator: delegation.delegator.clone(),
                        parent_id: parent_id.clone(),
                    });
                }

                for scope in &delegation.scopes {
                    if !parent.scopes.iter().any(|s| s == scope) {
                        return Err(DelegationError::ScopeExpansion {
                            scope: scope.clone(),
                        });
                    }
                }

                if let Some(parent_expiry) = &parent.expires_at {
                    match &delegation.expires_at {
                        None => return Err(DelegationError::ExpiryExpansion),
                        Some(child_expiry) if child_expiry > parent_expiry => {
                            return Err(DelegationError::ExpiryExpansion)
                        }
                        _ => {}
                    }
                }

                self.depth_of(parent_id) + 1
            }
        };

        if depth >= self.max_depth {
            return Err(DelegationError::DepthExceeded {
                depth,
                max_depth: self.max_depth,
            });
        }

        tracing::debug!(
            delegation_id = %delegation.delegation_id,
            delegator = %delegation.delegator,
            delegate = %delegation.delegate,
            depth,
            "delegation added"
        );
        self.by_delegate
            .entry(delegation.delegate.clone())
            .or_default()
            .push(delegation.delegation_id.clone());
        self.by_id.insert(delegation.delegation_id.clone(), delegation);
        Ok(())
    }

    fn depth_of(&self, delegation_id: &str) -> usize {
        let mut depth = 0;
        let mut current = self.by_id.get(delegation_id);
        while let Some(d) = current {
            match &d.parent_id {
                Some(parent_id) => {
                    depth += 1;
                    current = self.by_id.get(parent_id);
                }
                None => break,
            }
        }
        depth
    }

    /// Build, sign, and register a delegation chained off `parent_id`.
    pub fn sub_delegate(
        &mut self,
        parent_id: &str,
        identity: &AgentIdentity,
        delegate: impl Into<String>,
        scopes: Vec<String>,
        expires_at: Option<String>,
    ) -> DelegationResult<Delegation> {
        if !self.by_id.contains_key(parent_id) {
            return Err(DelegationError::ParentNotFound(parent_id.to_string()));
        }
        let mut delegation = Delegation::new_with_parent(
            identity.agent_id(),
            delegate,
            scopes,
            expires_at,
            Some(parent_id.to_string()),
        );
        delegation
            .sign(identity)
            .map_err(|_| DelegationError::SignatureInvalid {
                delegation_id: delegation.delegation_id.clone(),
            })?;
        self.add(delegation.clone())?;
        Ok(delegation)
    }

    /// Walk `delegation_id` back to its root, checking every hop's
    /// signature, revocation status, and expiry.
    ///
    /// Structural invariants (continuity, scope narrowing, non-expanding
    /// expiry, depth) were already enforced at `add` time; this re-checks
    /// what can change afterward: a participant getting revoked, or a
    /// delegation simply expiring.
    pub fn verify_chain(&self, delegation_id: &str, revocations: &RevocationRegistry) -> bool {
        let now = now_iso8601();
        let mut current = self.by_id.get(delegation_id);
        let mut seen = 0;
        while let Some(d) = current {
            seen += 1;
            if seen > self.max_depth {
                return false;
            }
            if !d.verify() {
                return false;
            }
            if revocations.is_revoked(&d.delegator, None) || revocations.is_revoked(&d.delegate, None) {
                return false;
            }
            if let Some(expiry) = &d.expires_at {
                if expiry.as_str() < now.as_str() {
                    return false;
                }
            }
            current = match &d.parent_id {
                None => return true,
                Some(parent_id) => self.by_id.get(parent_id),
            };
        }
        false
    }

    /// Whether `delegate` holds a valid, unexpired, unrevoked delegation
    /// chain granting `scope`.
    pub fn is_authorized(&self, delegate: &str, scope: &str, revocations: &RevocationRegistry) -> bool {
        let Some(ids) = self.by_delegate.get(delegate) else {
            return false;
        };
        ids.iter().any(|id| {
            let Some(d) = self.by_id.get(id) else {
                return false;
            };
            d.scopes.iter().any(|s| s == scope) && self.verify_chain(id, revocations)
        })
    }

    /// Look up a delegation by id.
    pub fn get(&self, delegation_id: &str) -> Option<&Delegation> {
        self.by_id.get(delegation_id)
    }

    /// Administrative reset: remove every delegation naming `agent_id` as
    /// delegator or delegate, returning how many were removed.
    ///
    /// This can orphan delegations chained off a removed one (their
    /// `parent_id` will no longer resolve); `verify_chain` already treats
    /// an unresolvable parent as chain failure, so orphaned descendants
    /// simply stop authorizing rather than panicking.
    pub fn delete_agent(&mut self, agent_id: &str) -> usize {
        let to_remove: Vec<String> = self
            .by_id
            .values()
            .filter(|d| d.delegator == agent_id || d.delegate == agent_id)
            .map(|d| d.delegation_id.clone())
            .collect();
        let removed = to_remove.len();
        for id in &to_remove {
            self.by_id.remove(id);
        }
        if removed > 0 {
            self.by_delegate.clear();
            for d in self.by_id.values() {
                self.by_delegate.entry(d.delegate.clone()).or_default().push(d.delegation_id.clone());
            }
            tracing::warn!(agent_id, removed, "agent deleted from delegation registry");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn root_delegation(delegator: &AgentIdentity, delegate: &str, scopes: Vec<String>) -> Delegation {
        let mut d = Delegation::new(delegator.agent_id(), delegate, scopes, None);
        d.sign(delegator).unwrap();
        d
    }

    #[test]
    fn root_delegation_is_authorized_for_its_scope() {
        let alice = AgentIdentity::generate();
        let mut registry = DelegationRegistry::new();
        registry
            .add(root_delegation(&alice, "agent:bob", vec!["deploy".to_string()]))
            .unwrap();
        let revocations = RevocationRegistry::new();
        assert!(registry.is_authorized("agent:bob", "deploy", &revocations));
        assert!(!registry.is_authorized("agent:bob", "billing", &revocations));
    }

    #[test]
    fn sub_delegation_narrows_scope() {
        let alice = AgentIdentity::generate();
        let bob = AgentIdentity::generate();
        let mut registry = DelegationRegistry::new();
        let root = root_delegation(&alice, bob.agent_id(), vec!["deploy".to_string(), "billing".to_string()]);
        let root_id = root.delegation_id.clone();
        registry.add(root).unwrap();

        let narrowed = registry
            .sub_delegate(&root_id, &bob, "agent:carol", vec!["deploy".to_string()], None)
            .unwrap();
        assert_eq!(narrowed.scopes, vec!["deploy".to_string()]);

        let revocations = RevocationRegistry::new();
        assert!(registry.is_authorized("agent:carol", "deploy", &revocations));
        assert!(!registry.is_authorized("agent:carol", "billing", &revocations));
    }

    #[test]
    fn sub_delegation_cannot_expand_scope() {
        let alice = AgentIdentity::generate();
        let bob = AgentIdentity::generate();
        let mut registry = DelegationRegistry::new();
        let root = root_delegation(&alice, bob.agent_id(), vec!["deploy".to_string()]);
        let root_id = root.delegation_id.clone();
        registry.add(root).unwrap();

        let result = registry.sub_delegate(
            &root_id,
            &bob,
            "agent:carol",
            vec!["deploy".to_string(), "billing".to_string()],
            None,
        );
        assert!(matches!(result, Err(DelegationError::ScopeExpansion { .. })));
    }

    #[test]
    fn sub_delegation_cannot_expand_expiry() {
        let alice = AgentIdentity::generate();
        let bob = AgentIdentity::generate();
        let mut registry = DelegationRegistry::new();
        let mut root = Delegation::new(
            alice.agent_id(),
            bob.agent_id(),
            vec!["deploy".to_string()],
            Some("2026-01-01T00:00:00Z".to_string()),
        );
        root.sign(&alice).unwrap();
        let root_id = root.delegation_id.clone();
        registry.add(root).unwrap();

        let result = registry.sub_delegate(
            &root_id,
            &bob,
            "agent:carol",
            vec!["deploy".to_string()],
            Some("2027-01-01T00:00:00Z".to_string()),
        );
        assert!(matches!(result, Err(DelegationError::ExpiryExpansion)));
    }

    #[test]
    fn chain_broken_when_delegator_is_not_parents_delegate() {
        let alice = AgentIdentity::generate();
        let bob = AgentIdentity::generate();
        let mallory = AgentIdentity::generate();
        let mut registry = DelegationRegistry::new();
        let root = root_delegation(&alice, bob.agent_id(), vec!["deploy".to_string()]);
        let root_id = root.delegation_id.clone();
        registry.add(root).unwrap();

        let result = registry.sub_delegate(&root_id, &mallory, "agent:carol", vec!["deploy".to_string()], None);
        assert!(matches!(result, Err(DelegationError::ChainBroken { .. })));
    }

    #[test]
    fn revoking_an_intermediate_delegate_breaks_the_chain() {
        let alice = AgentIdentity::generate();
        let bob = AgentIdentity::generate();
        let mut registry = DelegationRegistry::new();
        let root = root_delegation(&alice, bob.agent_id(), vec!["deploy".to_string()]);
        let root_id = root.delegation_id.clone();
        registry.add(root).unwrap();
        registry
            .sub_delegate(&root_id, &bob, "agent:carol", vec!["deploy".to_string()], None)
            .unwrap();

        let mut revocations = RevocationRegistry::new();
        let mut entry = isnad_identity::RevocationEntry::new(bob.agent_id(), None, "compromised", alice.agent_id());
        entry.sign(&alice).unwrap();
        revocations.revoke(entry).unwrap();

        assert!(!registry.is_authorized("agent:carol", "deploy", &revocations));
    }

    #[test]
    fn depth_bound_is_enforced() {
        let mut registry = DelegationRegistry::with_max_depth(2);
        let alice = AgentIdentity::generate();
        let bob = AgentIdentity::generate();
        let carol = AgentIdentity::generate();
        let root = root_delegation(&alice, bob.agent_id(), vec!["deploy".to_string()]);
        let root_id = root.delegation_id.clone();
        registry.add(root).unwrap();
        let second = registry
            .sub_delegate(&root_id, &bob, carol.agent_id(), vec!["deploy".to_string()], None)
            .unwrap();

        let result = registry.sub_delegate(
            &second.delegation_id,
            &carol,
            "agent:dave",
            vec!["deploy".to_string()],
            None,
        );
        assert!(matches!(result, Err(DelegationError::DepthExceeded { .. })));
    }

    #[test]
    fn delete_agent_removes_delegations_both_ways_and_orphans_descendants() {
        let alice = AgentIdentity::generate();
        let bob = AgentIdentity::generate();
        let mut registry = DelegationRegistry::new();
        let root = root_delegation(&alice, bob.agent_id(), vec!["deploy".to_string()]);
        let root_id = root.delegation_id.clone();
        registry.add(root).unwrap();
        registry
            .sub_delegate(&root_id, &bob, "agent:carol", vec!["deploy".to_string()], None)
            .unwrap();

        let removed = registry.delete_agent(bob.agent_id());
        assert_eq!(removed, 2);
        let revocations = RevocationRegistry::new();
        assert!(!registry.is_authorized("agent:carol", "deploy", &revocations));
        assert!(!registry.is_authorized(bob.agent_id(), "deploy", &revocations));
    }

    proptest::proptest! {
        #[test]
        fn sub_delegation_scopes_are_always_a_subset_of_the_parent(
            parent_scopes in proptest::collection::hash_set("[a-z]{1,6}", 1..5),
            requested_scopes in proptest::collection::hash_set("[a-z]{1,6}", 1..5),
        ) {
            let alice = AgentIdentity::generate();
            let bob = AgentIdentity::generate();
            let mut registry = DelegationRegistry::new();
            let parent_scopes: Vec<String> = parent_scopes.into_iter().collect();
            let root = root_delegation(&alice, bob.agent_id(), parent_scopes.clone());
            let root_id = root.delegation_id.clone();
            registry.add(root).unwrap();

            let requested: Vec<String> = requested_scopes.into_iter().collect();
            let result = registry.sub_delegate(&root_id, &bob, "agent:carol", requested.clone(), None);

            let all_requested_allowed = requested.iter().all(|s| parent_scopes.contains(s));
            prop_assert_eq!(result.is_ok(), all_requested_allowed);
        }
    }
}
