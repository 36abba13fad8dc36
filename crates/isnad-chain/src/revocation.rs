//! `RevocationRegistry`: the index over signed [`RevocationEntry`] records
//! that `TrustChain` consults when scoring.

use std::collections::HashMap;

use isnad_identity::{RevocationEntry, SignedRecord};

use crate::error::{ChainError, ChainResult};

/// An index of revocation entries, keyed by revoked target.
///
/// Revocation is append-only in normal operation. [`RevocationRegistry::unrevoke`]
/// exists only for administrative reset -- clearing a target's revocation
/// history entirely, not contesting a single entry -- and is expected to be
/// gated by the embedding host, not exposed to ordinary callers.
#[derive(Debug, Default)]
pub struct RevocationRegistry {
    by_target: HashMap<String, Vec<RevocationEntry>>,
}

impl RevocationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify and record a revocation entry.
    pub fn revoke(&mut self, entry: RevocationEntry) -> ChainResult<()> {
        if !entry.verify() {
            return Err(ChainError::SignatureInvalid {
                record_id: entry.revocation_id.clone(),
            });
        }
        tracing::warn!(target = %entry.target, revoked_by = %entry.revoked_by, scope = ?entry.scope, "revocation recorded");
        self.by_target
            .entry(entry.target.clone())
            .or_default()
            .push(entry);
        Ok(())
    }

    /// Whether `target` is revoked, either globally or within `scope`.
    pub fn is_revoked(&self, target: &str, scope: Option<&str>) -> bool {
        self.by_target
            .get(target)
            .map(|entries| entries.iter().any(|e| e.covers(scope)))
            .unwrap_or(false)
    }

    /// All revocation entries on record for `target`, in issuance order.
    pub fn entries_for(&self, target: &str) -> &[RevocationEntry] {
        self.by_target
            .get(target)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Administrative reset: remove every revocation entry recorded for
    /// `target`, returning how many were removed.
    ///
    /// This is not a contest of a single revocation's validity -- it
    /// erases the target's entire revocation history, for operators
    /// correcting a mistaken or superseded revocation out of band.
    pub fn unrevoke(&mut self, target: &str) -> usize {
        let removed = self.by_target.remove(target).map(|v| v.len()).unwrap_or(0);
        if removed > 0 {
            tracing::warn!(target, removed, "revocation history cleared administratively");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isnad_identity::AgentIdentity;

    fn revoke(revoker: &AgentIdentity, target: &str, scope: Option<String>) -> RevocationEntry {
        let mut entry = RevocationEntry::new(target, scope, "reason", revoker.agent_id());
        entry.sign(revoker).unwrap();
        entry
    }

    #[test]
    fn unrevoked_target_is_not_revoked() {
        let registry = RevocationRegistry::new();
        assert!(!registry.is_revoked("agent:nobody", None));
    }

    #[test]
    fn global_revocation_covers_every_scope() {
        let revoker = AgentIdentity::generate();
        let mut registry = RevocationRegistry::new();
        registry.revoke(revoke(&revoker, "agent:bob", None)).unwrap();
        assert!(registry.is_revoked("agent:bob", None));
        assert!(registry.is_revoked("agent:bob", Some("deploy")));
    }

    #[test]
    fn scoped_revocation_is_narrow() {
        let revoker = AgentIdentity::generate();
        let mut registry = RevocationRegistry::new();
        registry
            .revoke(revoke(&revoker, "agent:bob", Some("deploy".to_string())))
            .unwrap();
        assert!(registry.is_revoked("agent:bob", Some("deploy")));
        assert!(!registry.is_revoked("agent:bob", Some("billing")));
        assert!(!registry.is_revoked("agent:bob", None));
    }

    #[test]
    fn unsigned_entry_is_rejected() {
        let mut registry = RevocationRegistry::new();
        let entry = RevocationEntry::new("agent:bob", None, "reason", "agent:revoker");
        assert!(registry.revoke(entry).is_err());
    }

    #[test]
    fn unrevoke_clears_history_and_reinstates() {
        let revoker = AgentIdentity::generate();
        let mut registry = RevocationRegistry::new();
        registry.revoke(revoke(&revoker, "agent:bob", None)).unwrap();
        assert!(registry.is_revoked("agent:bob", None));
        let removed = registry.unrevoke("agent:bob");
        assert_eq!(removed, 1);
        assert!(!registry.is_revoked("agent:bob", None));
        assert_eq!(registry.entries_for("agent:bob").len(), 0);
    }

    #[test]
    fn unrevoke_on_clean_target_removes_nothing() {
        let mut registry = RevocationRegistry::new();
        assert_eq!(registry.unrevoke("agent:nobody"), 0);
    }
}
