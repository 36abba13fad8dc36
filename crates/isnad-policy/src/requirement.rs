//! Conjunctive/disjunctive predicates over an [`EvaluationContext`].

use crate::context::EvaluationContext;

/// A predicate evaluated against an [`EvaluationContext`].
///
/// `All` and `Any` compose requirements so a [`crate::rule::Rule`] can
/// express "trust score above X and not revoked" without the policy
/// engine needing to know about boolean logic itself.
#[derive(Debug, Clone)]
pub enum Requirement {
    /// Direct trust score must be at least this value.
    MinTrustScore(f64),
    /// Transitive chain trust must be at least this value. Fails if the
    /// context carries no chain trust value.
    MinChainTrust(f64),
    /// The agent must not be revoked.
    NotRevoked,
    /// The agent must hold a valid delegation authorizing the context's
    /// scope.
    DelegatedAuthorized,
    /// The context's scope must equal this value.
    ScopeIs(String),
    /// The context's endorsement count must be at least this value.
    MinEndorsements(usize),
    /// The chain trust path's hop count must be at most this value. Fails
    /// if the context carries no chain length.
    MaxChainLength(usize),
    /// The context's scope must be one of these values.
    RequiredScopes(Vec<String>),
    /// At least one of the context's issuer ids must be in this set.
    RequiredIssuerIds(Vec<String>),
    /// The backing credential's age must be at most this many seconds.
    /// Fails if the context carries no age.
    MaxAgeSeconds(u64),
    /// Every sub-requirement must hold.
    All(Vec<Requirement>),
    /// At least one sub-requirement must hold.
    Any(Vec<Requirement>),
}

impl Requirement {
    /// Evaluate this requirement against `ctx`.
    pub fn evaluate(&self, ctx: &EvaluationContext) -> bool {
        match self {
            Requirement::MinTrustScore(min) => ctx.trust_score >= *min,
            Requirement::MinChainTrust(min) => ctx.chain_trust.map(|v| v >= *min).unwrap_or(false),
            Requirement::NotRevoked => !ctx.is_revoked,
            Requirement::DelegatedAuthorized => ctx.is_delegated_authorized,
            Requirement::ScopeIs(scope) => ctx.scope.as_deref() == Some(scope.as_str()),
            Requirement::MinEndorsements(min) => ctx.endorsement_count >= *min,
            Requirement::MaxChainLength(max) => ctx.chain_length.map(|len| len <= *max).unwrap_or(false),
            Requirement::RequiredScopes(allowed) => {
                ctx.scope.as_deref().map(|s| allowed.iter().any(|a| a == s)).unwrap_or(false)
            }
            Requirement::RequiredIssuerIds(allowed) => {
                ctx.issuer_ids.iter().any(|issuer| allowed.contains(issuer))
            }
            Requirement::MaxAgeSeconds(max) => ctx.age_seconds.map(|age| age <= *max).unwrap_or(false),
            Requirement::All(reqs) => reqs.iter().all(|r| r.evaluate(ctx)),
            Requirement::Any(reqs) => reqs.iter().any(|r| r.evaluate(ctx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_trust_score_passes_at_boundary() {
        let ctx = EvaluationContext::new("agent:a", 0.5);
        assert!(Requirement::MinTrustScore(0.5).evaluate(&ctx));
        assert!(!Requirement::MinTrustScore(0.51).evaluate(&ctx));
    }

    #[test]
    fn min_chain_trust_fails_when_absent() {
        let ctx = EvaluationContext::new("agent:a", 0.5);
        assert!(!Requirement::MinChainTrust(0.1).evaluate(&ctx));
    }

    #[test]
    fn all_requires_every_sub_requirement() {
        let ctx = EvaluationContext::new("agent:a", 0.5).with_revoked(false);
        let req = Requirement::All(vec![Requirement::MinTrustScore(0.3), Requirement::NotRevoked]);
        assert!(req.evaluate(&ctx));
        let revoked_ctx = ctx.clone().with_revoked(true);
        assert!(!req.evaluate(&revoked_ctx));
    }

    #[test]
    fn any_requires_one_sub_requirement() {
        let ctx = EvaluationContext::new("agent:a", 0.0).with_delegated_authorized(true);
        let req = Requirement::Any(vec![Requirement::MinTrustScore(0.5), Requirement::DelegatedAuthorized]);
        assert!(req.evaluate(&ctx));
    }

    #[test]
    fn min_endorsements_counts_distinct_witnesses() {
        let ctx = EvaluationContext::new("agent:a", 0.0).with_endorsement_count(3);
        assert!(Requirement::MinEndorsements(3).evaluate(&ctx));
        assert!(!Requirement::MinEndorsements(4).evaluate(&ctx));
    }

    #[test]
    fn max_chain_length_fails_when_absent() {
        let ctx = EvaluationContext::new("agent:a", 0.0);
        assert!(!Requirement::MaxChainLength(2).evaluate(&ctx));
        let ctx = ctx.with_chain_length(2);
        assert!(Requirement::MaxChainLength(2).evaluate(&ctx));
        assert!(!Requirement::MaxChainLength(1).evaluate(&ctx));
    }

    #[test]
    fn required_scopes_matches_any_allowed_scope() {
        let ctx = EvaluationContext::new("agent:a", 0.0).with_scope("deploy");
        let req = Requirement::RequiredScopes(vec!["deploy".to_string(), "billing".to_string()]);
        assert!(req.evaluate(&ctx));
        let ctx = EvaluationContext::new("agent:a", 0.0).with_scope("admin");
        assert!(!req.evaluate(&ctx));
    }

    #[test]
    fn required_issuer_ids_matches_any_overlap() {
        let ctx = EvaluationContext::new("agent:a", 0.0)
            .with_issuer_ids(vec!["agent:alice".to_string(), "agent:bob".to_string()]);
        let req = Requirement::RequiredIssuerIds(vec!["agent:bob".to_string()]);
        assert!(req.evaluate(&ctx));
        let req = Requirement::RequiredIssuerIds(vec!["agent:mallory".to_string()]);
        assert!(!req.evaluate(&ctx));
    }

    #[test]
    fn max_age_seconds_fails_when_absent() {
        let ctx = EvaluationContext::new("agent:a", 0.0);
        assert!(!Requirement::MaxAgeSeconds(3600).evaluate(&ctx));
        let ctx = ctx.with_age_seconds(1800);
        assert!(Requirement::MaxAgeSeconds(3600).evaluate(&ctx));
        assert!(!Requirement::MaxAgeSeconds(900).evaluate(&ctx));
    }
}
