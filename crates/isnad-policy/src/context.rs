//! The facts a [`crate::requirement::Requirement`] is evaluated against.

/// A snapshot of everything a policy might need to know about one agent's
/// request, gathered from `isnad-chain` and `isnad-delegation` before
/// calling into the policy engine.
///
/// `isnad-policy` deliberately has no dependency on `isnad-chain` or
/// `isnad-delegation` -- it only consumes the scalars and flags a caller
/// already computed, so the policy layer stays decoupled from how trust
/// and delegation are actually stored.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    /// `agent_id` of the agent being evaluated.
    pub agent_id: String,
    /// Scope the request is being made within, if any.
    pub scope: Option<String>,
    /// Direct trust score for `agent_id`, e.g. from `TrustChain::trust_score`.
    pub trust_score: f64,
    /// Transitive trust from the evaluating party to `agent_id`, if computed.
    pub chain_trust: Option<f64>,
    /// Whether `agent_id` is currently revoked (globally or within `scope`).
    pub is_revoked: bool,
    /// Whether `agent_id` holds a valid delegation authorizing `scope`.
    pub is_delegated_authorized: bool,
    /// How many distinct witnesses have attested for `agent_id`, e.g. from
    /// counting `TrustChain::attestations_for_subject`'s distinct witnesses.
    pub endorsement_count: usize,
    /// Hop count of the chain trust path used to reach `agent_id`, if a
    /// transitive check was performed.
    pub chain_length: Option<usize>,
    /// `agent_id`s of whoever issued the credentials backing this
    /// evaluation (e.g. attestation witnesses or the delegation root).
    pub issuer_ids: Vec<String>,
    /// Age, in seconds, of the oldest credential backing this evaluation
    /// (e.g. the delegation chain's root, or the earliest attestation).
    pub age_seconds: Option<u64>,
}

impl EvaluationContext {
    /// Build a context for an agent with no scope, chain trust, or
    /// delegation information -- the common case for a simple direct-trust
    /// check.
    pub fn new(agent_id: impl Into<String>, trust_score: f64) -> Self {
        Self {
            agent_id: agent_id.into(),
            scope: None,
            trust_score,
            chain_trust: None,
            is_revoked: false,
            is_delegated_authorized: false,
            endorsement_count: 0,
            chain_length: None,
            issuer_ids: Vec::new(),
            age_seconds: None,
        }
    }

    /// Attach a scope.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Attach a computed chain trust value.
    pub fn with_chain_trust(mut self, chain_trust: f64) -> Self {
        self.chain_trust = Some(chain_trust);
        self
    }

    /// Mark the agent as revoked.
    pub fn with_revoked(mut self, is_revoked: bool) -> Self {
        self.is_revoked = is_revoked;
        self
    }

    /// Mark the agent as holding a valid delegation for the scope.
    pub fn with_delegated_authorized(mut self, is_delegated_authorized: bool) -> Self {
        self.is_delegated_authorized = is_delegated_authorized;
        self
    }

    /// Attach a distinct-witness endorsement count.
    pub fn with_endorsement_count(mut self, endorsement_count: usize) -> Self {
        self.endorsement_count = endorsement_count;
        self
    }

    /// Attach the hop count of the chain trust path used.
    pub fn with_chain_length(mut self, chain_length: usize) -> Self {
        self.chain_length = Some(chain_length);
        self
    }

    /// Attach the issuer ids backing this evaluation.
    pub fn with_issuer_ids(mut self, issuer_ids: Vec<String>) -> Self {
        self.issuer_ids = issuer_ids;
        self
    }

    /// Attach the age, in seconds, of the oldest backing credential.
    pub fn with_age_seconds(mut self, age_seconds: u64) -> Self {
        self.age_seconds = Some(age_seconds);
        self
    }
}
