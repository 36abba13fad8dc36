//! Composes multiple policies into one decision.

use crate::action::Action;
use crate::context::EvaluationContext;
use crate::policy::Policy;

/// A set of policies evaluated together, strictest-wins.
///
/// With zero policies configured, [`PolicyEngine::evaluate`] returns
/// [`Action::Deny`]: an engine that has nothing to say about a request
/// must not be mistaken for one that allows it.
#[derive(Debug, Clone, Default)]
pub struct PolicyEngine {
    policies: Vec<Policy>,
}

impl PolicyEngine {
    /// An engine with no policies -- every evaluation denies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from a set of policies.
    pub fn with_policies(policies: Vec<Policy>) -> Self {
        Self { policies }
    }

    /// Add a policy to this engine.
    pub fn add_policy(&mut self, policy: Policy) {
        self.policies.push(policy);
    }

    /// Resolve the strictest action across every configured policy.
    pub fn evaluate(&self, ctx: &EvaluationContext) -> Action {
        if self.policies.is_empty() {
            return Action::Deny;
        }
        self.policies
            .iter()
            .map(|p| p.evaluate(ctx))
            .fold(Action::Allow, Action::strictest)
    }
}
