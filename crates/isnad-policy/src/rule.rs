//! A single requirement paired with the action to take when it fails.

use crate::action::Action;
use crate::context::EvaluationContext;
use crate::requirement::Requirement;

/// One requirement within a [`crate::policy::Policy`], and what happens
/// if it doesn't hold.
///
/// `priority` only affects which rule's `name` is reported as the
/// controlling one when several rules fail at the same [`Action`]
/// severity (see [`crate::policy::Policy::evaluate_verbose`]) -- the
/// action itself is always the strictest failing action, independent of
/// priority.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Human-readable name, surfaced in audit/decision logging.
    pub name: String,
    /// The predicate this rule checks.
    pub requirement: Requirement,
    /// Action to take if `requirement` does not hold.
    pub on_fail_action: Action,
    /// Tie-breaker among rules that fail at the same severity; higher
    /// wins.
    pub priority: i32,
}

impl Rule {
    /// Build a new rule with priority `0`.
    pub fn new(name: impl Into<String>, requirement: Requirement, on_fail_action: Action) -> Self {
        Self {
            name: name.into(),
            requirement,
            on_fail_action,
            priority: 0,
        }
    }

    /// Set this rule's priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether this rule's requirement holds against `ctx`.
    pub fn passes(&self, ctx: &EvaluationContext) -> bool {
        self.requirement.evaluate(ctx)
    }
}
