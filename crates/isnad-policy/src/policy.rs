//! A named set of rules plus the action to take when every rule passes.

use crate::action::Action;
use crate::context::EvaluationContext;
use crate::rule::Rule;

/// A decision produced by [`Policy::evaluate_verbose`]: the resolved
/// action plus which rule (if any) drove it.
#[derive(Debug, Clone)]
pub struct Decision {
    /// The strictest action among every failing rule, or the policy's
    /// `default_action` if every rule passed.
    pub action: Action,
    /// Name of the highest-priority rule that produced `action`, if a
    /// rule failed at all.
    pub controlling_rule: Option<String>,
}

/// A named bundle of rules and a fallback action.
///
/// [`Policy::evaluate`] runs every rule and takes the strictest action
/// among the ones that fail; it does not stop at the
/// first failure, since a later rule might fail more severely than an
/// earlier one.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Human-readable policy name.
    pub name: String,
    /// The rules this policy checks.
    pub rules: Vec<Rule>,
    /// Action taken when every rule passes.
    pub default_action: Action,
}

impl Policy {
    /// Build a new, empty policy with the given default action.
    pub fn new(name: impl Into<String>, default_action: Action) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            default_action,
        }
    }

    /// Add a rule to this policy.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Resolve this policy's action for `ctx`.
    pub fn evaluate(&self, ctx: &EvaluationContext) -> Action {
        self.evaluate_verbose(ctx).action
    }

    /// Resolve this policy's action for `ctx`, and which rule drove it.
    pub fn evaluate_verbose(&self, ctx: &EvaluationContext) -> Decision {
        let mut worst: Option<(Action, &Rule)> = None;
        for rule in &self.rules {
            if rule.passes(ctx) {
                continue;
            }
            worst = Some(match worst {
                None => (rule.on_fail_action, rule),
                Some((current_action, current_rule)) => {
                    let combined = current_action.strictest(rule.on_fail_action);
                    if combined == rule.on_fail_action && rule.priority >= current_rule.priority {
                        (combined, rule)
                    } else {
                        (combined, current_rule)
                    }
                }
            });
        }
        match worst {
            Some((action, rule)) => {
                tracing::debug!(policy = %self.name, rule = %rule.name, ?action, "policy rule failed");
                Decision {
                    action,
                    controlling_rule: Some(rule.name.clone()),
                }
            }
            None => Decision {
                action: self.default_action,
                controlling_rule: None,
            },
        }
    }
}
