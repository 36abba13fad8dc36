//! Ready-made policies covering common trust-substrate scenarios.

use crate::action::Action;
use crate::policy::Policy;
use crate::requirement::Requirement;
use crate::rule::Rule;

/// Deny anyone revoked, require review below a high trust bar, and
/// otherwise allow. Suited to high-value operations.
pub fn strict() -> Policy {
    Policy::new("strict", Action::Allow)
        .with_rule(Rule::new("not-revoked", Requirement::NotRevoked, Action::Deny).with_priority(10))
        .with_rule(
            Rule::new("min-trust", Requirement::MinTrustScore(0.6), Action::RequireReview)
                .with_priority(5),
        )
}

/// Deny anyone revoked, rate-limit low-trust agents, and otherwise
/// allow. Suited to everyday operations.
pub fn moderate() -> Policy {
    Policy::new("moderate", Action::Allow)
        .with_rule(Rule::new("not-revoked", Requirement::NotRevoked, Action::Deny).with_priority(10))
        .with_rule(
            Rule::new("min-trust", Requirement::MinTrustScore(0.2), Action::RateLimit)
                .with_priority(5),
        )
}

/// Deny only revoked agents; every unrevoked agent is allowed regardless
/// of trust score. Suited to open discovery endpoints.
pub fn permissive() -> Policy {
    Policy::new("permissive", Action::Allow)
        .with_rule(Rule::new("not-revoked", Requirement::NotRevoked, Action::Deny).with_priority(10))
}

/// A commerce-flavored policy: revoked agents are denied, agents below a
/// high trust bar are denied outright rather than merely reviewed (unlike
/// [`strict`]), and a chain-trust floor is required even for directly
/// trusted agents.
pub fn strict_commerce() -> Policy {
    Policy::new("strict-commerce", Action::Allow)
        .with_rule(Rule::new("not-revoked", Requirement::NotRevoked, Action::Deny).with_priority(10))
        .with_rule(
            Rule::new("min-trust", Requirement::MinTrustScore(0.7), Action::Deny).with_priority(9),
        )
        .with_rule(
            Rule::new("min-chain-trust", Requirement::MinChainTrust(0.05), Action::RequireReview)
                .with_priority(1),
        )
}

/// A discovery-flavored policy: anyone not revoked may be listed, but
/// agents below a low trust floor are flagged for review rather than
/// denied -- discovery should surface low-trust agents, not hide them.
pub fn open_discovery() -> Policy {
    Policy::new("open-discovery", Action::Allow)
        .with_rule(Rule::new("not-revoked", Requirement::NotRevoked, Action::Deny).with_priority(10))
        .with_rule(
            Rule::new("min-trust", Requirement::MinTrustScore(0.1), Action::RequireReview)
                .with_priority(1),
        )
}

/// A delegation-gated policy: the request must be backed either by
/// sufficient direct trust or by a valid delegation, and revocation
/// always denies regardless of which.
pub fn scoped_delegation() -> Policy {
    Policy::new("scoped-delegation", Action::Deny)
        .with_rule(Rule::new("not-revoked", Requirement::NotRevoked, Action::Deny).with_priority(10))
        .with_rule(
            Rule::new(
                "trusted-or-delegated",
                Requirement::Any(vec![
                    Requirement::MinTrustScore(0.5),
                    Requirement::DelegatedAuthorized,
                ]),
                Action::Deny,
            )
            .with_priority(5),
        )
}
