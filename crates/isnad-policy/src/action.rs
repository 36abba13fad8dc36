//! The action a policy resolves to, and the strictness ordering rules
//! and policies are combined under.

use serde::{Deserialize, Serialize};

/// What a policy decides should happen for a given evaluation.
///
/// Ordered by strictness: `Deny > RateLimit > RequireReview > Allow`.
/// When more than one rule or policy applies, the strictest action wins
/// -- a single failing requirement can never be overruled
/// by a passing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// No restriction; the request proceeds.
    Allow,
    /// The request proceeds but is subject to rate limiting.
    RateLimit,
    /// The request is held for human or out-of-band review.
    RequireReview,
    /// The request is rejected outright.
    Deny,
}

impl Action {
    fn severity(self) -> u8 {
        match self {
            Action::Allow => 0,
            Action::RateLimit => 1,
            Action::RequireReview => 2,
            Action::Deny => 3,
        }
    }

    /// The stricter of two actions.
    pub fn strictest(self, other: Action) -> Action {
        if self.severity() >= other.severity() {
            self
        } else {
            other
        }
    }
}
