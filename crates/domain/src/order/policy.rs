//! Status transition policy.

use std::str::FromStr;

use common::OrderStatus;
use thiserror::Error;

use super::OrderError;

/// Which status changes an update may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any of the four statuses may be set at any time.
    #[default]
    Unrestricted,

    /// Follow the lifecycle graph: `active -> in_progress -> done`,
    /// `active | in_progress -> cancel`; `done` and `cancel` are terminal.
    Lifecycle,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transition policy: {0:?} (expected \"unrestricted\" or \"lifecycle\")")]
pub struct ParsePolicyError(pub String);

impl TransitionPolicy {
    /// Statuses an order may be in for `to` to be set, or `None` when any
    /// status may.
    pub fn allowed_sources(&self, to: OrderStatus) -> Option<Vec<OrderStatus>> {
        match self {
            TransitionPolicy::Unrestricted => None,
            TransitionPolicy::Lifecycle => Some(
                OrderStatus::ALL
                    .into_iter()
                    .filter(|from| self.check(*from, to).is_ok())
                    .collect(),
            ),
        }
    }

    /// Validates a status change.
    pub fn check(&self, from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        match self {
            TransitionPolicy::Unrestricted => Ok(()),
            TransitionPolicy::Lifecycle if from.can_transition_to(to) => Ok(()),
            TransitionPolicy::Lifecycle => Err(OrderError::InvalidTransition { from, to }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPolicy::Unrestricted => "unrestricted",
            TransitionPolicy::Lifecycle => "lifecycle",
        }
    }
}

impl std::fmt::Display for TransitionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unrestricted" => Ok(TransitionPolicy::Unrestricted),
            "lifecycle" => Ok(TransitionPolicy::Lifecycle),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}
