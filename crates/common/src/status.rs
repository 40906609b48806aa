//! Order status.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The status of an order.
///
/// Lifecycle graph enforced when transitions are restricted:
/// ```text
/// active ──► in_progress ──► done
///   │             │
///   └─────────────┴──► cancel
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Open and waiting for a master.
    #[default]
    Active,

    /// Claimed by a master and being worked on.
    InProgress,

    /// Cancelled (terminal state).
    Cancel,

    /// Finished (terminal state).
    Done,
}

/// Error returned when a status string is not one of the four known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0:?}")]
pub struct ParseStatusError(pub String);

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Active,
        OrderStatus::InProgress,
        OrderStatus::Cancel,
        OrderStatus::Done,
    ];

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Done | OrderStatus::Cancel)
    }

    /// Returns true if the lifecycle graph allows moving to `next`.
    ///
    /// Re-applying the current status is always allowed.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (OrderStatus::Active, OrderStatus::InProgress)
                | (OrderStatus::Active, OrderStatus::Cancel)
                | (OrderStatus::InProgress, OrderStatus::Done)
                | (OrderStatus::InProgress, OrderStatus::Cancel)
        )
    }

    /// Returns the wire/storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "active",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Cancel => "cancel",
            OrderStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(OrderStatus::Active),
            "in_progress" => Ok(OrderStatus::InProgress),
            "cancel" => Ok(OrderStatus::Cancel),
            "done" => Ok(OrderStatus::Done),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}
