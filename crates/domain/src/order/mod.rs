//! Order operations and the rules applied to them.

mod policy;
mod service;
mod validation;

pub use policy::{ParsePolicyError, TransitionPolicy};
pub use service::OrderService;
pub use validation::{validate_changes, validate_new_order};

use common::OrderStatus;
use thiserror::Error;

/// Errors raised by order business rules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    /// A required text field is empty.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// Price is negative or not a finite number.
    #[error("Invalid price: {price} (must be a non-negative number)")]
    InvalidPrice { price: f32 },

    /// The status change is not allowed from the current status.
    #[error("Invalid status transition: cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}
