//! Domain layer for the order service.
//!
//! This crate provides the business rules that sit between the request
//! handler and the order store:
//! - `OrderService` orchestrating every order operation
//! - input validation for new orders and partial updates
//! - `TransitionPolicy` deciding which status changes are legal

pub mod error;
pub mod order;

pub use error::DomainError;
pub use order::{OrderError, OrderService, TransitionPolicy};
