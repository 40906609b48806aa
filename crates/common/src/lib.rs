//! Shared types for the order service: typed identifiers and the order status.

mod ids;
mod status;

pub use ids::{CategoryId, OrderId, UserId};
pub use status::{OrderStatus, ParseStatusError};
