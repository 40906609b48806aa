use thiserror::Error;

use crate::{OrderId, OrderStatus};

/// Boxed driver error kept as the source of an opaque failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The store operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when interacting with the order store.
///
/// Driver errors are classified here. The `OperationFailed` message never
/// includes the driver's text; it is only reachable through `source()`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No order with this identifier exists.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// An order with this identifier already exists.
    #[error("order already exists: {0}")]
    AlreadyExists(OrderId),

    /// A guarded update found the order in a status it does not allow.
    #[error("order {id} is {current}, which the update does not allow")]
    UnexpectedStatus { id: OrderId, current: OrderStatus },

    /// Any other storage failure.
    #[error("order {operation} failed")]
    OperationFailed {
        operation: Operation,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    /// Wraps a driver error as an opaque failure of `operation`.
    pub fn failed(operation: Operation, source: impl Into<BoxError>) -> Self {
        StoreError::OperationFailed {
            operation,
            source: source.into(),
        }
    }

    /// Returns true for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_failed_hides_driver_text() {
        let err = StoreError::failed(
            Operation::Update,
            std::io::Error::other("connection reset by peer"),
        );
        assert_eq!(err.to_string(), "order update failed");

        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "connection reset by peer");
    }

    #[test]
    fn not_found_names_the_order() {
        let id = OrderId::new();
        let err = StoreError::NotFound(id);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("order not found: {id}"));
    }
}
