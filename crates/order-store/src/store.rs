use async_trait::async_trait;

use crate::{CategoryId, NewOrder, Order, OrderChanges, OrderFilter, OrderId, Result};

/// Core trait for order store implementations.
///
/// Implementations must be thread-safe (Send + Sync) and must classify
/// driver failures into [`StoreError`](crate::StoreError) before returning.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Loads one order.
    ///
    /// Returns `NotFound` if no order has this identifier.
    async fn get(&self, id: OrderId) -> Result<Order>;

    /// Lists orders matching every active predicate of `filter`,
    /// oldest first.
    async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>>;

    /// Persists a new order.
    ///
    /// Generates an identifier when none is given, defaults the price to
    /// zero, forces the status to `active` and stamps both timestamps.
    /// Returns `AlreadyExists` if the identifier is taken.
    async fn create(&self, order: NewOrder) -> Result<Order>;

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// Returns `NotFound` if no order has this identifier.
    async fn update(&self, id: OrderId, changes: OrderChanges) -> Result<Order>;

    /// Removes an order permanently.
    ///
    /// Returns `NotFound` if no order has this identifier.
    async fn delete(&self, id: OrderId) -> Result<()>;

    /// Lists `active` orders, optionally restricted to some categories.
    async fn list_active(&self, category_ids: Vec<CategoryId>) -> Result<Vec<Order>> {
        self.list(OrderFilter::active(category_ids)).await
    }
}
