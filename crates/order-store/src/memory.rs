use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::order::now;
use crate::{
    NewOrder, Order, OrderChanges, OrderFilter, OrderId, Result, StoreError, store::OrderStore,
};

/// In-memory order store implementation.
///
/// Provides the same semantics as the PostgreSQL implementation and is
/// used by tests and local runs without a database.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get(&self, id: OrderId) -> Result<Order> {
        let orders = self.orders.read().await;
        orders.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut matching: Vec<_> = orders
            .values()
            .filter(|order| filter.matches(order))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn create(&self, order: NewOrder) -> Result<Order> {
        let order = order.into_order(now());

        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(StoreError::AlreadyExists(order.id));
        }
        orders.insert(order.id, order.clone());

        Ok(order)
    }

    async fn update(&self, id: OrderId, changes: OrderChanges) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if !order.admits(&changes) {
            return Err(StoreError::UnexpectedStatus {
                id,
                current: order.status,
            });
        }
        order.apply(&changes, now());
        Ok(order.clone())
    }

    async fn delete(&self, id: OrderId) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CategoryId, OrderStatus, UserId};

    fn new_order(title: &str, category_id: CategoryId, client_id: UserId) -> NewOrder {
        NewOrder::new(
            title,
            "Leaking under the counter",
            "12 Baker St",
            "30.3158",
            "59.9391",
            category_id,
            client_id,
        )
    }

    #[tokio::test]
    async fn create_forces_active_status_and_zero_price() {
        let store = InMemoryOrderStore::new();

        let order = store
            .create(
                new_order("Fix sink", CategoryId::new(), UserId::new())
                    .requested_status(OrderStatus::Done),
            )
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Active);
        assert_eq!(order.price, 0.0);
        assert_eq!(order.created_at, order.updated_at);
        assert_eq!(store.get(order.id).await.unwrap(), order);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let store = InMemoryOrderStore::new();
        let id = OrderId::new();

        store
            .create(new_order("a", CategoryId::new(), UserId::new()).with_id(id))
            .await
            .unwrap();
        let result = store
            .create(new_order("b", CategoryId::new(), UserId::new()).with_id(id))
            .await;

        assert!(matches!(result, Err(StoreError::AlreadyExists(dup)) if dup == id));
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn get_missing_order() {
        let store = InMemoryOrderStore::new();
        let result = store.get(OrderId::new()).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_ignores_empty_values() {
        let store = InMemoryOrderStore::new();
        let created = store
            .create(new_order("Fix sink", CategoryId::new(), UserId::new()))
            .await
            .unwrap();

        let updated = store
            .update(created.id, OrderChanges::new().title("").price(150.0))
            .await
            .unwrap();

        assert_eq!(updated.title, "Fix sink");
        assert_eq!(updated.price, 150.0);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_missing_order() {
        let store = InMemoryOrderStore::new();
        let result = store
            .update(OrderId::new(), OrderChanges::new().title("x"))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn guarded_update_rejects_other_statuses() {
        let store = InMemoryOrderStore::new();
        let order = store
            .create(new_order("Fix sink", CategoryId::new(), UserId::new()))
            .await
            .unwrap();
        store
            .update(order.id, OrderChanges::new().status(OrderStatus::Cancel))
            .await
            .unwrap();

        let result = store
            .update(
                order.id,
                OrderChanges::new()
                    .status(OrderStatus::InProgress)
                    .title("Changed")
                    .only_from([OrderStatus::Active]),
            )
            .await;

        assert!(matches!(
            result,
            Err(StoreError::UnexpectedStatus { current: OrderStatus::Cancel, .. })
        ));
        let stored = store.get(order.id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Cancel);
        assert_eq!(stored.title, "Fix sink");
    }

    #[tokio::test]
    async fn guarded_update_on_missing_order_is_not_found() {
        let store = InMemoryOrderStore::new();
        let result = store
            .update(
                OrderId::new(),
                OrderChanges::new().only_from([OrderStatus::Active]),
            )
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let store = InMemoryOrderStore::new();
        let order = store
            .create(new_order("a", CategoryId::new(), UserId::new()))
            .await
            .unwrap();

        store.delete(order.id).await.unwrap();
        let second = store.delete(order.id).await;

        assert!(matches!(second, Err(StoreError::NotFound(_))));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn list_applies_only_supplied_predicates() {
        let store = InMemoryOrderStore::new();
        let plumbing = CategoryId::new();
        let electrics = CategoryId::new();
        let alice = UserId::new();
        let bob = UserId::new();

        store.create(new_order("a", plumbing, alice)).await.unwrap();
        store.create(new_order("b", electrics, alice)).await.unwrap();
        store.create(new_order("c", plumbing, bob)).await.unwrap();

        let all = store.list(OrderFilter::new()).await.unwrap();
        assert_eq!(all.len(), 3);

        let plumbing_orders = store
            .list(OrderFilter::new().categories([plumbing]))
            .await
            .unwrap();
        assert_eq!(plumbing_orders.len(), 2);

        let alice_plumbing = store
            .list(OrderFilter::new().categories([plumbing]).client(alice))
            .await
            .unwrap();
        assert_eq!(alice_plumbing.len(), 1);
        assert_eq!(alice_plumbing[0].title, "a");
    }

    #[tokio::test]
    async fn list_is_ordered_by_creation() {
        let store = InMemoryOrderStore::new();
        for title in ["first", "second", "third"] {
            store
                .create(new_order(title, CategoryId::new(), UserId::new()))
                .await
                .unwrap();
        }

        let created: Vec<_> = store
            .list(OrderFilter::new())
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.created_at)
            .collect();
        assert_eq!(created.len(), 3);
        assert!(created.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn list_active_excludes_other_statuses() {
        let store = InMemoryOrderStore::new();
        let category = CategoryId::new();

        let open = store
            .create(new_order("open", category, UserId::new()))
            .await
            .unwrap();
        let finished = store
            .create(new_order("finished", category, UserId::new()))
            .await
            .unwrap();
        store
            .update(finished.id, OrderChanges::new().status(OrderStatus::Done))
            .await
            .unwrap();

        let active = store.list_active(Vec::new()).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, open.id);

        let in_other_category = store.list_active(vec![CategoryId::new()]).await.unwrap();
        assert!(in_other_category.is_empty());
    }
}
