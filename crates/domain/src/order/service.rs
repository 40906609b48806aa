//! Order service: the seam between request handling and storage.

use common::{CategoryId, OrderId, OrderStatus, UserId};
use order_store::{NewOrder, Order, OrderChanges, OrderFilter, OrderStore, StoreError};

use super::{OrderError, TransitionPolicy, validate_changes, validate_new_order};
use crate::error::DomainError;

/// Service for managing orders.
///
/// Wraps an [`OrderStore`] and applies input validation and the configured
/// [`TransitionPolicy`] before any write reaches storage.
pub struct OrderService<S: OrderStore> {
    store: S,
    policy: TransitionPolicy,
}

impl<S: OrderStore> OrderService<S> {
    /// Creates a service that allows any status change.
    pub fn new(store: S) -> Self {
        Self::with_policy(store, TransitionPolicy::default())
    }

    /// Creates a service with an explicit transition policy.
    pub fn with_policy(store: S, policy: TransitionPolicy) -> Self {
        Self { store, policy }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Loads an order by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, DomainError> {
        Ok(self.store.get(id).await?)
    }

    /// Lists orders matching a filter.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError> {
        Ok(self.store.list(filter).await?)
    }

    /// Lists active orders, optionally restricted to some categories.
    #[tracing::instrument(skip(self))]
    pub async fn list_active_orders(
        &self,
        category_ids: Vec<CategoryId>,
    ) -> Result<Vec<Order>, DomainError> {
        Ok(self.store.list_active(category_ids).await?)
    }

    /// Lists the orders a client created, optionally by status.
    #[tracing::instrument(skip(self))]
    pub async fn list_client_orders(
        &self,
        client_id: UserId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, DomainError> {
        let filter = OrderFilter::new().client(client_id).maybe_status(status);
        self.list_orders(filter).await
    }

    /// Lists a client's finished orders.
    #[tracing::instrument(skip(self))]
    pub async fn list_finished_client_orders(
        &self,
        client_id: UserId,
    ) -> Result<Vec<Order>, DomainError> {
        self.list_client_orders(client_id, Some(OrderStatus::Done))
            .await
    }

    /// Creates a new order.
    ///
    /// The requested status is ignored; new orders are always `active`.
    #[tracing::instrument(skip(self, order), fields(client_id = %order.client_id))]
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, DomainError> {
        validate_new_order(&order)?;

        if let Some(requested) = order.requested_status
            && requested != OrderStatus::Active
        {
            tracing::debug!(%requested, "requested status discarded on create");
        }

        let created = self.store.create(order).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %created.id, "order created");

        Ok(created)
    }

    /// Applies a partial update.
    ///
    /// Under [`TransitionPolicy::Lifecycle`] a status change carries the
    /// statuses it may start from, and the store checks them in the same
    /// write that applies the change.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_order(
        &self,
        id: OrderId,
        changes: OrderChanges,
    ) -> Result<Order, DomainError> {
        validate_changes(&changes)?;

        let target = changes.status_change();
        let changes = match target.and_then(|to| self.policy.allowed_sources(to)) {
            Some(sources) => changes.only_from(sources),
            None => changes,
        };

        let updated = self
            .store
            .update(id, changes)
            .await
            .map_err(|e| match (e, target) {
                (StoreError::UnexpectedStatus { current, .. }, Some(to)) => {
                    metrics::counter!("order_transitions_rejected_total").increment(1);
                    tracing::warn!(order_id = %id, from = %current, %to, "status transition rejected");
                    DomainError::from(OrderError::InvalidTransition { from: current, to })
                }
                (e, _) => e.into(),
            })?;

        metrics::counter!("orders_updated_total").increment(1);
        tracing::info!(order_id = %id, status = %updated.status, "order updated");

        Ok(updated)
    }

    /// Deletes an order permanently.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), DomainError> {
        self.store.delete(id).await?;

        metrics::counter!("orders_deleted_total").increment(1);
        tracing::info!(order_id = %id, "order deleted");

        Ok(())
    }
}
