//! Order record and the inputs accepted by the store.

use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::{CategoryId, OrderId, OrderStatus, UserId};

/// A persisted order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub title: String,
    pub description: String,
    pub price: f32,
    pub address: String,
    pub longitude: String,
    pub latitude: String,
    pub category_id: CategoryId,
    pub client_id: UserId,
    pub master_id: Option<UserId>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns true if the order's status satisfies the update's guard.
    pub(crate) fn admits(&self, changes: &OrderChanges) -> bool {
        changes
            .allowed_from()
            .is_none_or(|allowed| allowed.contains(&self.status))
    }

    /// Applies the supplied fields of `changes` and stamps `updated_at`.
    pub(crate) fn apply(&mut self, changes: &OrderChanges, now: DateTime<Utc>) {
        if let Some(title) = &changes.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &changes.description {
            self.description.clone_from(description);
        }
        if let Some(address) = &changes.address {
            self.address.clone_from(address);
        }
        if let Some(longitude) = &changes.longitude {
            self.longitude.clone_from(longitude);
        }
        if let Some(latitude) = &changes.latitude {
            self.latitude.clone_from(latitude);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(category_id) = changes.category_id {
            self.category_id = category_id;
        }
        if let Some(client_id) = changes.client_id {
            self.client_id = client_id;
        }
        if let Some(master_id) = changes.master_id {
            self.master_id = Some(master_id);
        }
        self.updated_at = next_update_time(self.updated_at, now);
    }
}

/// Fields for a new order.
///
/// `requested_status` is accepted from callers but never stored: every
/// order starts out `active`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub id: Option<OrderId>,
    pub title: String,
    pub description: String,
    pub price: Option<f32>,
    pub address: String,
    pub longitude: String,
    pub latitude: String,
    pub category_id: CategoryId,
    pub client_id: UserId,
    pub master_id: Option<UserId>,
    pub requested_status: Option<OrderStatus>,
}

impl NewOrder {
    /// Creates a new order input with the required fields.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        address: impl Into<String>,
        longitude: impl Into<String>,
        latitude: impl Into<String>,
        category_id: CategoryId,
        client_id: UserId,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            price: None,
            address: address.into(),
            longitude: longitude.into(),
            latitude: latitude.into(),
            category_id,
            client_id,
            master_id: None,
            requested_status: None,
        }
    }

    /// Uses a caller-chosen identifier instead of generating one.
    pub fn with_id(mut self, id: OrderId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn price(mut self, price: f32) -> Self {
        self.price = Some(price);
        self
    }

    /// Assigns a master. The nil identifier means no master.
    pub fn master(mut self, master_id: UserId) -> Self {
        self.master_id = (!master_id.is_nil()).then_some(master_id);
        self
    }

    pub fn requested_status(mut self, status: OrderStatus) -> Self {
        self.requested_status = Some(status);
        self
    }

    /// Builds the stored record. Status is always `active`.
    pub(crate) fn into_order(self, now: DateTime<Utc>) -> Order {
        Order {
            id: self.id.unwrap_or_default(),
            title: self.title,
            description: self.description,
            price: self.price.unwrap_or(0.0),
            address: self.address,
            longitude: self.longitude,
            latitude: self.latitude,
            category_id: self.category_id,
            client_id: self.client_id,
            master_id: self.master_id.filter(|id| !id.is_nil()),
            status: OrderStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial update.
///
/// Setters drop empty values (empty string, nil identifier, zero price),
/// so an empty value always means "leave unchanged" and a field cannot be
/// cleared through an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) address: Option<String>,
    pub(crate) longitude: Option<String>,
    pub(crate) latitude: Option<String>,
    pub(crate) status: Option<OrderStatus>,
    pub(crate) price: Option<f32>,
    pub(crate) category_id: Option<CategoryId>,
    pub(crate) client_id: Option<UserId>,
    pub(crate) master_id: Option<UserId>,
    pub(crate) allowed_from: Option<Vec<OrderStatus>>,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.is_empty()).then_some(value)
}

impl OrderChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(title);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(description);
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = non_empty(address);
        self
    }

    pub fn longitude(mut self, longitude: impl Into<String>) -> Self {
        self.longitude = non_empty(longitude);
        self
    }

    pub fn latitude(mut self, latitude: impl Into<String>) -> Self {
        self.latitude = non_empty(latitude);
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn price(mut self, price: f32) -> Self {
        self.price = (price != 0.0).then_some(price);
        self
    }

    pub fn category_id(mut self, category_id: CategoryId) -> Self {
        self.category_id = (!category_id.is_nil()).then_some(category_id);
        self
    }

    pub fn client_id(mut self, client_id: UserId) -> Self {
        self.client_id = (!client_id.is_nil()).then_some(client_id);
        self
    }

    pub fn master_id(mut self, master_id: UserId) -> Self {
        self.master_id = (!master_id.is_nil()).then_some(master_id);
        self
    }

    /// Applies the update only while the order is in one of `statuses`.
    ///
    /// The check happens in the same write as the update; an order in any
    /// other status yields `UnexpectedStatus`.
    pub fn only_from(mut self, statuses: impl IntoIterator<Item = OrderStatus>) -> Self {
        self.allowed_from = Some(statuses.into_iter().collect());
        self
    }

    /// The statuses the order must be in, if the update is guarded.
    pub fn allowed_from(&self) -> Option<&[OrderStatus]> {
        self.allowed_from.as_deref()
    }

    /// The requested status, if the update changes it.
    pub fn status_change(&self) -> Option<OrderStatus> {
        self.status
    }

    /// The requested price, if the update changes it.
    pub fn price_change(&self) -> Option<f32> {
        self.price
    }

    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        Self {
            allowed_from: None,
            ..self.clone()
        } == Self::default()
    }
}

/// Current time at the precision PostgreSQL stores (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// `now`, or one microsecond past `previous` if the clock has not moved on.
pub(crate) fn next_update_time(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    std::cmp::max(now, previous + Duration::microseconds(1))
}
