//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{CategoryId, OrderId, OrderStatus, UserId};
use domain::OrderService;
use order_store::{NewOrder, Order, OrderChanges, OrderFilter, OrderStore};
use serde::{Deserialize, Serialize};
use user_directory::{UserDisplayData, UserResolver, decorate_user, require_user};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::ApiJson;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub order_service: OrderService<S>,
    pub users: Arc<dyn UserResolver>,
}

// -- Request types --
//
// Absent fields deserialize to their empty value, which the handlers treat
// as "not supplied".

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateOrderRequest {
    pub title: String,
    pub description: String,
    pub address: String,
    pub longitude: String,
    pub latitude: String,
    pub status: String,
    pub price: f32,
    pub category_id: String,
    pub client_id: String,
    pub master_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchOrdersRequest {
    pub categories_ids: Vec<String>,
    pub status: String,
    pub client_id: String,
    pub master_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActiveOrdersRequest {
    pub categories_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MyOrdersQuery {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateOrderRequest {
    pub title: String,
    pub description: String,
    pub address: String,
    pub longitude: String,
    pub latitude: String,
    pub status: String,
    pub price: f32,
    pub category_id: String,
    pub client_id: String,
    pub master_id: String,
}

// -- Response types --

/// The outward order record.
#[derive(Debug, Serialize)]
pub struct OrderData {
    pub id: OrderId,
    pub title: String,
    pub description: String,
    pub price: f32,
    pub address: String,
    pub longitude: String,
    pub latitude: String,
    pub status: OrderStatus,
    pub category_id: CategoryId,
    pub client_id: UserId,
    pub master_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<UserDisplayData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master: Option<UserDisplayData>,
    pub created_at: String,
    pub updated_at: String,
}

impl OrderData {
    /// Builds the record with id-only user references.
    fn from_order(order: Order) -> Self {
        let client = UserDisplayData::id_only(order.client_id);
        let master = order.master_id.map(UserDisplayData::id_only);
        Self::with_users(order, Some(client), master)
    }

    fn with_users(
        order: Order,
        client: Option<UserDisplayData>,
        master: Option<UserDisplayData>,
    ) -> Self {
        Self {
            id: order.id,
            title: order.title,
            description: order.description,
            price: order.price,
            address: order.address,
            longitude: order.longitude,
            latitude: order.latitude,
            status: order.status,
            category_id: order.category_id,
            client_id: order.client_id,
            master_id: order.master_id,
            client,
            master,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: OrderData,
}

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderData>,
}

impl OrdersResponse {
    fn from_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: orders.into_iter().map(OrderData::from_order).collect(),
        }
    }
}

// -- Handlers --

/// POST /orders: create an order and resolve its users.
///
/// The order is committed before the client lookup; a failed lookup fails
/// the request but leaves the order in place.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let category_id = CategoryId::from(parse_uuid("category_id", &req.category_id)?);
    let client_id = UserId::from(parse_uuid("client_id", &req.client_id)?);
    let master_id = parse_optional_uuid("master_id", &req.master_id)?.map(UserId::from);

    let mut new_order = NewOrder::new(
        req.title,
        req.description,
        req.address,
        req.longitude,
        req.latitude,
        category_id,
        client_id,
    )
    .price(req.price);
    if let Some(master_id) = master_id {
        new_order = new_order.master(master_id);
    }
    // Any requested status is discarded on create; it is kept only for logging.
    if let Ok(Some(status)) = parse_status(&req.status) {
        new_order = new_order.requested_status(status);
    }

    let order = state.order_service.create_order(new_order).await?;

    let client = require_user(state.users.as_ref(), order.client_id).await?;
    let master = match order.master_id {
        Some(master_id) => decorate_user(state.users.as_ref(), master_id).await,
        None => None,
    };

    let order = OrderData::with_users(order, Some(client), master);
    Ok((StatusCode::CREATED, Json(OrderResponse { order })))
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let id = OrderId::from(parse_uuid("id", &id)?);
    let order = state.order_service.get_order(id).await?;
    Ok(Json(OrderResponse {
        order: OrderData::from_order(order),
    }))
}

/// POST /orders/search: list orders matching every supplied predicate.
///
/// `client_id` and `master_id` must be well-formed; the nil UUID leaves
/// the predicate out.
#[tracing::instrument(skip(state, req))]
pub async fn search<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(req): ApiJson<SearchOrdersRequest>,
) -> Result<Json<OrdersResponse>, ApiError> {
    let category_ids = parse_category_ids(&req.categories_ids)?;
    let status = parse_status(&req.status)?;
    let client_id = UserId::from(parse_uuid("client_id", &req.client_id)?);
    let master_id = UserId::from(parse_uuid("master_id", &req.master_id)?);

    let filter = OrderFilter::new()
        .categories(category_ids)
        .maybe_status(status)
        .client(client_id)
        .master(master_id);

    let orders = state.order_service.list_orders(filter).await?;
    Ok(Json(OrdersResponse::from_orders(orders)))
}

/// POST /orders/active: list active orders, optionally by category.
#[tracing::instrument(skip(state, req))]
pub async fn active<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(req): ApiJson<ActiveOrdersRequest>,
) -> Result<Json<OrdersResponse>, ApiError> {
    let category_ids = parse_category_ids(&req.categories_ids)?;
    let orders = state.order_service.list_active_orders(category_ids).await?;
    Ok(Json(OrdersResponse::from_orders(orders)))
}

/// GET /users/{user_id}/orders?status=
#[tracing::instrument(skip(state))]
pub async fn client_orders<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
    Query(query): Query<MyOrdersQuery>,
) -> Result<Json<OrdersResponse>, ApiError> {
    let client_id = UserId::from(parse_uuid("user_id", &user_id)?);
    let status = parse_status(&query.status)?;
    let orders = state
        .order_service
        .list_client_orders(client_id, status)
        .await?;
    Ok(Json(OrdersResponse::from_orders(orders)))
}

/// GET /users/{user_id}/orders/finished
#[tracing::instrument(skip(state))]
pub async fn finished_client_orders<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
) -> Result<Json<OrdersResponse>, ApiError> {
    let client_id = UserId::from(parse_uuid("user_id", &user_id)?);
    let orders = state
        .order_service
        .list_finished_client_orders(client_id)
        .await?;
    Ok(Json(OrdersResponse::from_orders(orders)))
}

/// PATCH /orders/{id}: apply the non-empty fields of the body.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let id = OrderId::from(parse_uuid("id", &id)?);

    let mut changes = OrderChanges::new()
        .title(req.title)
        .description(req.description)
        .address(req.address)
        .longitude(req.longitude)
        .latitude(req.latitude)
        .price(req.price);
    if let Some(status) = parse_status(&req.status)? {
        changes = changes.status(status);
    }
    if let Some(category_id) = parse_optional_uuid("category_id", &req.category_id)? {
        changes = changes.category_id(category_id.into());
    }
    if let Some(client_id) = parse_optional_uuid("client_id", &req.client_id)? {
        changes = changes.client_id(client_id.into());
    }
    if let Some(master_id) = parse_optional_uuid("master_id", &req.master_id)? {
        changes = changes.master_id(master_id.into());
    }

    let order = state.order_service.update_order(id, changes).await?;
    Ok(Json(OrderResponse {
        order: OrderData::from_order(order),
    }))
}

/// DELETE /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = OrderId::from(parse_uuid("id", &id)?);
    state.order_service.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::invalid_argument(field, e))
}

/// Empty means "not supplied".
fn parse_optional_uuid(field: &str, raw: &str) -> Result<Option<Uuid>, ApiError> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_uuid(field, raw).map(Some)
}

fn parse_category_ids(raw: &[String]) -> Result<Vec<CategoryId>, ApiError> {
    raw.iter()
        .map(|id| parse_uuid("categories_ids", id).map(CategoryId::from))
        .collect()
}

/// Empty means "not supplied".
fn parse_status(raw: &str) -> Result<Option<OrderStatus>, ApiError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e| ApiError::invalid_argument("status", e))
}
