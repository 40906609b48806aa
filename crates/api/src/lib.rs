//! HTTP API server with observability for the order service.
//!
//! Exposes the order operations as JSON endpoints, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::{OrderService, TransitionPolicy};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use user_directory::UserResolver;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders/search", post(routes::orders::search::<S>))
        .route("/orders/active", post(routes::orders::active::<S>))
        .route(
            "/orders/{id}",
            get(routes::orders::get::<S>)
                .patch(routes::orders::update::<S>)
                .delete(routes::orders::delete::<S>),
        )
        .route(
            "/users/{user_id}/orders",
            get(routes::orders::client_orders::<S>),
        )
        .route(
            "/users/{user_id}/orders/finished",
            get(routes::orders::finished_client_orders::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around a store and a user resolver.
pub fn create_state<S: OrderStore + 'static>(
    store: S,
    policy: TransitionPolicy,
    users: Arc<dyn UserResolver>,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        order_service: OrderService::with_policy(store, policy),
        users,
    })
}
