//! Tests for the HTTP user resolver against a local stand-in service.

use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use common::UserId;
use user_directory::{
    HttpUserResolver, HttpUserResolverConfig, UserDisplayData, UserLookupError, UserResolver,
};

const KNOWN_USER: &str = "5b0c6f7e-2f43-4c49-9d55-1d2f8a1c7e10";
const BROKEN_USER: &str = "0d7e8a1b-6c35-4b59-8f0a-3a6c2b1d9e44";
const GARBLED_USER: &str = "9a3f1c2d-4e5b-4f6a-8b7c-0d1e2f3a4b5c";
const SLOW_USER: &str = "7c2e9b4a-1d3f-4a5b-9c8d-e7f6a5b4c3d2";

async fn user_handler(Path(id): Path<String>) -> Result<Json<serde_json::Value>, StatusCode> {
    match id.as_str() {
        KNOWN_USER => Ok(Json(serde_json::json!({
            "user": {
                "id": KNOWN_USER,
                "full_name": "Ivan Petrov",
                "email": "ivan@example.com",
                "role": "client"
            }
        }))),
        BROKEN_USER => Err(StatusCode::INTERNAL_SERVER_ERROR),
        GARBLED_USER => Ok(Json(serde_json::json!({ "unexpected": true }))),
        SLOW_USER => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
        _ => Err(StatusCode::NOT_FOUND),
    }
}

/// Starts the stand-in user service and returns its base URL.
async fn spawn_user_service() -> String {
    spawn_user_service_at("").await
}

/// Starts the stand-in user service under a path prefix.
async fn spawn_user_service_at(prefix: &str) -> String {
    let app = Router::new().route(&format!("{prefix}/users/{{id}}"), get(user_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn resolver(timeout_ms: u64) -> HttpUserResolver {
    HttpUserResolver::new(HttpUserResolverConfig {
        base_url: spawn_user_service().await,
        timeout_ms,
    })
    .unwrap()
}

fn id(s: &str) -> UserId {
    UserId::parse_str(s).unwrap()
}

#[tokio::test]
async fn resolves_known_user() {
    let resolver = resolver(1000).await;

    let user = resolver.resolve_user(id(KNOWN_USER)).await.unwrap();

    assert_eq!(
        user,
        UserDisplayData::new(id(KNOWN_USER), "Ivan Petrov", "ivan@example.com", "client")
    );
}

#[tokio::test]
async fn resolves_under_a_prefixed_base_url() {
    let addr = spawn_user_service_at("/api").await;

    for base_url in [format!("{addr}/api/"), format!("{addr}/api")] {
        let resolver = HttpUserResolver::new(HttpUserResolverConfig {
            base_url,
            timeout_ms: 1000,
        })
        .unwrap();

        let user = resolver.resolve_user(id(KNOWN_USER)).await.unwrap();
        assert_eq!(user.full_name, "Ivan Petrov");
    }
}

#[tokio::test]
async fn not_found_maps_to_not_found() {
    let resolver = resolver(1000).await;
    let missing = UserId::new();

    assert_eq!(
        resolver.resolve_user(missing).await,
        Err(UserLookupError::NotFound(missing))
    );
}

#[tokio::test]
async fn server_error_maps_to_unavailable() {
    let resolver = resolver(1000).await;
    let result = resolver.resolve_user(id(BROKEN_USER)).await;
    assert!(matches!(result, Err(UserLookupError::Unavailable(_))));
}

#[tokio::test]
async fn undecodable_body_is_invalid_response() {
    let resolver = resolver(1000).await;
    let result = resolver.resolve_user(id(GARBLED_USER)).await;
    assert!(matches!(result, Err(UserLookupError::InvalidResponse(_))));
}

#[tokio::test]
async fn timeout_maps_to_unavailable() {
    let resolver = resolver(100).await;
    let result = resolver.resolve_user(id(SLOW_USER)).await;
    assert!(matches!(result, Err(UserLookupError::Unavailable(_))));
}

#[tokio::test]
async fn unreachable_service_is_unavailable() {
    let resolver = HttpUserResolver::new(HttpUserResolverConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_ms: 500,
    })
    .unwrap();

    let result = resolver.resolve_user(UserId::new()).await;
    assert!(matches!(result, Err(UserLookupError::Unavailable(_))));
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = HttpUserResolver::new(HttpUserResolverConfig {
        base_url: "not a url".to_string(),
        timeout_ms: 500,
    });
    assert!(result.is_err());
}
