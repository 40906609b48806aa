//! HTTP client for the user service.

use std::time::Duration;

use async_trait::async_trait;
use common::UserId;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::{UserDisplayData, UserLookupError, UserResolver};

/// Configuration for the user service client.
#[derive(Debug, Clone)]
pub struct HttpUserResolverConfig {
    /// Base URL of the user service (e.g. `http://user-service:8080` or
    /// `http://gateway/api/`). Lookups go to `{base_url}/users/{id}`.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for HttpUserResolverConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:50053".to_string(),
            timeout_ms: 5000,
        }
    }
}

/// Response envelope of `GET /users/{id}`.
#[derive(Debug, Deserialize)]
struct GetUserResponse {
    user: UserDisplayData,
}

/// Resolves users through the user service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpUserResolver {
    client: Client,
    base_url: Url,
}

impl HttpUserResolver {
    /// Creates a client for the configured user service.
    pub fn new(config: HttpUserResolverConfig) -> Result<Self, UserLookupError> {
        // `Url::join` replaces the last path segment unless the base ends in `/`.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            UserLookupError::Unavailable(format!("invalid base URL '{}': {e}", config.base_url))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("order-service/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UserLookupError::Unavailable(format!("failed to build client: {e}")))?;

        tracing::info!(%base_url, timeout_ms = config.timeout_ms, "created user service client");

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl UserResolver for HttpUserResolver {
    async fn resolve_user(&self, id: UserId) -> Result<UserDisplayData, UserLookupError> {
        let url = self
            .base_url
            .join(&format!("users/{id}"))
            .map_err(|e| UserLookupError::Unavailable(format!("invalid URL: {e}")))?;

        tracing::debug!(%url, "resolving user");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UserLookupError::Unavailable(format!("request failed: {e}")))?;

        match response.status() {
            status if status.is_success() => {
                let body: GetUserResponse = response
                    .json()
                    .await
                    .map_err(|e| UserLookupError::InvalidResponse(e.to_string()))?;
                Ok(body.user)
            }
            StatusCode::NOT_FOUND => Err(UserLookupError::NotFound(id)),
            status => Err(UserLookupError::Unavailable(format!(
                "user service answered {status}"
            ))),
        }
    }
}
