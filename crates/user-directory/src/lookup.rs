//! The two ways an order response uses a user lookup.

use common::UserId;

use crate::{UserDisplayData, UserLookupError, UserResolver};

/// Resolves a user the request cannot do without.
///
/// Any failure is returned to the caller, which aborts the request.
#[tracing::instrument(skip(resolver))]
pub async fn require_user<R: UserResolver + ?Sized>(
    resolver: &R,
    id: UserId,
) -> Result<UserDisplayData, UserLookupError> {
    resolver.resolve_user(id).await.inspect_err(|e| {
        metrics::counter!("user_lookups_failed_total", "kind" => "required").increment(1);
        tracing::error!(user_id = %id, error = %e, "required user lookup failed");
    })
}

/// Resolves a user that only decorates the response.
///
/// Failures are logged and swallowed; the caller omits the field.
#[tracing::instrument(skip(resolver))]
pub async fn decorate_user<R: UserResolver + ?Sized>(
    resolver: &R,
    id: UserId,
) -> Option<UserDisplayData> {
    match resolver.resolve_user(id).await {
        Ok(user) => Some(user),
        Err(e) => {
            metrics::counter!("user_lookups_failed_total", "kind" => "optional").increment(1);
            tracing::warn!(user_id = %id, error = %e, "optional user lookup failed, omitting");
            None
        }
    }
}
