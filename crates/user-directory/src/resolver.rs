use async_trait::async_trait;
use common::UserId;

use crate::{UserDisplayData, UserLookupError};

/// Trait for resolving user identifiers to display data.
#[async_trait]
pub trait UserResolver: Send + Sync {
    /// Resolves one user.
    async fn resolve_user(&self, id: UserId) -> Result<UserDisplayData, UserLookupError>;
}
