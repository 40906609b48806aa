//! In-memory user directory.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::UserId;

use crate::{UserDisplayData, UserLookupError, UserResolver};

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, UserDisplayData>,
    unavailable: bool,
    delay: Option<Duration>,
    lookups: usize,
}

/// In-memory user directory for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user.
    pub fn insert(&self, user: UserDisplayData) {
        self.state.write().unwrap().users.insert(user.id, user);
    }

    /// Makes every lookup fail with `Unavailable` while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }

    /// Delays every lookup, to simulate a slow user service.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state.write().unwrap().delay = delay;
    }

    /// Returns the number of lookups attempted.
    pub fn lookup_count(&self) -> usize {
        self.state.read().unwrap().lookups
    }
}

#[async_trait]
impl UserResolver for InMemoryUserDirectory {
    async fn resolve_user(&self, id: UserId) -> Result<UserDisplayData, UserLookupError> {
        let delay = {
            let mut state = self.state.write().unwrap();
            state.lookups += 1;
            state.delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.read().unwrap();
        if state.unavailable {
            return Err(UserLookupError::Unavailable(
                "user directory is offline".to_string(),
            ));
        }
        state
            .users
            .get(&id)
            .cloned()
            .ok_or(UserLookupError::NotFound(id))
    }
}
