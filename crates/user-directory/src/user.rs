use common::UserId;
use serde::{Deserialize, Serialize};

/// Display data for a user, as embedded in order responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDisplayData {
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl UserDisplayData {
    pub fn new(
        id: UserId,
        full_name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            role: role.into(),
        }
    }

    /// A reference carrying only the identifier, used when no lookup is made.
    pub fn id_only(id: UserId) -> Self {
        Self::new(id, "", "", "")
    }
}
