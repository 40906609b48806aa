//! User lookup error types.

use common::UserId;
use thiserror::Error;

/// Errors that can occur when resolving a user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserLookupError {
    /// The user service has no such user.
    #[error("User not found: {0}")]
    NotFound(UserId),

    /// The user service could not be reached or answered with an error.
    #[error("User service unavailable: {0}")]
    Unavailable(String),

    /// The user service answered with something that is not user data.
    #[error("Invalid response from user service: {0}")]
    InvalidResponse(String),
}
