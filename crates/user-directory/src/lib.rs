//! Lookups against the external user service.
//!
//! Order responses embed display data for the client and the master. The
//! user service owns that data; this crate resolves it through the
//! [`UserResolver`] trait and exposes the two ways a lookup is used:
//! - [`require_user`]: the caller cannot continue without the user
//! - [`decorate_user`]: the user is a best-effort decoration

pub mod error;
pub mod http;
pub mod lookup;
pub mod memory;
pub mod resolver;
pub mod user;

pub use common::UserId;
pub use error::UserLookupError;
pub use http::{HttpUserResolver, HttpUserResolverConfig};
pub use lookup::{decorate_user, require_user};
pub use memory::InMemoryUserDirectory;
pub use resolver::UserResolver;
pub use user::UserDisplayData;
