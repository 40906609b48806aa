use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a UUID newtype so order, category and user identifiers
/// cannot be mixed up at call sites.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The all-zero identifier, used on the wire to mean "not supplied".
            pub fn nil() -> Self {
                Self(Uuid::nil())
            }

            /// Returns true for the all-zero identifier.
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            /// Parses the canonical textual form.
            pub fn parse_str(input: &str) -> Result<Self, uuid::Error> {
                Uuid::parse_str(input).map(Self)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Unique identifier of an order.
    OrderId
);

uuid_id!(
    /// Identifier of a category owned by the catalogue service.
    CategoryId
);

uuid_id!(
    /// Identifier of a user (client or master) owned by the user service.
    UserId
);
