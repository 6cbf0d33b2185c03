//! Entity identifiers
//!
//! UUID-backed newtypes, one per entity. Handlers parse untrusted strings
//! through `parse` and pass the typed id down to the repositories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse an identifier from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
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
    };
}

entity_id!(
    /// Unique user identifier
    UserId
);
entity_id!(
    /// Unique product identifier
    ProductId
);
entity_id!(
    /// Unique cart identifier
    CartId
);
entity_id!(
    /// Unique cart item identifier
    CartItemId
);
entity_id!(
    /// Unique address identifier
    AddressId
);
entity_id!(
    /// Unique order identifier
    OrderId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let id = CartId::new();
        let parsed = CartId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(OrderId::parse("not-a-uuid").is_err());
        assert!(OrderId::parse("").is_err());
    }
}
