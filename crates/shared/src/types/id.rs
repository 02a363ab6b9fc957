//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ComponentId` where a `RepairId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a typed ID wrapper.
///
/// Backend rows carry ids as UUID strings, so every wrapper serializes
/// transparently as the bare UUID.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
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

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(CompanyId, "Unique identifier for a customer company.");
typed_id!(ReturnId, "Unique identifier for a product return.");
typed_id!(RepairId, "Unique identifier for a repair job.");
typed_id!(
    RepairComponentId,
    "Unique identifier for a component line on a repair."
);
typed_id!(ShipmentId, "Unique identifier for a shipment.");
typed_id!(ComponentId, "Unique identifier for an inventory component.");
typed_id!(StockMovementId, "Unique identifier for a stock movement.");
typed_id!(BudgetEntryId, "Unique identifier for a weekly budget entry.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
