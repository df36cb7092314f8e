//! Strongly-typed identifiers for the Vivarium simulation.
//!
//! Each identifier is a newtype over [`Uuid`] so that an [`EntityId`] can
//! never be passed where a [`BuildingId`] is expected. Identifiers use
//! UUIDv7 so they sort by creation time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype identifier wrapping a [`Uuid`].
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier (UUIDv7, time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Access the underlying [`Uuid`].
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
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a simulated entity.
    EntityId
}

define_id! {
    /// Unique identifier for a constructed building.
    BuildingId
}

define_id! {
    /// Unique identifier for a resource node.
    ResourceId
}

define_id! {
    /// Unique identifier for a world event.
    EventId
}
