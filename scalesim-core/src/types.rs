//! Label newtypes used across the kernel.
//!
//! Names and kinds are reporting labels, not identity: two entities may share
//! a name, and container membership is always decided by entity identity
//! (see [`crate::entity`]).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! label_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

label_newtype! {
    /// Human-readable entity name, for reporting only.
    EntityName
}

label_newtype! {
    /// The kind tag carried by entities and checked by stocks.
    EntityKind
}

label_newtype! {
    /// The name of a stock.
    StockName
}

label_newtype! {
    /// The kind label of a movement, e.g. `"launch_replica"`.
    MovementKind
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_display_and_compare() {
        let kind = EntityKind::from("Replica");
        assert_eq!(kind.to_string(), "Replica");
        assert_eq!(kind, EntityKind::new("Replica"));
        assert_ne!(kind, EntityKind::new("Request"));
        assert_eq!(StockName::from("backlog").as_str(), "backlog");
    }
}
