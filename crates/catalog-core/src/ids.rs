//! Newtype IDs for type-safe identifiers.
//!
//! A flavor id and a weight id are both opaque strings on the wire; the
//! newtypes keep a `FlavorId` from being compared against a `WeightId`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// An opaque identifier assigned by the product store.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(CategoryId);
define_id!(FlavorId);
define_id!(WeightId);
define_id!(ImageId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string() {
        let id: FlavorId = "flv-456".into();
        assert_eq!(id.as_str(), "flv-456");
        assert_eq!(format!("{}", id), "flv-456");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = WeightId::new("w-1kg");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"w-1kg\"");
        let back: WeightId = serde_json::from_str("\"w-1kg\"").unwrap();
        assert_eq!(back, id);
    }
}
