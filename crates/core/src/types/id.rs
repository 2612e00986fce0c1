//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_code!` macro to create type-safe wrappers around the
//! operator-entered codes the POS backend uses as primary keys (e.g. `C001`,
//! `I042`). Wrapping them prevents accidentally passing an item code where a
//! customer ID is expected.

/// Macro to define a type-safe code wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use tillside_core::define_code;
/// define_code!(CustomerId);
/// define_code!(ItemCode);
///
/// let customer = CustomerId::new("C001");
/// let item = ItemCode::new("I001");
///
/// // These are different types, so this won't compile:
/// // let _: CustomerId = item;
/// ```
#[macro_export]
macro_rules! define_code {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new code from any string-like value.
            #[must_use]
            pub fn new(code: impl Into<String>) -> Self {
                Self(code.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether the code is empty (never valid for a saved entity).
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(code: String) -> Self {
                Self(code)
            }
        }

        impl From<&str> for $name {
            fn from(code: &str) -> Self {
                Self(code.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity codes
define_code!(CustomerId);
define_code!(ItemCode);
define_code!(OrderId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        let id = CustomerId::new("C001");
        assert_eq!(id.as_str(), "C001");
        assert_eq!(id.to_string(), "C001");
        assert_eq!(id.clone().into_inner(), "C001");
    }

    #[test]
    fn test_code_equality() {
        assert_eq!(ItemCode::new("I001"), ItemCode::from("I001"));
        assert_ne!(ItemCode::new("I001"), ItemCode::new("I002"));
    }

    #[test]
    fn test_code_empty() {
        assert!(OrderId::new("").is_empty());
        assert!(!OrderId::new("D001").is_empty());
    }

    #[test]
    fn test_serde_transparent() {
        let id = CustomerId::new("C007");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"C007\"");

        let back: CustomerId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
