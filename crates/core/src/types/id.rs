//! Object identifiers issued by the catalog backend.
//!
//! The backend keys every document with a 24-character hexadecimal object id.
//! Use the `define_id!` macro to create type-safe wrappers that prevent
//! accidentally mixing IDs from different entity types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`ObjectId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectIdError {
    /// The input has the wrong number of characters.
    #[error("object id must be {expected} characters (got {actual})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
    /// The input contains a non-hexadecimal character.
    #[error("object id must be hexadecimal")]
    NotHex,
}

/// A 24-character hexadecimal object identifier.
///
/// ## Examples
///
/// ```
/// use emberline_core::ObjectId;
///
/// assert!(ObjectId::parse("65f1c2a9e4b0a1b2c3d4e5f6").is_ok());
/// assert!(ObjectId::parse("not-an-id").is_err());
/// assert!(ObjectId::parse("65f1c2a9e4b0a1b2c3d4e5fz").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Length of an object id in characters.
    pub const LENGTH: usize = 24;

    /// Parse an `ObjectId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 24 ASCII hex digits.
    pub fn parse(s: &str) -> Result<Self, ObjectIdError> {
        if s.len() != Self::LENGTH {
            return Err(ObjectIdError::InvalidLength {
                expected: Self::LENGTH,
                actual: s.len(),
            });
        }

        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ObjectIdError::NotHex);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ObjectIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Macro to define a type-safe ID wrapper around [`ObjectId`].
///
/// Creates a newtype with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()`, `as_str()` and `Display`
/// - `From<ObjectId>`
///
/// # Example
///
/// ```rust
/// # use emberline_core::define_id;
/// define_id!(WishlistId);
///
/// let id = WishlistId::parse("65f1c2a9e4b0a1b2c3d4e5f6").unwrap();
/// assert_eq!(id.as_str(), "65f1c2a9e4b0a1b2c3d4e5f6");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($crate::ObjectId);

        impl $name {
            /// Parse an ID from its hexadecimal form.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is not a valid object id.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::ObjectIdError> {
                $crate::ObjectId::parse(s).map(Self)
            }

            /// Get the underlying hexadecimal string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$crate::ObjectId> for $name {
            fn from(id: $crate::ObjectId) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(ProductId);
define_id!(BlogId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_ids() {
        assert!(ObjectId::parse("65f1c2a9e4b0a1b2c3d4e5f6").is_ok());
        assert!(ObjectId::parse("ABCDEF0123456789abcdef01").is_ok());
        assert!(ObjectId::parse("000000000000000000000000").is_ok());
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            ObjectId::parse("65f1c2a9"),
            Err(ObjectIdError::InvalidLength {
                expected: 24,
                actual: 8
            })
        );
        assert!(ObjectId::parse("").is_err());
        assert!(ObjectId::parse("65f1c2a9e4b0a1b2c3d4e5f6a").is_err());
    }

    #[test]
    fn test_parse_not_hex() {
        assert_eq!(
            ObjectId::parse("65f1c2a9e4b0a1b2c3d4e5fg"),
            Err(ObjectIdError::NotHex)
        );
        // Multi-byte characters must not sneak past the length check
        assert!(ObjectId::parse("65f1c2a9e4b0a1b2c3d4é5").is_err());
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let ok: Result<ObjectId, _> = serde_json::from_str("\"65f1c2a9e4b0a1b2c3d4e5f6\"");
        assert!(ok.is_ok());

        let bad: Result<ObjectId, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_typed_ids() {
        let id = ProductId::parse("65f1c2a9e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(id.to_string(), "65f1c2a9e4b0a1b2c3d4e5f6");
        assert!(UserId::parse("abc").is_err());
    }
}
