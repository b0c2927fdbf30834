//! Identifier types for redline.
//!
//! This module provides the two opaque identifiers the session core is
//! built around:
//!
//! - [`ContentHandle`] — capability token referencing cached submission text
//! - [`CallerKey`] — one-way digest of a caller's network address
//!
//! # Macro-based ID Types
//!
//! The `uuid_id_type!` macro reduces boilerplate for UUID-based identifier
//! types, ensuring consistent implementation of serialization, parsing, and
//! display traits.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Macro to define a UUID-based identifier type with standard trait implementations.
///
/// This macro generates a newtype wrapper around `uuid::Uuid` with implementations for:
/// - `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `Serialize`, `Deserialize` (as string)
/// - `FromStr`, `Display`, `Debug`
/// - `TryFrom<String>`, `Into<String>`
macro_rules! uuid_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Create an identifier from a UUID.
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            ///
            /// Version-4 UUIDs carry 122 bits of randomness, which is what
            /// makes handles usable as unguessable capability tokens.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Return the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid)?;
                Ok(Self(uuid))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }
    };
}

uuid_id_type!(
    ContentHandle,
    "An unguessable reference to cached submission text.\n\nHandles act as capability tokens: anyone holding the handle can retrieve\nthe text, so they are drawn from the full UUIDv4 space rather than any\nsequence a client could enumerate."
);

/// Number of hex characters kept from the address digest.
const CALLER_KEY_LEN: usize = 16;

/// Address used when no forwarded address is available.
///
/// Admission must never fail closed on a missing header; all such callers
/// share one quota bucket instead.
const SENTINEL_ADDR: &str = "0.0.0.0";

/// A one-way, fixed-length digest of a caller's network address.
///
/// The raw address is never stored; the key is recomputed per request and
/// used only to look up that caller's quota window.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerKey(String);

impl CallerKey {
    /// Derive a key from a network address.
    #[must_use]
    pub fn from_addr(addr: &str) -> Self {
        let digest = Sha256::digest(addr.as_bytes());
        let mut key = hex::encode(digest);
        key.truncate(CALLER_KEY_LEN);
        Self(key)
    }

    /// Derive a key from the contents of a forwarded-address header.
    ///
    /// Proxies append to `X-Forwarded-For`, so the first comma-separated
    /// entry is the original client. A missing or empty header maps every
    /// caller to the sentinel bucket rather than rejecting the request.
    #[must_use]
    pub fn from_forwarded(header: Option<&str>) -> Self {
        let addr = header
            .and_then(|h| h.split(',').next())
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(SENTINEL_ADDR);
        Self::from_addr(addr)
    }
}

impl fmt::Debug for CallerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallerKey({})", self.0)
    }
}

impl fmt::Display for CallerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid UUID.
    #[error("invalid UUID format")]
    InvalidUuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn content_handle_roundtrip() {
        let handle = ContentHandle::generate();
        let str_repr = handle.to_string();
        let parsed = ContentHandle::from_str(&str_repr).unwrap();
        assert_eq!(handle, parsed);
    }

    #[test]
    fn content_handle_serde_json() {
        let handle = ContentHandle::generate();
        let json = serde_json::to_string(&handle).unwrap();
        let parsed: ContentHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(handle, parsed);
    }

    #[test]
    fn content_handle_rejects_garbage() {
        assert!(ContentHandle::from_str("not-a-uuid").is_err());
        assert!(ContentHandle::from_str("12345").is_err());
    }

    #[test]
    fn content_handles_are_unique() {
        let handles: HashSet<_> = (0..1000).map(|_| ContentHandle::generate()).collect();
        assert_eq!(handles.len(), 1000);
    }

    #[test]
    fn caller_key_is_fixed_length() {
        let key = CallerKey::from_addr("203.0.113.7");
        assert_eq!(key.to_string().len(), 16);
        assert!(key.to_string().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn caller_key_is_stable() {
        assert_eq!(
            CallerKey::from_addr("203.0.113.7"),
            CallerKey::from_addr("203.0.113.7")
        );
        assert_ne!(
            CallerKey::from_addr("203.0.113.7"),
            CallerKey::from_addr("203.0.113.8")
        );
    }

    #[test]
    fn forwarded_header_takes_first_entry() {
        let direct = CallerKey::from_addr("203.0.113.7");
        let forwarded = CallerKey::from_forwarded(Some("203.0.113.7, 10.0.0.1"));
        assert_eq!(direct, forwarded);
    }

    #[test]
    fn missing_header_falls_back_to_sentinel() {
        let a = CallerKey::from_forwarded(None);
        let b = CallerKey::from_forwarded(Some(""));
        assert_eq!(a, b);
    }
}
