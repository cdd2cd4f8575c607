//! Opaque identifier for phone listings.
//!
//! Identifiers are assigned by the REST backend. Some backends hand out
//! strings, others integers; both are accepted on the wire and kept as text,
//! and always serialized back as a JSON string.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier of a persisted [`Phone`](crate::Phone).
///
/// # Example
///
/// ```rust
/// # use phone_catalog_core::PhoneId;
/// let from_string: PhoneId = serde_json::from_str("\"a1b2\"").unwrap();
/// let from_number: PhoneId = serde_json::from_str("42").unwrap();
///
/// assert_eq!(from_string.as_str(), "a1b2");
/// assert_eq!(from_number.as_str(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PhoneId(String);

impl PhoneId {
    /// Create an ID from its textual form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PhoneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PhoneId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<PhoneId> for String {
    fn from(id: PhoneId) -> Self {
        id.0
    }
}

impl<'de> Deserialize<'de> for PhoneId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}
