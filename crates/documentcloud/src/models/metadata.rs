//! The restricted key/value store DocumentCloud allows with each document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Metadata keys the service reserves for itself. Case-sensitive.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "person",
    "organization",
    "place",
    "term",
    "email",
    "phone",
    "city",
    "state",
    "country",
    "title",
    "description",
    "source",
    "account",
    "group",
    "project",
    "projectid",
    "document",
    "access",
    "filter",
];

/// Check a caller-supplied metadata key against the reserved-word list.
///
/// # Errors
///
/// Returns a validation error when the key is reserved by the service.
pub fn validate_data_keyword(keyword: &str) -> ClientResult<()> {
    if RESERVED_KEYWORDS.contains(&keyword) {
        Err(ClientError::validation(
            "data",
            format!("the key '{keyword}' is reserved by DocumentCloud"),
        ))
    } else {
        Ok(())
    }
}

/// A string-to-string metadata map attached to a document.
///
/// Functions like an ordinary map with two exceptions: keys reserved by
/// DocumentCloud are rejected at insertion time, and only strings are
/// representable (non-string input is rejected when building from JSON).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Create an empty metadata map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair, validating the key eagerly.
    ///
    /// Returns the previous value for the key, if any.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the key is reserved.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> ClientResult<Option<String>> {
        let key = key.into();
        validate_data_keyword(&key)?;
        Ok(self.0.insert(key, value.into()))
    }

    /// Build a metadata map from arbitrary JSON.
    ///
    /// # Errors
    ///
    /// Returns a type error when the value is not an object with string
    /// values, and a validation error when any key is reserved.
    pub fn from_value(value: serde_json::Value) -> ClientResult<Self> {
        let serde_json::Value::Object(object) = value else {
            return Err(ClientError::validation("data", "this attribute must be a mapping"));
        };
        let mut data = Self::new();
        for (key, value) in object {
            let serde_json::Value::String(value) = value else {
                return Err(ClientError::validation("data", "data attribute values must be strings"));
            };
            data.insert(key, value)?;
        }
        Ok(data)
    }

    /// Re-check every key against the reserved-word list.
    ///
    /// Deserialized maps skip the eager check (server data is authoritative),
    /// so callers that forward a map to the service run this first.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first reserved key found.
    pub fn validate(&self) -> ClientResult<()> {
        for key in self.0.keys() {
            validate_data_keyword(key)?;
        }
        Ok(())
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate over key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<BTreeMap<String, String>> for Metadata {
    type Error = ClientError;

    fn try_from(map: BTreeMap<String, String>) -> ClientResult<Self> {
        for key in map.keys() {
            validate_data_keyword(key)?;
        }
        Ok(Self(map))
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_accepts_ordinary_keys() {
        let data = Metadata::from_value(json!({"boom": "bap"})).unwrap();
        assert_eq!(data.get("boom"), Some("bap"));
    }

    #[test]
    fn test_rejects_reserved_key() {
        let err = Metadata::from_value(json!({"title": "brick house"})).unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
    }

    #[test]
    fn test_rejects_non_string_value() {
        let err = Metadata::from_value(json!({"pages": 42})).unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
    }

    #[test]
    fn test_rejects_non_mapping() {
        let err = Metadata::from_value(json!(["a", "b"])).unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
    }

    #[test]
    fn test_insert_validates_eagerly() {
        let mut data = Metadata::new();
        assert!(data.insert("access", "y").is_err());
        assert!(data.insert("beat", "city hall").is_ok());
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_reserved_check_is_case_sensitive() {
        // The service only reserves the lowercase forms.
        let mut data = Metadata::new();
        assert!(data.insert("Title", "ok").is_ok());
    }

    #[test]
    fn test_deserialized_map_bypasses_reserved_check() {
        // Server responses may carry any keys; validate() re-checks them.
        let data: Metadata = serde_json::from_value(json!({"title": "from server"})).unwrap();
        assert_eq!(data.get("title"), Some("from server"));
        assert!(data.validate().is_err());
    }
}
