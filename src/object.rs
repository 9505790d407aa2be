//! Game objects: items or facts a player holds or a page requires.
//!
//! Objects travel in page front matter (`required`, `discovered`) and in the
//! per-request `Use-Object` header (`key=value; key2=value2`).

use serde::{Deserialize, Serialize};

use crate::page::meta::scalar_string;

/// A named value pair. Equality is exact and case-sensitive on both fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameObject {
    /// Object name, e.g. `key`.
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    /// Object value, e.g. `brass`.
    #[serde(default, deserialize_with = "scalar_string")]
    pub value: String,
}

impl GameObject {
    /// Creates a new object.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Parses the `Use-Object` header value into an ordered object list.
///
/// Tokens are separated by `;`. A token must split on `=` into exactly two
/// parts or it is skipped; both parts are trimmed. Order is preserved, which
/// matters to [`crate::lock::is_locked`].
#[must_use]
pub fn parse_used_objects(header: &str) -> Vec<GameObject> {
    if header.is_empty() {
        return Vec::new();
    }

    header
        .split(';')
        .filter_map(|token| {
            let mut parts = token.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(value), None) => Some(GameObject::new(name.trim(), value.trim())),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_header() {
        assert!(parse_used_objects("").is_empty());
    }

    #[test]
    fn test_parse_trims_and_keeps_order() {
        let objects = parse_used_objects("key = gold ;note=torn;  lamp=  lit  ");
        assert_eq!(
            objects,
            vec![
                GameObject::new("key", "gold"),
                GameObject::new("note", "torn"),
                GameObject::new("lamp", "lit"),
            ]
        );
    }

    #[test]
    fn test_parse_skips_malformed_tokens() {
        let objects = parse_used_objects("key=gold; broken; a=b=c; ;x=y");
        assert_eq!(
            objects,
            vec![GameObject::new("key", "gold"), GameObject::new("x", "y")]
        );
    }

    #[test]
    fn test_parse_accepts_empty_parts() {
        let objects = parse_used_objects("=gold;key=");
        assert_eq!(
            objects,
            vec![GameObject::new("", "gold"), GameObject::new("key", "")]
        );
    }

    #[test]
    fn test_equality_is_case_sensitive() {
        assert_ne!(GameObject::new("Key", "gold"), GameObject::new("key", "gold"));
        assert_ne!(GameObject::new("key", "Gold"), GameObject::new("key", "gold"));
        assert_eq!(GameObject::new("key", "gold"), GameObject::new("key", "gold"));
    }

    #[test]
    fn test_display() {
        assert_eq!(GameObject::new("key", "gold").to_string(), "key=gold");
    }
}
