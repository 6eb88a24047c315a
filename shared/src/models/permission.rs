//! Permission Catalog Models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a dotted permission key fails to parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid permission key: {0:?}")]
pub struct InvalidPermissionKey(pub String);

/// A fine-grained permission identifier in `category.action` form.
///
/// Raw strings are parsed exactly once at the boundary; internal code
/// passes the structured key around and never re-splits strings.
/// Serializes transparently as the dotted string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionKey {
    category: String,
    action: String,
}

impl PermissionKey {
    /// Build a key from its two parts
    pub fn new(
        category: impl Into<String>,
        action: impl Into<String>,
    ) -> Result<Self, InvalidPermissionKey> {
        let category = category.into();
        let action = action.into();
        if !is_valid_segment(&category) || !is_valid_segment(&action) {
            return Err(InvalidPermissionKey(format!("{category}.{action}")));
        }
        Ok(Self { category, action })
    }

    /// Parse a dotted `category.action` string.
    ///
    /// The split happens on the first `.`; both sides must be non-empty
    /// lowercase identifiers.
    pub fn parse(raw: &str) -> Result<Self, InvalidPermissionKey> {
        let (category, action) = raw
            .split_once('.')
            .ok_or_else(|| InvalidPermissionKey(raw.to_string()))?;
        Self::new(category, action)
    }

    /// Category prefix of the key
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Action suffix of the key
    pub fn action(&self) -> &str {
        &self.action
    }
}

fn is_valid_segment(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.action)
    }
}

impl FromStr for PermissionKey {
    type Err = InvalidPermissionKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PermissionKey {
    type Error = InvalidPermissionKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PermissionKey> for String {
    fn from(key: PermissionKey) -> Self {
        key.to_string()
    }
}

/// A single permission action in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionAction {
    pub key: PermissionKey,
    pub label: String,
    pub description: String,
}

/// A named group of related permission actions.
///
/// Action order is insertion order; it matters for display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionCategory {
    /// Category key, the prefix of every contained action key
    pub key: String,
    pub label: String,
    pub description: String,
    /// Coarser grouping tag ("System" / "Operations" / "Analytics")
    pub group: String,
    pub actions: Vec<PermissionAction>,
}

/// How much of a category's actions a role has granted.
///
/// `Partial` drives the indeterminate checkbox state in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGrant {
    None,
    Partial,
    Full,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_key() {
        let key = PermissionKey::parse("billing.view").unwrap();
        assert_eq!(key.category(), "billing");
        assert_eq!(key.action(), "view");
        assert_eq!(key.to_string(), "billing.view");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(PermissionKey::parse("billing").is_err());
        assert!(PermissionKey::parse(".view").is_err());
        assert!(PermissionKey::parse("billing.").is_err());
        assert!(PermissionKey::parse("").is_err());
        assert!(PermissionKey::parse("Billing.View").is_err());
        assert!(PermissionKey::parse("billing view.x").is_err());
    }

    #[test]
    fn test_split_on_first_dot() {
        // Only the first dot separates category from action
        assert!(PermissionKey::parse("a.b.c").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let key = PermissionKey::parse("inventory.adjust_stock").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"inventory.adjust_stock\"");

        let back: PermissionKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<PermissionKey, _> = serde_json::from_str("\"notakey\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = PermissionKey::parse("billing.create").unwrap();
        let b = PermissionKey::parse("billing.view").unwrap();
        let c = PermissionKey::parse("inventory.view").unwrap();
        assert!(a < b);
        assert!(b < c);
    }
}
