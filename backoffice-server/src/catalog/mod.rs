//! Permission Catalog
//!
//! Static, immutable registry of permission categories and actions.
//! Loaded once at process start; every role's permission set is
//! validated against it. The catalog must be identical across all
//! instances for authorization decisions to be portable.

mod builtin;

pub use builtin::builtin_categories;

use shared::models::{PermissionAction, PermissionCategory, PermissionKey};
use std::collections::HashMap;
use thiserror::Error;

/// Catalog definition error, raised at construction time only
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("action key '{key}' does not carry its category prefix '{category}'")]
    PrefixMismatch { key: String, category: String },
    #[error("duplicate action key '{0}' in catalog")]
    DuplicateAction(String),
    #[error("duplicate category key '{0}' in catalog")]
    DuplicateCategory(String),
}

/// Immutable permission catalog
#[derive(Debug)]
pub struct PermissionCatalog {
    categories: Vec<PermissionCategory>,
    by_category: HashMap<String, usize>,
    by_action: HashMap<PermissionKey, (usize, usize)>,
}

impl PermissionCatalog {
    /// Build a catalog, enforcing key uniqueness and prefix consistency
    pub fn try_new(categories: Vec<PermissionCategory>) -> Result<Self, CatalogError> {
        let mut by_category = HashMap::new();
        let mut by_action = HashMap::new();

        for (ci, category) in categories.iter().enumerate() {
            if by_category.insert(category.key.clone(), ci).is_some() {
                return Err(CatalogError::DuplicateCategory(category.key.clone()));
            }
            for (ai, action) in category.actions.iter().enumerate() {
                if action.key.category() != category.key {
                    return Err(CatalogError::PrefixMismatch {
                        key: action.key.to_string(),
                        category: category.key.clone(),
                    });
                }
                if by_action.insert(action.key.clone(), (ci, ai)).is_some() {
                    return Err(CatalogError::DuplicateAction(action.key.to_string()));
                }
            }
        }

        Ok(Self {
            categories,
            by_category,
            by_action,
        })
    }

    /// The built-in back-office catalog
    ///
    /// # Panics
    ///
    /// Panics if the built-in definitions are malformed; this is a
    /// startup-time programming error, covered by tests.
    pub fn builtin() -> Self {
        Self::try_new(builtin_categories()).expect("built-in permission catalog is valid")
    }

    /// Look up a category by key
    pub fn category(&self, key: &str) -> Option<&PermissionCategory> {
        self.by_category.get(key).map(|&ci| &self.categories[ci])
    }

    /// Look up an action by its full key
    pub fn action(&self, key: &PermissionKey) -> Option<&PermissionAction> {
        self.by_action
            .get(key)
            .map(|&(ci, ai)| &self.categories[ci].actions[ai])
    }

    /// All categories, in display order
    pub fn categories(&self) -> &[PermissionCategory] {
        &self.categories
    }

    /// Whether a permission key exists in the catalog
    pub fn contains(&self, key: &PermissionKey) -> bool {
        self.by_action.contains_key(key)
    }

    /// Total number of actions across all categories
    pub fn action_count(&self) -> usize {
        self.by_action.len()
    }

    /// Human label for the category of a raw dotted key.
    ///
    /// Falls back to the raw key when the key is malformed or the
    /// category is unknown; display formatting never fails.
    pub fn format_category_key(&self, raw: &str) -> String {
        raw.split_once('.')
            .and_then(|(category, _)| self.category(category))
            .map(|c| c.label.clone())
            .unwrap_or_else(|| raw.to_string())
    }

    /// Human label for a raw dotted action key, falling back to the raw key
    pub fn format_action_key(&self, raw: &str) -> String {
        PermissionKey::parse(raw)
            .ok()
            .and_then(|key| self.action(&key).map(|a| a.label.clone()))
            .unwrap_or_else(|| raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> PermissionKey {
        PermissionKey::parse(raw).unwrap()
    }

    #[test]
    fn test_builtin_is_valid() {
        let catalog = PermissionCatalog::builtin();
        assert_eq!(catalog.categories().len(), 11);
        assert!(catalog.action_count() >= 40);
    }

    #[test]
    fn test_builtin_lookups() {
        let catalog = PermissionCatalog::builtin();

        let billing = catalog.category("billing").unwrap();
        assert_eq!(billing.key, "billing");
        assert!(!billing.actions.is_empty());

        let action = catalog.action(&key("billing.view")).unwrap();
        assert_eq!(action.key, key("billing.view"));

        assert!(catalog.category("nonexistent").is_none());
        assert!(catalog.action(&key("billing.teleport")).is_none());
    }

    #[test]
    fn test_contains() {
        let catalog = PermissionCatalog::builtin();
        assert!(catalog.contains(&key("inventory.view")));
        assert!(!catalog.contains(&key("inventory.fly")));
    }

    #[test]
    fn test_format_falls_back_to_raw_key() {
        let catalog = PermissionCatalog::builtin();

        // Known keys format to labels
        assert_ne!(catalog.format_category_key("billing.view"), "billing.view");
        assert_ne!(catalog.format_action_key("billing.view"), "billing.view");

        // Unknown or malformed keys come back verbatim
        assert_eq!(catalog.format_category_key("bogus.view"), "bogus.view");
        assert_eq!(catalog.format_action_key("billing.bogus"), "billing.bogus");
        assert_eq!(catalog.format_category_key("nodot"), "nodot");
        assert_eq!(catalog.format_action_key("nodot"), "nodot");
    }

    #[test]
    fn test_rejects_duplicate_action_keys() {
        let action = PermissionAction {
            key: key("a.view"),
            label: "View".into(),
            description: String::new(),
        };
        let category = PermissionCategory {
            key: "a".into(),
            label: "A".into(),
            description: String::new(),
            group: "System".into(),
            actions: vec![action.clone(), action],
        };
        assert!(matches!(
            PermissionCatalog::try_new(vec![category]),
            Err(CatalogError::DuplicateAction(_))
        ));
    }

    #[test]
    fn test_rejects_prefix_mismatch() {
        let category = PermissionCategory {
            key: "a".into(),
            label: "A".into(),
            description: String::new(),
            group: "System".into(),
            actions: vec![PermissionAction {
                key: key("b.view"),
                label: "View".into(),
                description: String::new(),
            }],
        };
        assert!(matches!(
            PermissionCatalog::try_new(vec![category]),
            Err(CatalogError::PrefixMismatch { .. })
        ));
    }
}
