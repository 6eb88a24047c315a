//! Built-in system roles
//!
//! Every fresh deployment is seeded with three roles that cover the
//! common staffing tiers. They are marked `is_system` and can never be
//! edited or deleted afterwards.

use crate::store::AccessStore;
use shared::models::{PermissionKey, Role};
use std::collections::BTreeSet;

/// Seed the built-in system roles into an empty store.
///
/// Returns the created roles so the caller can persist them.
pub fn seed_system_roles(store: &AccessStore) -> Vec<Role> {
    let catalog = store.catalog();

    // Administrator holds every action in the catalog
    let all: BTreeSet<PermissionKey> = catalog
        .categories()
        .iter()
        .flat_map(|c| c.actions.iter().map(|a| a.key.clone()))
        .collect();

    let manager = keys_for(
        catalog,
        &[
            "dashboard",
            "inventory",
            "suppliers",
            "purchases",
            "billing",
            "customers",
            "staff",
            "reports",
        ],
    );

    let cashier: BTreeSet<PermissionKey> = [
        "dashboard.view",
        "billing.view",
        "billing.create",
        "customers.view",
        "customers.create",
        "inventory.view",
    ]
    .iter()
    .filter_map(|raw| PermissionKey::parse(raw).ok())
    .filter(|key| catalog.contains(key))
    .collect();

    vec![
        store.insert_system_role(
            "Administrator",
            "Full access to every feature",
            all,
        ),
        store.insert_system_role(
            "Branch Manager",
            "Day-to-day operations and reporting",
            manager,
        ),
        store.insert_system_role(
            "Cashier",
            "Point of sale and customer lookups",
            cashier,
        ),
    ]
}

fn keys_for(
    catalog: &crate::catalog::PermissionCatalog,
    category_keys: &[&str],
) -> BTreeSet<PermissionKey> {
    category_keys
        .iter()
        .filter_map(|key| catalog.category(key))
        .flat_map(|c| c.actions.iter().map(|a| a.key.clone()))
        .collect()
}
