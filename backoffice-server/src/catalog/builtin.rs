//! Built-in permission definitions
//!
//! The catalog every deployment ships with: 11 categories, ~45 actions.
//! Category order here is display order.

use shared::models::{PermissionAction, PermissionCategory, PermissionKey};

fn action(key: &str, label: &str, description: &str) -> PermissionAction {
    PermissionAction {
        key: PermissionKey::parse(key).expect("built-in action key is well-formed"),
        label: label.to_string(),
        description: description.to_string(),
    }
}

fn category(
    key: &str,
    label: &str,
    description: &str,
    group: &str,
    actions: Vec<PermissionAction>,
) -> PermissionCategory {
    PermissionCategory {
        key: key.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        group: group.to_string(),
        actions,
    }
}

/// All built-in categories, in display order
pub fn builtin_categories() -> Vec<PermissionCategory> {
    vec![
        category(
            "dashboard",
            "Dashboard",
            "Overview of sales, stock and staff activity",
            "Analytics",
            vec![
                action("dashboard.view", "View Dashboard", "See the overview page"),
                action("dashboard.export", "Export Dashboard", "Export dashboard widgets"),
            ],
        ),
        category(
            "branches",
            "Branch Management",
            "Store branches and their settings",
            "System",
            vec![
                action("branches.view", "View Branches", "List branches and details"),
                action("branches.create", "Create Branch", "Register a new branch"),
                action("branches.edit", "Edit Branch", "Change branch details"),
                action("branches.delete", "Delete Branch", "Remove a branch"),
            ],
        ),
        category(
            "inventory",
            "Inventory Management",
            "Stock levels, items and adjustments",
            "Operations",
            vec![
                action("inventory.view", "View Inventory", "List items and stock levels"),
                action("inventory.create", "Create Item", "Add a new inventory item"),
                action("inventory.edit", "Edit Item", "Change item details"),
                action("inventory.delete", "Delete Item", "Remove an inventory item"),
                action(
                    "inventory.adjust_stock",
                    "Adjust Stock",
                    "Record manual stock corrections",
                ),
            ],
        ),
        category(
            "suppliers",
            "Supplier Management",
            "Supplier directory and terms",
            "Operations",
            vec![
                action("suppliers.view", "View Suppliers", "List suppliers"),
                action("suppliers.create", "Create Supplier", "Register a supplier"),
                action("suppliers.edit", "Edit Supplier", "Change supplier details"),
                action("suppliers.delete", "Delete Supplier", "Remove a supplier"),
            ],
        ),
        category(
            "purchases",
            "Purchasing",
            "Purchase orders and goods receipt",
            "Operations",
            vec![
                action("purchases.view", "View Purchases", "List purchase orders"),
                action("purchases.create", "Create Purchase", "Raise a purchase order"),
                action("purchases.approve", "Approve Purchase", "Approve a pending order"),
                action("purchases.receive", "Receive Goods", "Book received goods into stock"),
                action("purchases.cancel", "Cancel Purchase", "Cancel an open order"),
            ],
        ),
        category(
            "billing",
            "Billing",
            "Invoices, payments and refunds",
            "Operations",
            vec![
                action("billing.view", "View Billing", "List invoices and payments"),
                action("billing.create", "Create Invoice", "Issue a new invoice"),
                action("billing.refund", "Refund", "Refund a settled invoice"),
                action("billing.void", "Void Invoice", "Void an unsettled invoice"),
            ],
        ),
        category(
            "customers",
            "Customer Management",
            "Customer records and loyalty",
            "Operations",
            vec![
                action("customers.view", "View Customers", "List customer records"),
                action("customers.create", "Create Customer", "Register a customer"),
                action("customers.edit", "Edit Customer", "Change customer details"),
                action("customers.delete", "Delete Customer", "Remove a customer record"),
            ],
        ),
        category(
            "staff",
            "Staff Management",
            "Employees, contracts and scheduling",
            "Operations",
            vec![
                action("staff.view", "View Staff", "List employees"),
                action("staff.create", "Create Staff", "Register an employee"),
                action("staff.edit", "Edit Staff", "Change employee details"),
                action("staff.delete", "Delete Staff", "Remove an employee"),
                action("staff.schedule", "Manage Schedule", "Plan shifts and rosters"),
            ],
        ),
        category(
            "reports",
            "Reporting",
            "Operational and financial reports",
            "Analytics",
            vec![
                action("reports.view", "View Reports", "Open standard reports"),
                action("reports.export", "Export Reports", "Export report data"),
                action("reports.financial", "Financial Reports", "Open financial statements"),
            ],
        ),
        category(
            "users",
            "User Management",
            "System users and their roles",
            "System",
            vec![
                action("users.view", "View Users", "List system users"),
                action("users.create", "Create User", "Register a system user"),
                action("users.edit", "Edit User", "Change user details"),
                action("users.delete", "Delete User", "Remove a system user"),
                action("users.assign_roles", "Assign Roles", "Change a user's role"),
            ],
        ),
        category(
            "settings",
            "System Settings",
            "Global configuration",
            "System",
            vec![
                action("settings.view", "View Settings", "Open system settings"),
                action("settings.edit", "Edit Settings", "Change system settings"),
                action(
                    "settings.integrations",
                    "Manage Integrations",
                    "Configure external integrations",
                ),
            ],
        ),
    ]
}
