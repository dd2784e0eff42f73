//! # fieldgate permissions
//!
//! Role permission tables, role merging and update validation.
//!
//! ## Overview
//!
//! Permissions are configured per field and per role. Every request merges
//! the tables for the roles the caller holds into one shorthand per field;
//! nothing here is persisted between requests.
//!
//! ## Key Concepts
//!
//! - **RolePermissions**: role to permissions for one field
//! - **FieldPermissions**: role tables in the shape of a record
//! - **AppliedPermissions**: one merged shorthand per field
//! - **Violation**: dotted path of a field an update may not change
//!
//! ## Update Rules
//!
//! A sparse patch is checked key by key against the current record:
//!
//! 1. A key with no permission entry is a violation
//! 2. Nested objects are walked; arrays and scalars are leaves
//! 3. Value to null needs delete, null to value needs create, anything else
//!    needs update
//!
//! ## Usage
//!
//! ```rust
//! use fieldgate_perms::{compute_default_permissions, validate_update, FieldPermissions, ViolationMode};
//! use serde_json::json;
//!
//! let table: FieldPermissions<String> = serde_json::from_value(json!({
//!     "name": { "admin": "CR", "user": "U" }
//! }))
//! .unwrap();
//!
//! let applied = compute_default_permissions(&table, &["admin".to_string()]);
//! let patch = json!({ "name": "Bob" });
//! let current = json!({ "name": "Alice" });
//!
//! let err = validate_update(patch.as_object().unwrap(), &current, &applied, ViolationMode::CollectAll)
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "Permission denied: name");
//! ```

pub mod error;
pub mod merge;
pub mod roles;
pub mod shape;
pub mod violation;

pub use error::{PermissionDenied, PermsError, Result};
pub use merge::{compute_default_permissions, resolve_field};
pub use roles::{
    apply_single_role_permissions, update_permission_field, update_permission_subtree,
    AppliedPermissions, FieldPermissions, RolePermissions,
};
pub use shape::check_shape;
pub use violation::{collect_violations, required_permission, validate_update, ViolationMode};
