//! Role-permission merge.
//!
//! Turns a [`FieldPermissions`] table and the caller's roles into one
//! shorthand per field.

use std::hash::Hash;

use fieldgate_core::{FieldPath, Shorthand};

use crate::roles::{AppliedPermissions, FieldPermissions};

/// Merge the role tables of every field for the given roles.
///
/// Each role table is a leaf of `field_permissions`, so the output has
/// exactly the same shape. A field resolves to the union of the
/// permissions of every role the caller holds; with no roles every field
/// resolves to the empty shorthand.
pub fn compute_default_permissions<R>(
    field_permissions: &FieldPermissions<R>,
    roles: &[R],
) -> AppliedPermissions
where
    R: Eq + Hash,
{
    field_permissions.map_ref(|path, table| {
        let merged = table.resolve(roles);
        tracing::trace!(field = %path, permissions = %merged, "merged field permissions");
        merged
    })
}

/// Merge a single field's role table. Convenience for override hooks.
pub fn resolve_field<R>(
    field_permissions: &FieldPermissions<R>,
    path: &FieldPath,
    roles: &[R],
) -> Option<Shorthand>
where
    R: Eq + Hash,
{
    field_permissions
        .get_path(path)
        .and_then(|node| node.as_leaf())
        .map(|table| table.resolve(roles))
}
