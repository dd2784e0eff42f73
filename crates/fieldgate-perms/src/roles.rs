//! Role permission tables.
//!
//! A [`RolePermissions`] map sits at every field of a [`FieldPermissions`]
//! tree and says what each role may do with that field. Merging the maps for
//! the caller's roles produces an [`AppliedPermissions`] tree.

use std::hash::Hash;

use fieldgate_core::{merge, FieldPath, PermissionSpec, Shorthand, Tree};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-field table of role to permissions.
///
/// Roles are opaque; only equality matters. Insertion order is kept so that
/// a table serializes back the way it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "R: Serialize + Eq + Hash",
    deserialize = "R: Deserialize<'de> + Eq + Hash"
))]
pub struct RolePermissions<R: Eq + Hash> {
    entries: IndexMap<R, PermissionSpec>,
}

/// Role tables in the shape of a record.
pub type FieldPermissions<R> = Tree<RolePermissions<R>>;

/// One merged shorthand per field, in the shape of a record.
pub type AppliedPermissions = Tree<Shorthand>;

impl<R: Eq + Hash> Default for RolePermissions<R> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<R: Eq + Hash> RolePermissions<R> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(role, permissions)` pairs. A repeated role keeps
    /// its last value.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, S)>,
        S: Into<PermissionSpec>,
    {
        pairs
            .into_iter()
            .map(|(role, spec)| (role, spec.into()))
            .collect()
    }

    /// Set the permissions for one role, returning the previous entry.
    pub fn set(&mut self, role: R, spec: impl Into<PermissionSpec>) -> Option<PermissionSpec> {
        self.entries.insert(role, spec.into())
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, role: R, spec: impl Into<PermissionSpec>) -> Self {
        self.set(role, spec);
        self
    }

    pub fn get(&self, role: &R) -> Option<&PermissionSpec> {
        self.entries.get(role)
    }

    pub fn remove(&mut self, role: &R) -> Option<PermissionSpec> {
        self.entries.shift_remove(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&R, &PermissionSpec)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union of the permissions held by any of `roles`.
    ///
    /// Roles without an entry contribute nothing. No roles means no access.
    pub fn resolve(&self, roles: &[R]) -> Shorthand {
        merge(
            roles
                .iter()
                .filter_map(|role| self.entries.get(role))
                .map(PermissionSpec::to_shorthand),
        )
    }
}

impl<R: Eq + Hash> FromIterator<(R, PermissionSpec)> for RolePermissions<R> {
    fn from_iter<I: IntoIterator<Item = (R, PermissionSpec)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Attach the same role table to every leaf of `data`.
///
/// The common configuration where every field shares one set of defaults.
pub fn apply_single_role_permissions<V, R>(
    data: &Tree<V>,
    roles: &RolePermissions<R>,
) -> FieldPermissions<R>
where
    R: Eq + Hash + Clone,
{
    data.map_ref(|_, _| roles.clone())
}

/// Overwrite the merged permissions at `path` with a single leaf.
///
/// Anything below `path` is replaced, and missing parents are created.
/// Returns the node that was there before.
pub fn update_permission_field(
    applied: &mut AppliedPermissions,
    path: &FieldPath,
    spec: impl Into<PermissionSpec>,
) -> Option<AppliedPermissions> {
    let shorthand = spec.into().to_shorthand();
    applied.set_path(path, Tree::leaf(shorthand))
}

/// Overwrite every leaf at or below `path`, keeping the nested shape.
///
/// Returns `false` when nothing exists at `path`.
pub fn update_permission_subtree(
    applied: &mut AppliedPermissions,
    path: &FieldPath,
    spec: impl Into<PermissionSpec>,
) -> bool {
    let shorthand = spec.into().to_shorthand();
    let Some(node) = applied.get_path_mut(path) else {
        return false;
    };
    let replaced = std::mem::take(node).map(|_, _| shorthand);
    *node = replaced;
    true
}
