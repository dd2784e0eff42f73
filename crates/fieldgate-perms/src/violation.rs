//! Update validation.
//!
//! A partial update is a sparse patch: only keys present in the patch are
//! checked. Each changed leaf needs one permission, decided by whether the
//! field goes from a value to null, from null (or absent) to a value, or
//! from one value to another.

use std::ops::ControlFlow;

use fieldgate_core::{FieldPath, Permission, Shorthand, Tree};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::PermissionDenied;
use crate::roles::AppliedPermissions;

/// How many violations to gather before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationMode {
    /// Walk the whole patch and report every offending field.
    #[default]
    CollectAll,
    /// Stop at the first offending field.
    FailFast,
}

impl ViolationMode {
    pub fn from_collect_all(collect_all: bool) -> Self {
        if collect_all {
            ViolationMode::CollectAll
        } else {
            ViolationMode::FailFast
        }
    }
}

/// The permission needed to move a field from `current` to `new`.
///
/// - value to null: delete
/// - null or absent to value: create
/// - anything else: update
pub fn required_permission(new: &Value, current: Option<&Value>) -> Permission {
    let had_value = matches!(current, Some(value) if !value.is_null());
    match (new.is_null(), had_value) {
        (true, true) => Permission::Delete,
        (false, false) => Permission::Create,
        _ => Permission::Update,
    }
}

/// Collect the paths in `patch` that `applied` does not allow.
///
/// Nested objects (not arrays) in the patch are walked against the matching
/// nested current value and permissions. A key with no permission entry is
/// always a violation. An object written over a permission leaf has no
/// entries for its keys, so every key inside it is a violation.
pub fn collect_violations(
    patch: &Map<String, Value>,
    current: &Value,
    applied: &AppliedPermissions,
    mode: ViolationMode,
) -> Vec<FieldPath> {
    let mut violations = Vec::new();
    let _ = walk(
        patch,
        Some(current),
        applied,
        &FieldPath::root(),
        mode,
        &mut violations,
    );
    violations
}

/// Check a patch, failing with every violation found (or the first, in
/// [`ViolationMode::FailFast`]).
pub fn validate_update(
    patch: &Map<String, Value>,
    current: &Value,
    applied: &AppliedPermissions,
    mode: ViolationMode,
) -> Result<(), PermissionDenied> {
    let violations = collect_violations(patch, current, applied, mode);
    if violations.is_empty() {
        return Ok(());
    }
    tracing::warn!(count = violations.len(), ?mode, "update rejected");
    Err(PermissionDenied::new(violations))
}

fn walk(
    patch: &Map<String, Value>,
    current: Option<&Value>,
    perms: &Tree<Shorthand>,
    parent: &FieldPath,
    mode: ViolationMode,
    violations: &mut Vec<FieldPath>,
) -> ControlFlow<()> {
    for (key, new_value) in patch {
        let path = parent.child(key);
        let current_value = current.and_then(|value| value.get(key));

        let allowed = match (lookup(perms, key), new_value) {
            (None, _) => false,
            (Some(node), Value::Object(nested)) => {
                if walk(nested, current_value, node, &path, mode, violations).is_break() {
                    return ControlFlow::Break(());
                }
                continue;
            }
            (Some(Tree::Leaf(granted)), _) => {
                let needed = required_permission(new_value, current_value);
                granted.allows(needed)
            }
            // A scalar written over a nested permission table.
            (Some(Tree::Branch(_)), _) => false,
        };

        if !allowed {
            tracing::debug!(field = %path, "permission violation");
            violations.push(path);
            if mode == ViolationMode::FailFast {
                return ControlFlow::Break(());
            }
        }
    }
    ControlFlow::Continue(())
}

fn lookup<'a>(perms: &'a Tree<Shorthand>, key: &str) -> Option<&'a Tree<Shorthand>> {
    perms.as_branch().and_then(|children| children.get(key))
}
