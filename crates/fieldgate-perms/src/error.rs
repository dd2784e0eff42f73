//! Error types for the permissions module.

use fieldgate_core::FieldPath;
use thiserror::Error;

/// A proposed update touched fields the caller may not change.
///
/// `violations` is never empty and keeps the order in which the offending
/// fields were found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Permission denied: {}", join_paths(.violations))]
pub struct PermissionDenied {
    pub violations: Vec<FieldPath>,
}

impl PermissionDenied {
    /// Create from a list of violating paths.
    pub fn new(violations: Vec<FieldPath>) -> Self {
        debug_assert!(!violations.is_empty(), "PermissionDenied without violations");
        Self { violations }
    }

    /// The violating paths.
    pub fn violations(&self) -> &[FieldPath] {
        &self.violations
    }
}

/// Errors that can occur during permission operations.
#[derive(Debug, Error)]
pub enum PermsError {
    /// Update rejected.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// The permission table has no entry for some data fields.
    #[error("permission table does not cover: {}", join_paths(.0))]
    ShapeMismatch(Vec<FieldPath>),

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] fieldgate_core::CoreError),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;

pub(crate) fn join_paths(paths: &[FieldPath]) -> String {
    paths
        .iter()
        .map(FieldPath::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(list: &[&str]) -> Vec<FieldPath> {
        list.iter().map(|p| p.parse().unwrap()).collect()
    }

    #[test]
    fn test_message_lists_every_violation() {
        let err = PermissionDenied::new(paths(&["user.name", "user.email"]));
        assert_eq!(err.to_string(), "Permission denied: user.name, user.email");
    }

    #[test]
    fn test_message_single_violation() {
        let err = PermissionDenied::new(paths(&["age"]));
        assert_eq!(err.to_string(), "Permission denied: age");
        assert_eq!(err.violations(), &paths(&["age"])[..]);
    }

    #[test]
    fn test_perms_error_is_transparent() {
        let err: PermsError = PermissionDenied::new(paths(&["a.b"])).into();
        assert_eq!(err.to_string(), "Permission denied: a.b");
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = PermsError::ShapeMismatch(paths(&["bio", "address.city"]));
        assert_eq!(
            err.to_string(),
            "permission table does not cover: bio, address.city"
        );
    }
}
