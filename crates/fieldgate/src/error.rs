//! Error types for the controller.

use fieldgate_core::FieldPath;
use fieldgate_perms::PermissionDenied;
use thiserror::Error;

/// Errors that can occur while handling a request or an update.
///
/// `E` is the collaborator's own error type. It is carried as is so the
/// caller can match on its own failures (not found, storage, ...).
#[derive(Debug, Error)]
pub enum ControllerError<E> {
    /// The update touched fields the caller may not change.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// The permission table does not cover the record (strict mode only).
    #[error("permission table does not cover: {}", join_paths(.0))]
    ShapeMismatch(Vec<FieldPath>),

    /// The record could not be converted to JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A collaborator call failed.
    #[error("{0}")]
    Collaborator(E),
}

impl<E> ControllerError<E> {
    /// The violating paths, when the update was rejected.
    pub fn violations(&self) -> Option<&[FieldPath]> {
        match self {
            ControllerError::PermissionDenied(denied) => Some(denied.violations()),
            _ => None,
        }
    }

    /// Whether this is a rejected update.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ControllerError::PermissionDenied(_))
    }

    /// The collaborator's error, if that is what failed.
    pub fn into_collaborator(self) -> Option<E> {
        match self {
            ControllerError::Collaborator(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for controller operations.
pub type Result<T, E> = std::result::Result<T, ControllerError<E>>;

fn join_paths(paths: &[FieldPath]) -> String {
    paths
        .iter()
        .map(FieldPath::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct NotFound;

    impl std::fmt::Display for NotFound {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("record not found")
        }
    }

    #[test]
    fn test_collaborator_error_is_unwrapped() {
        let err: ControllerError<NotFound> = ControllerError::Collaborator(NotFound);
        assert_eq!(err.to_string(), "record not found");
        assert!(!err.is_permission_denied());
        assert_eq!(err.into_collaborator(), Some(NotFound));
    }

    #[test]
    fn test_permission_denied_passthrough() {
        let denied = PermissionDenied::new(vec!["name".parse().unwrap(), "bio".parse().unwrap()]);
        let err: ControllerError<NotFound> = denied.into();
        assert_eq!(err.to_string(), "Permission denied: name, bio");
        assert_eq!(err.violations().map(<[FieldPath]>::len), Some(2));
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err: ControllerError<NotFound> = ControllerError::ShapeMismatch(vec!["bio".parse().unwrap()]);
        assert_eq!(err.to_string(), "permission table does not cover: bio");
        assert!(err.violations().is_none());
    }
}
