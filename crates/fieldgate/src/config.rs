//! Controller configuration.

use fieldgate_perms::ViolationMode;
use serde::Deserialize;

/// Configuration for a [`ControllerInstance`](crate::ControllerInstance).
///
/// Deserializes from camelCase keys, each optional:
///
/// ```rust
/// use fieldgate::ControllerConfig;
///
/// let config: ControllerConfig = serde_json::from_str(r#"{ "strictShape": true }"#).unwrap();
/// assert!(config.collect_all_violations);
/// assert!(config.strict_shape);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllerConfig {
    /// Report every violating field of a rejected update instead of the
    /// first one.
    pub collect_all_violations: bool,
    /// Fail when the permission table does not cover the record, instead of
    /// treating uncovered fields as "no permission".
    pub strict_shape: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            collect_all_violations: true,
            strict_shape: false,
        }
    }
}

impl ControllerConfig {
    pub fn violation_mode(&self) -> ViolationMode {
        ViolationMode::from_collect_all(self.collect_all_violations)
    }
}
