//! Property tests for sanitization and update validation.

use fieldgate::perms::{compute_default_permissions, validate_update, ViolationMode};
use fieldgate::{sanitize, Permission, Tree};
use fieldgate_testkit::generators::{record_with_permissions, roles};
use proptest::prelude::*;
use serde_json::Value;

proptest! {
    #[test]
    fn test_unreadable_fields_are_redacted(
        (record, perms) in record_with_permissions(3),
        roles in roles(),
    ) {
        let applied = compute_default_permissions(&perms, &roles);
        let sanitized = sanitize(Tree::from_json(record.clone()), &applied);
        let unredacted = Tree::from_json(record);

        let fields = sanitized.leaves();
        prop_assert_eq!(fields.len(), unredacted.leaves().len());

        for ((path, field), (_, value)) in fields.into_iter().zip(unredacted.leaves()) {
            let granted = applied.get_path(&path).and_then(Tree::as_leaf).copied().unwrap_or_default();
            prop_assert_eq!(field.permissions, granted.permissions());
            if granted.allows(Permission::Read) {
                prop_assert_eq!(&field.data, value);
            } else {
                prop_assert_eq!(&field.data, &Value::Null);
            }
        }
    }

    #[test]
    fn test_fail_fast_reports_prefix_of_collect_all(
        (record, perms) in record_with_permissions(2),
        roles in roles(),
    ) {
        let applied = compute_default_permissions(&perms, &roles);
        let Value::Object(patch) = record.clone() else {
            return Ok(());
        };
        let current = Value::Object(Default::default());

        let all = validate_update(&patch, &current, &applied, ViolationMode::CollectAll);
        let first = validate_update(&patch, &current, &applied, ViolationMode::FailFast);

        match (all, first) {
            (Ok(()), Ok(())) => {}
            (Err(all), Err(first)) => {
                prop_assert_eq!(first.violations().len(), 1);
                prop_assert_eq!(&first.violations()[0], &all.violations()[0]);
            }
            (all, first) => prop_assert!(false, "modes disagree: {:?} vs {:?}", all, first),
        }
    }
}
