//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{Map, Value};

use fieldgate_core::{Permission, PermissionSet, PermissionSpec, Shorthand, Tree};
use fieldgate_perms::{FieldPermissions, RolePermissions};

/// Generate a single permission.
pub fn permission() -> impl Strategy<Value = Permission> {
    prop_oneof![
        Just(Permission::Create),
        Just(Permission::Read),
        Just(Permission::Update),
        Just(Permission::Delete),
    ]
}

/// Generate any of the sixteen permission sets.
pub fn permission_set() -> impl Strategy<Value = PermissionSet> {
    (0u8..16).prop_map(PermissionSet::from_bits_truncate)
}

/// Generate a shorthand.
pub fn shorthand() -> impl Strategy<Value = Shorthand> {
    permission_set().prop_map(Shorthand::from)
}

/// Generate shorthand text as a person might write it: any order, possibly
/// with repeated letters.
pub fn shorthand_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!['C', 'R', 'U', 'D']), 0..8)
        .prop_map(|letters| letters.into_iter().collect())
}

/// Generate a permission spec in either form.
pub fn permission_spec() -> impl Strategy<Value = PermissionSpec> {
    prop_oneof![
        permission_set().prop_map(PermissionSpec::Set),
        shorthand().prop_map(PermissionSpec::Shorthand),
    ]
}

/// Generate a role name from a small fixed pool so roles overlap between
/// tables and callers.
pub fn role() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["admin", "editor", "user", "guest"]).prop_map(String::from)
}

/// Generate a role table.
pub fn role_permissions() -> impl Strategy<Value = RolePermissions<String>> {
    prop::collection::vec((role(), permission_spec()), 0..4)
        .prop_map(|pairs| RolePermissions::from_pairs(pairs))
}

/// Generate a field name.
pub fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}".prop_map(String::from)
}

/// Generate a JSON scalar (including null) or a short array.
pub fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z ]{0,16}".prop_map(Value::from),
        prop::collection::vec(any::<i32>().prop_map(Value::from), 0..3).prop_map(Value::Array),
    ]
}

/// Generate a record up to `depth` levels of nested objects.
pub fn record(depth: u32) -> impl Strategy<Value = Value> {
    leaf_value().prop_recursive(depth, 32, 4, |inner| {
        prop::collection::vec((field_name(), inner), 1..4).prop_map(|fields| {
            Value::Object(fields.into_iter().collect::<Map<String, Value>>())
        })
    })
    .prop_map(|value| match value {
        Value::Object(_) => value,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            Value::Object(map)
        }
    })
}

/// Generate a record together with a role table for every one of its fields.
pub fn record_with_permissions(
    depth: u32,
) -> impl Strategy<Value = (Value, FieldPermissions<String>)> {
    record(depth).prop_flat_map(|record| {
        let leaves = Tree::from_json(record.clone()).leaves().len();
        prop::collection::vec(role_permissions(), leaves).prop_map(move |tables| {
            let mut tables = tables.into_iter();
            let permissions = Tree::from_json(record.clone())
                .map(|_, _| tables.next().unwrap_or_default());
            (record.clone(), permissions)
        })
    })
}

/// Generate a caller's role list.
pub fn roles() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(role(), 0..4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldgate_core::merge;
    use fieldgate_perms::compute_default_permissions;

    proptest! {
        #[test]
        fn test_shorthand_text_parses(text in shorthand_text()) {
            let parsed: Shorthand = text.parse().unwrap();
            let expected: PermissionSet = text
                .chars()
                .filter_map(Permission::from_letter)
                .collect();
            prop_assert_eq!(parsed.permissions(), expected);
        }

        #[test]
        fn test_merged_shape_matches_record((record, perms) in record_with_permissions(3), roles in roles()) {
            let applied = compute_default_permissions(&perms, &roles);
            let record_paths: Vec<_> = Tree::from_json(record).leaves().into_iter().map(|(p, _)| p).collect();
            let applied_paths: Vec<_> = applied.leaves().into_iter().map(|(p, _)| p).collect();
            prop_assert_eq!(record_paths, applied_paths);
        }

        #[test]
        fn test_merge_is_union_of_roles(table in role_permissions(), roles in roles()) {
            let merged = table.resolve(&roles);
            let each = roles.iter().map(|role| table.resolve(std::slice::from_ref(role)));
            prop_assert_eq!(merged, merge(each));
        }
    }
}
