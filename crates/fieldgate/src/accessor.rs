//! Path-addressable view of a response.
//!
//! [`field_accessor`] tags every field of a sanitized response with its
//! dotted path, so calling code can address `"profile.bio"` directly and
//! turn edits back into a sparse patch with [`build_update_payload`].

use fieldgate_core::{tag_paths, FieldPath, Permission, PermissionSet, Tree};
use fieldgate_perms::PermissionDenied;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::response::SanitizedField;

/// A field with its path and derived capability flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLeaf {
    pub value: Value,
    pub permissions: PermissionSet,
    pub can_create: bool,
    pub can_read: bool,
    pub can_update: bool,
    pub can_delete: bool,
    #[serde(rename = "__path__")]
    pub path: FieldPath,
}

/// Tagged fields in the shape of the record.
pub type FieldAccessor = Tree<FieldLeaf>;

impl FieldLeaf {
    pub fn new(field: SanitizedField, path: FieldPath) -> Self {
        let permissions = field.permissions;
        Self {
            value: field.data,
            permissions,
            can_create: permissions.allows(Permission::Create),
            can_read: permissions.allows(Permission::Read),
            can_update: permissions.allows(Permission::Update),
            can_delete: permissions.allows(Permission::Delete),
            path,
        }
    }

    /// An edit of this field.
    pub fn update(&self, value: impl Into<Value>) -> FieldUpdate {
        FieldUpdate {
            path: self.path.clone(),
            value: value.into(),
        }
    }
}

/// A pending edit: new value for the field at `path`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub path: FieldPath,
    pub value: Value,
}

/// Tag every field of a sanitized tree with its path.
pub fn field_accessor(data: &Tree<SanitizedField>) -> FieldAccessor {
    tag_paths(data, Tree::is_leaf, |node| {
        node.as_leaf().cloned().unwrap_or_default()
    })
    .map(|_, tagged| FieldLeaf::new(tagged.inner, tagged.path))
}

/// Tag every field of a response's `data` as received over the wire.
///
/// Objects carrying both `data` and `permissions` are fields. Anything else
/// that is not a nested object is dropped.
pub fn field_accessor_from_json(data: &Value) -> FieldAccessor {
    let tree = Tree::from_json(data.clone());
    tag_paths(&tree, is_sanitized_field, to_sanitized_field)
        .map(|_, tagged| FieldLeaf::new(tagged.inner, tagged.path))
}

fn is_sanitized_field(node: &Tree<Value>) -> bool {
    node.get("data").is_some() && node.get("permissions").is_some()
}

fn to_sanitized_field(node: &Tree<Value>) -> SanitizedField {
    let data = node.get("data").cloned().map(Tree::into_json).unwrap_or_default();
    let raw = node.get("permissions").cloned().map(Tree::into_json).unwrap_or_default();
    let permissions = match serde_json::from_value(raw) {
        Ok(permissions) => permissions,
        Err(err) => {
            tracing::warn!(error = %err, "malformed field permissions, treating as none");
            PermissionSet::NONE
        }
    };
    SanitizedField { data, permissions }
}

/// Fold edits into a sparse nested patch. A later edit to the same path wins.
pub fn build_update_payload(updates: &[FieldUpdate]) -> Map<String, Value> {
    let mut patch: Tree<Value> = Tree::default();
    for update in updates.iter().filter(|u| !u.path.is_root()) {
        patch.set_path(&update.path, Tree::leaf(update.value.clone()));
    }
    match patch.into_json() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Apply edits to an accessor ahead of the server's answer.
///
/// Edits for paths that are not fields are skipped.
pub fn apply_field_updates(fields: &mut FieldAccessor, updates: &[FieldUpdate]) {
    for update in updates {
        if let Some(Tree::Leaf(leaf)) = fields.get_path_mut(&update.path) {
            leaf.value = update.value.clone();
        }
    }
}

/// Check edits against the update flags the caller was given.
///
/// This is a courtesy check only; the server validates every update again.
pub fn check_field_updates(
    fields: &FieldAccessor,
    updates: &[FieldUpdate],
) -> Result<(), PermissionDenied> {
    let denied: Vec<FieldPath> = updates
        .iter()
        .filter(|update| {
            !matches!(
                fields.get_path(&update.path),
                Some(Tree::Leaf(leaf)) if leaf.can_update
            )
        })
        .map(|update| update.path.clone())
        .collect();

    if denied.is_empty() {
        Ok(())
    } else {
        Err(PermissionDenied::new(denied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    fn sanitized() -> Tree<SanitizedField> {
        Tree::branch([
            (
                "name",
                Tree::leaf(SanitizedField {
                    data: json!("Alice"),
                    permissions: PermissionSet::CRUD,
                }),
            ),
            (
                "profile",
                Tree::branch([(
                    "bio",
                    Tree::leaf(SanitizedField {
                        data: Value::Null,
                        permissions: Permission::Update.into(),
                    }),
                )]),
            ),
        ])
    }

    #[test]
    fn test_accessor_tags_paths_and_flags() {
        let fields = field_accessor(&sanitized());

        let bio = fields.get_path(&path("profile.bio")).and_then(Tree::as_leaf).unwrap();
        assert_eq!(bio.path, "profile.bio");
        assert!(bio.can_update);
        assert!(!bio.can_read);
        assert_eq!(bio.value, Value::Null);

        let name = fields.get("name").and_then(Tree::as_leaf).unwrap();
        assert!(name.can_create && name.can_read && name.can_update && name.can_delete);
    }

    #[test]
    fn test_accessor_from_wire_json() {
        let wire = json!({
            "profile": { "bio": { "data": "x", "permissions": [] } },
            "stray": 5
        });
        let fields = field_accessor_from_json(&wire);

        let bio = fields.get_path(&path("profile.bio")).and_then(Tree::as_leaf).unwrap();
        assert_eq!(bio.path, "profile.bio");
        assert_eq!(bio.value, json!("x"));
        assert!(bio.permissions.is_empty());
        assert!(fields.get("stray").is_none());
    }

    #[test]
    fn test_malformed_wire_permissions_grant_nothing() {
        let wire = json!({
            "name": { "data": "Alice", "permissions": ["read", "fly"] },
            "email": { "data": "a@example.com", "permissions": { "read": true } },
            "age": { "data": 30, "permissions": ["read"] }
        });
        let fields = field_accessor_from_json(&wire);

        for key in ["name", "email"] {
            let field = fields.get(key).and_then(Tree::as_leaf).unwrap();
            assert!(field.permissions.is_empty(), "{key}");
            assert!(!field.can_read && !field.can_update, "{key}");
        }
        let age = fields.get("age").and_then(Tree::as_leaf).unwrap();
        assert!(age.can_read);
    }

    #[test]
    fn test_field_leaf_wire_names() {
        let leaf = FieldLeaf::new(
            SanitizedField {
                data: json!(1),
                permissions: Permission::Read.into(),
            },
            path("a.b"),
        );
        let value = serde_json::to_value(&leaf).unwrap();
        assert_eq!(value["__path__"], json!("a.b"));
        assert_eq!(value["canRead"], json!(true));
        assert_eq!(value["canUpdate"], json!(false));
        assert_eq!(value["permissions"], json!(["read"]));
    }

    #[test]
    fn test_build_update_payload_nests_and_last_wins() {
        let fields = field_accessor(&sanitized());
        let name = fields.get("name").and_then(Tree::as_leaf).unwrap();
        let bio = fields.get_path(&path("profile.bio")).and_then(Tree::as_leaf).unwrap();

        let payload = build_update_payload(&[
            name.update("Bob"),
            bio.update("hello"),
            name.update("Carol"),
        ]);
        assert_eq!(
            Value::Object(payload),
            json!({ "name": "Carol", "profile": { "bio": "hello" } })
        );
        assert!(build_update_payload(&[]).is_empty());
    }

    #[test]
    fn test_apply_field_updates() {
        let mut fields = field_accessor(&sanitized());
        apply_field_updates(
            &mut fields,
            &[
                FieldUpdate {
                    path: path("profile.bio"),
                    value: json!("new"),
                },
                FieldUpdate {
                    path: path("missing"),
                    value: json!(1),
                },
            ],
        );
        let bio = fields.get_path(&path("profile.bio")).and_then(Tree::as_leaf).unwrap();
        assert_eq!(bio.value, json!("new"));
        assert!(fields.get("missing").is_none());
    }

    #[test]
    fn test_check_field_updates() {
        let mut data = sanitized();
        data.set_path(
            &path("profile.bio"),
            Tree::leaf(SanitizedField {
                data: Value::Null,
                permissions: Permission::Read.into(),
            }),
        );
        let fields = field_accessor(&data);

        let ok = [FieldUpdate {
            path: path("name"),
            value: json!("Bob"),
        }];
        assert!(check_field_updates(&fields, &ok).is_ok());

        let bad = [
            FieldUpdate {
                path: path("profile.bio"),
                value: json!("x"),
            },
            FieldUpdate {
                path: path("unknown"),
                value: json!(1),
            },
        ];
        let err = check_field_updates(&fields, &bad).unwrap_err();
        assert_eq!(err.violations, vec!["profile.bio", "unknown"]);
    }
}
