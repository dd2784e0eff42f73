//! Response types and sanitization.

use fieldgate_core::{join, Joined, Permission, PermissionSet, Shorthand, Tree};
use fieldgate_perms::AppliedPermissions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field paired with its merged permissions, before read enforcement.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub value: Value,
    pub permissions: Shorthand,
}

impl FieldView {
    /// Build from a joined data/permission node.
    ///
    /// A field resolves to a permission only when the permission side is a
    /// single leaf. A missing entry, or a nested table facing a plain value,
    /// grants nothing.
    pub fn from_joined(joined: Joined<Value, Shorthand>) -> Self {
        let permissions = match joined.right {
            Some(Tree::Leaf(shorthand)) => shorthand,
            Some(Tree::Branch(_)) | None => Shorthand::EMPTY,
        };
        Self {
            value: joined.left.into_json(),
            permissions,
        }
    }

    /// Enforce read access. Permissions are always reported in full.
    pub fn sanitize(self) -> SanitizedField {
        let permissions = self.permissions.permissions();
        let data = if permissions.allows(Permission::Read) {
            self.value
        } else {
            Value::Null
        };
        SanitizedField { data, permissions }
    }
}

/// A field as sent to the caller.
///
/// `data` is null when the caller may not read the field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SanitizedField {
    pub data: Value,
    pub permissions: PermissionSet,
}

impl SanitizedField {
    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.allows(permission)
    }
}

/// The response to a request or an accepted update.
///
/// `data` has exactly the nesting of the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelResponse<A> {
    pub data: Tree<SanitizedField>,
    pub actions: Vec<A>,
}

impl<A> ModelResponse<A> {
    /// The field at a dotted path, if it is a field and not a nested object.
    pub fn field(&self, path: &str) -> Option<&SanitizedField> {
        let path = path.parse().ok()?;
        self.data.get_path(&path).and_then(Tree::as_leaf)
    }
}

/// Pair a record with its final permissions and enforce read access.
pub fn sanitize(data: Tree<Value>, permissions: &AppliedPermissions) -> Tree<SanitizedField> {
    join(data, permissions).map(|_, joined| FieldView::from_joined(joined).sanitize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sh(s: &str) -> Shorthand {
        s.parse().unwrap()
    }

    #[test]
    fn test_read_grants_value() {
        let field = FieldView {
            value: json!("Alice"),
            permissions: Shorthand::CRUD,
        }
        .sanitize();
        assert_eq!(field.data, json!("Alice"));
        assert_eq!(field.permissions, PermissionSet::CRUD);
    }

    #[test]
    fn test_no_read_redacts_but_reports_permissions() {
        let field = FieldView {
            value: json!(30),
            permissions: sh("CUD"),
        }
        .sanitize();
        assert_eq!(field.data, Value::Null);
        assert!(!field.can(Permission::Read));
        assert!(field.can(Permission::Create));
        assert!(field.can(Permission::Update));
        assert!(field.can(Permission::Delete));
    }

    #[test]
    fn test_sanitize_tree() {
        let data = Tree::from_json(json!({
            "name": "Alice",
            "address": { "city": "Oslo" },
            "secret": "s3cr3t"
        }));
        let permissions: AppliedPermissions = Tree::branch([
            ("name", Tree::leaf(sh("R"))),
            ("address", Tree::branch([("city", Tree::leaf(sh("RU")))])),
        ]);

        let sanitized = sanitize(data, &permissions);
        let response = ModelResponse::<()> {
            data: sanitized,
            actions: vec![],
        };

        assert_eq!(response.field("name").unwrap().data, json!("Alice"));
        assert_eq!(response.field("address.city").unwrap().data, json!("Oslo"));
        // No entry in the table: no permission for anyone.
        let secret = response.field("secret").unwrap();
        assert_eq!(secret.data, Value::Null);
        assert!(secret.permissions.is_empty());
        assert!(response.field("address").is_none());
    }

    #[test]
    fn test_permission_leaf_over_nested_data() {
        let data = Tree::from_json(json!({ "address": { "city": "Oslo" } }));
        let permissions: AppliedPermissions = Tree::branch([("address", Tree::leaf(sh("R")))]);

        let sanitized = sanitize(data, &permissions);
        let address = sanitized.get("address").and_then(Tree::as_leaf).unwrap();
        assert_eq!(address.data, json!({ "city": "Oslo" }));
    }

    #[test]
    fn test_response_serializes_nested() {
        let response = ModelResponse {
            data: Tree::branch([(
                "name",
                Tree::leaf(SanitizedField {
                    data: json!(null),
                    permissions: PermissionSet::from(Permission::Update),
                }),
            )]),
            actions: vec!["archive"],
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "data": { "name": { "data": null, "permissions": ["update"] } },
                "actions": ["archive"]
            })
        );
    }
}
