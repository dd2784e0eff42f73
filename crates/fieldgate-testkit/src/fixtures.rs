//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use fieldgate::{Controller, ControllerConfig, ControllerInstance};
use fieldgate_core::{FieldPath, Permission, Shorthand, Tree};
use fieldgate_perms::{update_permission_field, AppliedPermissions, FieldPermissions, RolePermissions};
use serde_json::{Map, Value};

/// Role granted by [`MemoryController::with_owner_field`] when the caller
/// owns the record.
pub const OWNER_ROLE: &str = "owner";

/// Which collaborator call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    GetData,
    GetClientRoles,
    GetPermissions,
    UpdateData,
}

/// An in-memory [`Controller`] over a JSON record.
///
/// Callers are identified by name (`Args = String`) and roles are plain
/// strings. Every update is recorded so tests can assert whether storage was
/// reached.
pub struct MemoryController {
    record: RwLock<Value>,
    permissions: FieldPermissions<String>,
    roles: HashMap<String, Vec<String>>,
    actions: Vec<String>,
    action_requirements: Vec<(String, FieldPath)>,
    owner_field: Option<String>,
    overrides: Vec<(FieldPath, Shorthand)>,
    fail_on: Option<FailPoint>,
    updates: Mutex<Vec<Map<String, Value>>>,
}

impl MemoryController {
    /// Create a controller over `record` with the given permission table.
    pub fn new(record: Value, permissions: FieldPermissions<String>) -> Self {
        Self {
            record: RwLock::new(record),
            permissions,
            roles: HashMap::new(),
            actions: Vec::new(),
            action_requirements: Vec::new(),
            owner_field: None,
            overrides: Vec::new(),
            fail_on: None,
            updates: Mutex::new(Vec::new()),
        }
    }

    /// Create a controller where every field shares one role table.
    pub fn uniform(record: Value, table: RolePermissions<String>) -> Self {
        let tree = Tree::from_json(record.clone());
        let permissions = fieldgate_perms::apply_single_role_permissions(&tree, &table);
        Self::new(record, permissions)
    }

    /// Assign roles to a caller.
    pub fn with_roles<I, S>(mut self, caller: &str, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles
            .insert(caller.to_string(), roles.into_iter().map(Into::into).collect());
        self
    }

    /// Offer these actions on every request.
    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    /// Only offer `action` when the caller may update `field`.
    ///
    /// # Panics
    ///
    /// Panics if `field` is not a valid path.
    pub fn with_action_requirement(mut self, action: &str, field: &str) -> Self {
        let path = field.parse().expect("valid field path");
        self.action_requirements.push((action.to_string(), path));
        self
    }

    /// Grant [`OWNER_ROLE`] when `record[field]` equals the caller's name.
    pub fn with_owner_field(mut self, field: &str) -> Self {
        self.owner_field = Some(field.to_string());
        self
    }

    /// Force the merged permissions of `field` to `shorthand`.
    ///
    /// # Panics
    ///
    /// Panics on an invalid path or shorthand.
    pub fn with_override(mut self, field: &str, shorthand: &str) -> Self {
        let path = field.parse().expect("valid field path");
        let shorthand = shorthand.parse().expect("valid shorthand");
        self.overrides.push((path, shorthand));
        self
    }

    /// Make one collaborator call fail.
    pub fn failing(mut self, point: FailPoint) -> Self {
        self.fail_on = Some(point);
        self
    }

    /// Wrap in an instance with the given config.
    pub fn into_instance(self, config: ControllerConfig) -> ControllerInstance<Self> {
        ControllerInstance::new(self, config)
    }

    /// The stored record.
    pub fn record(&self) -> Value {
        self.record
            .read()
            .map(|record| record.clone())
            .unwrap_or(Value::Null)
    }

    /// Every patch that reached storage, in order.
    pub fn updates(&self) -> Vec<Map<String, Value>> {
        self.updates
            .lock()
            .map(|updates| updates.clone())
            .unwrap_or_default()
    }

    fn check(&self, point: FailPoint) -> anyhow::Result<()> {
        if self.fail_on == Some(point) {
            bail!("{:?} failed", point);
        }
        Ok(())
    }
}

#[async_trait]
impl Controller for MemoryController {
    type Data = Value;
    type Args = String;
    type Action = String;
    type Role = String;
    type Error = anyhow::Error;

    async fn get_data(&self, _caller: &String) -> anyhow::Result<Value> {
        self.check(FailPoint::GetData)?;
        Ok(self.record())
    }

    async fn get_client_roles(&self, caller: &String) -> anyhow::Result<Vec<String>> {
        self.check(FailPoint::GetClientRoles)?;
        Ok(self.roles.get(caller).cloned().unwrap_or_default())
    }

    async fn apply_client_roles(
        &self,
        data: &Value,
        mut roles: Vec<String>,
        caller: &String,
    ) -> anyhow::Result<Vec<String>> {
        let owns = self
            .owner_field
            .as_deref()
            .and_then(|field| data.get(field))
            .and_then(Value::as_str)
            .is_some_and(|owner| owner == caller.as_str());
        if owns {
            roles.push(OWNER_ROLE.to_string());
        }
        Ok(roles)
    }

    async fn get_permissions(
        &self,
        _data: &Value,
        _caller: &String,
    ) -> anyhow::Result<FieldPermissions<String>> {
        self.check(FailPoint::GetPermissions)?;
        Ok(self.permissions.clone())
    }

    async fn apply_permissions(
        &self,
        _data: &Value,
        mut merged: AppliedPermissions,
        _roles: &[String],
        _caller: &String,
    ) -> anyhow::Result<AppliedPermissions> {
        for (path, shorthand) in &self.overrides {
            update_permission_field(&mut merged, path, *shorthand);
        }
        Ok(merged)
    }

    async fn get_actions(&self, _caller: &String) -> anyhow::Result<Vec<String>> {
        Ok(self.actions.clone())
    }

    async fn apply_actions(
        &self,
        _data: &Value,
        permissions: &AppliedPermissions,
        actions: Vec<String>,
    ) -> anyhow::Result<Vec<String>> {
        Ok(actions
            .into_iter()
            .filter(|action| {
                self.action_requirements
                    .iter()
                    .filter(|(name, _)| name == action)
                    .all(|(_, path)| {
                        permissions
                            .get_path(path)
                            .and_then(Tree::as_leaf)
                            .is_some_and(|granted| granted.allows(Permission::Update))
                    })
            })
            .collect())
    }

    async fn update_data(
        &self,
        patch: &Map<String, Value>,
        _caller: &String,
    ) -> anyhow::Result<Value> {
        self.check(FailPoint::UpdateData)?;

        let mut record = self
            .record
            .write()
            .map_err(|_| anyhow!("record lock poisoned"))?;
        merge_patch(&mut record, patch);
        let updated = record.clone();
        drop(record);

        self.updates
            .lock()
            .map_err(|_| anyhow!("update log poisoned"))?
            .push(patch.clone());
        Ok(updated)
    }
}

/// Deep-merge a sparse patch into a record. Nested objects merge; anything
/// else replaces.
pub fn merge_patch(target: &mut Value, patch: &Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(fields) = target else {
        return;
    };
    for (key, value) in patch {
        if let (Some(existing), Value::Object(nested)) = (fields.get_mut(key), value) {
            if existing.is_object() {
                merge_patch(existing, nested);
                continue;
            }
        }
        fields.insert(key.clone(), value.clone());
    }
}

/// A user record with a nested profile, owned by `"alice"`.
pub fn sample_user() -> Value {
    serde_json::json!({
        "id": "alice",
        "name": "Alice",
        "email": "alice@example.com",
        "age": 30,
        "profile": {
            "bio": "Hello",
            "website": null
        },
        "tags": ["admin", "beta"]
    })
}

/// Role table for [`sample_user`]: `admin` may do anything, `user` may read
/// and the owner may edit their own profile.
pub fn sample_user_permissions() -> FieldPermissions<String> {
    let value = serde_json::json!({
        "id": { "admin": "R", "user": "R", "owner": "R" },
        "name": { "admin": "CRUD", "user": "R", "owner": "RU" },
        "email": { "admin": "CRUD", "owner": "RU" },
        "age": { "admin": "CUD", "owner": "R" },
        "profile": {
            "bio": { "admin": "CRUD", "user": "R", "owner": "CRUD" },
            "website": { "admin": "CRUD", "user": "R", "owner": "CRUD" }
        },
        "tags": { "admin": "CRUD", "user": "R" }
    });
    serde_json::from_value(value).expect("valid permission table")
}
