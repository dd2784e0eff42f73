//! Controller trait: the collaborator contract the engine drives.
//!
//! An application implements [`Controller`] once per model. The engine only
//! ever calls these methods; it never touches storage, transport or
//! authentication itself.

use std::hash::Hash;

use async_trait::async_trait;
use fieldgate_perms::{AppliedPermissions, FieldPermissions};
use serde::Serialize;
use serde_json::{Map, Value};

/// Collaborators for one model.
///
/// The four required methods supply data, roles and permission tables and
/// persist updates. The remaining methods are optional hooks; their default
/// implementations pass their input through unchanged.
///
/// # Design Notes
///
/// - **Stateless calls**: every method receives everything it needs. The
///   engine keeps no state between invocations.
/// - **Errors pass through**: any `Err` returned here aborts the invocation
///   and reaches the caller as `ControllerError::Collaborator`.
/// - **Data-dependent permissions**: `get_permissions` and the hooks see the
///   fetched record, so rules like "owners may edit" live here.
#[async_trait]
pub trait Controller: Send + Sync {
    /// The record type.
    type Data: Serialize + Send + Sync;
    /// Per-request arguments (request context, ids, ...).
    type Args: Send + Sync;
    /// Actions offered to the caller alongside the record.
    type Action: Send;
    /// Opaque role identifier.
    type Role: Eq + Hash + Clone + Send + Sync;
    /// The collaborator's error type.
    type Error: Send;

    // ─────────────────────────────────────────────────────────────────────────
    // Required
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch the current record.
    async fn get_data(&self, args: &Self::Args) -> Result<Self::Data, Self::Error>;

    /// Fetch the caller's roles.
    async fn get_client_roles(&self, args: &Self::Args) -> Result<Vec<Self::Role>, Self::Error>;

    /// Supply the per-field role table for this record.
    async fn get_permissions(
        &self,
        data: &Self::Data,
        args: &Self::Args,
    ) -> Result<FieldPermissions<Self::Role>, Self::Error>;

    /// Apply a partial update and return the full record afterwards.
    async fn update_data(
        &self,
        patch: &Map<String, Value>,
        args: &Self::Args,
    ) -> Result<Self::Data, Self::Error>;

    // ─────────────────────────────────────────────────────────────────────────
    // Optional hooks
    // ─────────────────────────────────────────────────────────────────────────

    /// Adjust the caller's roles after the record is known, e.g. add an
    /// owner role when the caller owns the record.
    async fn apply_client_roles(
        &self,
        data: &Self::Data,
        roles: Vec<Self::Role>,
        args: &Self::Args,
    ) -> Result<Vec<Self::Role>, Self::Error> {
        let _ = (data, args);
        Ok(roles)
    }

    /// Override merged permissions. Whatever this returns replaces the
    /// merged tree.
    async fn apply_permissions(
        &self,
        data: &Self::Data,
        merged: AppliedPermissions,
        roles: &[Self::Role],
        args: &Self::Args,
    ) -> Result<AppliedPermissions, Self::Error> {
        let _ = (data, roles, args);
        Ok(merged)
    }

    /// Fetch the actions available on this record. None by default.
    async fn get_actions(&self, args: &Self::Args) -> Result<Vec<Self::Action>, Self::Error> {
        let _ = args;
        Ok(Vec::new())
    }

    /// Filter actions against the final permissions.
    async fn apply_actions(
        &self,
        data: &Self::Data,
        permissions: &AppliedPermissions,
        actions: Vec<Self::Action>,
    ) -> Result<Vec<Self::Action>, Self::Error> {
        let _ = (data, permissions);
        Ok(actions)
    }
}
