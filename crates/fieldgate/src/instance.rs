//! The orchestrator.
//!
//! A [`ControllerInstance`] drives one [`Controller`] through the read and
//! update pipelines. It holds configuration only, so a single instance can
//! serve any number of concurrent invocations.

use std::sync::Arc;

use fieldgate_core::Tree;
use fieldgate_perms::{check_shape, compute_default_permissions, validate_update, AppliedPermissions};
use serde_json::{Map, Value};
use tracing::Instrument;

use crate::config::ControllerConfig;
use crate::controller::Controller;
use crate::error::{ControllerError, Result};
use crate::response::{sanitize, ModelResponse};

/// Final permissions for one record, with the record as a tree.
struct Resolved {
    record: Tree<Value>,
    permissions: AppliedPermissions,
}

/// Runs requests and updates against a [`Controller`].
pub struct ControllerInstance<C: Controller> {
    /// The collaborators.
    controller: Arc<C>,
    /// Configuration.
    config: ControllerConfig,
}

impl<C: Controller> Clone for ControllerInstance<C> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            config: self.config.clone(),
        }
    }
}

impl<C: Controller> ControllerInstance<C> {
    /// Create a new instance.
    pub fn new(controller: C, config: ControllerConfig) -> Self {
        Self::from_arc(Arc::new(controller), config)
    }

    /// Create an instance sharing an existing controller.
    pub fn from_arc(controller: Arc<C>, config: ControllerConfig) -> Self {
        Self { controller, config }
    }

    /// Get the controller reference.
    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read Path
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch the record and return it sanitized, with per-field permissions
    /// and the available actions.
    pub async fn handle_request(
        &self,
        args: &C::Args,
    ) -> Result<ModelResponse<C::Action>, C::Error> {
        async {
            let data = self
                .controller
                .get_data(args)
                .await
                .map_err(ControllerError::Collaborator)?;
            tracing::debug!("record fetched");

            self.respond(data, args).await
        }
        .instrument(tracing::info_span!("handle_request"))
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Update Path
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate a partial update against the current record and apply it.
    ///
    /// Permissions are computed from the record as it is before the update.
    /// On rejection the update is never applied. On success the response is
    /// built from the updated record with permissions recomputed.
    pub async fn handle_update(
        &self,
        patch: &Map<String, Value>,
        args: &C::Args,
    ) -> Result<ModelResponse<C::Action>, C::Error> {
        async {
            // 1. Resolve permissions against the current record
            let current = self
                .controller
                .get_data(args)
                .await
                .map_err(ControllerError::Collaborator)?;
            let resolved = self.resolve(&current, args).await?;

            // 2. Validate the patch
            let current_json = resolved.record.into_json();
            validate_update(
                patch,
                &current_json,
                &resolved.permissions,
                self.config.violation_mode(),
            )?;
            tracing::debug!(fields = patch.len(), "update validated");

            // 3. Apply it
            let updated = self
                .controller
                .update_data(patch, args)
                .await
                .map_err(ControllerError::Collaborator)?;
            tracing::debug!("update applied");

            // 4. Respond from the updated record
            self.respond(updated, args).await
        }
        .instrument(tracing::info_span!("handle_update", fields = patch.len()))
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline Steps
    // ─────────────────────────────────────────────────────────────────────────

    /// Roles, merge and overrides for one record.
    async fn resolve(&self, data: &C::Data, args: &C::Args) -> Result<Resolved, C::Error> {
        let controller = &self.controller;

        let roles = controller
            .get_client_roles(args)
            .await
            .map_err(ControllerError::Collaborator)?;
        let roles = controller
            .apply_client_roles(data, roles, args)
            .await
            .map_err(ControllerError::Collaborator)?;
        tracing::debug!(roles = roles.len(), "roles resolved");

        let field_permissions = controller
            .get_permissions(data, args)
            .await
            .map_err(ControllerError::Collaborator)?;

        let record = Tree::from_json(serde_json::to_value(data)?);
        let uncovered = check_shape(&record, &field_permissions);
        if !uncovered.is_empty() {
            if self.config.strict_shape {
                tracing::warn!(count = uncovered.len(), "permission table does not cover record");
                return Err(ControllerError::ShapeMismatch(uncovered));
            }
            tracing::warn!(
                count = uncovered.len(),
                "permission table does not cover record, treating missing fields as denied"
            );
        }

        let merged = compute_default_permissions(&field_permissions, &roles);
        tracing::debug!("permissions merged");

        let permissions = controller
            .apply_permissions(data, merged, &roles, args)
            .await
            .map_err(ControllerError::Collaborator)?;

        Ok(Resolved {
            record,
            permissions,
        })
    }

    /// Everything after the record is known: permissions, actions and the
    /// sanitized response.
    async fn respond(&self, data: C::Data, args: &C::Args) -> Result<ModelResponse<C::Action>, C::Error> {
        let Resolved {
            record,
            permissions,
        } = self.resolve(&data, args).await?;

        let actions = self
            .controller
            .get_actions(args)
            .await
            .map_err(ControllerError::Collaborator)?;
        let actions = self
            .controller
            .apply_actions(&data, &permissions, actions)
            .await
            .map_err(ControllerError::Collaborator)?;
        tracing::debug!(actions = actions.len(), "actions resolved");

        Ok(ModelResponse {
            data: sanitize(record, &permissions),
            actions,
        })
    }
}
