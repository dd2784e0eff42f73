//! # fieldgate
//!
//! Field-level access control for nested records.
//!
//! ## Overview
//!
//! fieldgate sits between a data-access layer and a transport layer. For
//! every request it:
//!
//! - **Resolves** the caller's roles and the per-field role table
//! - **Merges** them into one permission set per field
//! - **Sanitizes** the record, nulling fields the caller may not read while
//!   still reporting what the caller could do with them
//! - **Validates** partial updates before they reach storage
//!
//! ## Key Concepts
//!
//! - **Controller**: the collaborators an application supplies (fetch data,
//!   fetch roles, supply permission tables, persist updates)
//! - **ControllerInstance**: runs the read and update pipelines; holds no
//!   state between calls
//! - **Shorthand**: `"CRUD"`-style notation for a permission set
//! - **Violation**: dotted path of a field a rejected update touched
//!
//! ## Usage
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use fieldgate::perms::FieldPermissions;
//! use fieldgate::{Controller, ControllerConfig, ControllerInstance};
//! use serde::Serialize;
//! use serde_json::{json, Map, Value};
//!
//! #[derive(Serialize)]
//! struct User {
//!     name: String,
//!     email: String,
//! }
//!
//! struct Users;
//!
//! #[async_trait]
//! impl Controller for Users {
//!     type Data = User;
//!     type Args = String;
//!     type Action = String;
//!     type Role = String;
//!     type Error = std::io::Error;
//!
//!     async fn get_data(&self, _id: &String) -> Result<User, Self::Error> {
//!         Ok(User { name: "Alice".into(), email: "alice@example.com".into() })
//!     }
//!
//!     async fn get_client_roles(&self, _id: &String) -> Result<Vec<String>, Self::Error> {
//!         Ok(vec!["user".into()])
//!     }
//!
//!     async fn get_permissions(
//!         &self,
//!         _data: &User,
//!         _id: &String,
//!     ) -> Result<FieldPermissions<String>, Self::Error> {
//!         Ok(serde_json::from_value(json!({
//!             "name": { "admin": "CRUD", "user": "RU" },
//!             "email": { "admin": "CRUD" }
//!         }))?)
//!     }
//!
//!     async fn update_data(
//!         &self,
//!         _patch: &Map<String, Value>,
//!         id: &String,
//!     ) -> Result<User, Self::Error> {
//!         self.get_data(id).await
//!     }
//! }
//!
//! async fn example() {
//!     let users = ControllerInstance::new(Users, ControllerConfig::default());
//!
//!     let response = users.handle_request(&"42".to_string()).await.unwrap();
//!     assert_eq!(response.field("email").unwrap().data, Value::Null);
//!
//!     let patch = json!({ "email": "eve@example.com" });
//!     let err = users
//!         .handle_update(patch.as_object().unwrap(), &"42".to_string())
//!         .await
//!         .unwrap_err();
//!     assert_eq!(err.to_string(), "Permission denied: email");
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `fieldgate::core` - Permission codec, field paths, tree transforms
//! - `fieldgate::perms` - Role tables, merging and update validation

pub mod accessor;
pub mod config;
pub mod controller;
pub mod error;
pub mod instance;
pub mod response;

// Re-export component crates
pub use fieldgate_core as core;
pub use fieldgate_perms as perms;

// Re-export main types for convenience
pub use accessor::{
    apply_field_updates, build_update_payload, check_field_updates, field_accessor,
    field_accessor_from_json, FieldAccessor, FieldLeaf, FieldUpdate,
};
pub use config::ControllerConfig;
pub use controller::Controller;
pub use error::{ControllerError, Result};
pub use instance::ControllerInstance;
pub use response::{sanitize, FieldView, ModelResponse, SanitizedField};

// Re-export commonly used core types
pub use fieldgate_core::{FieldPath, Permission, PermissionSet, Shorthand, Tree};
pub use fieldgate_perms::{AppliedPermissions, FieldPermissions, PermissionDenied, RolePermissions};
