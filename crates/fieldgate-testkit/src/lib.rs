//! # fieldgate testkit
//!
//! Testing utilities for fieldgate.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known shorthand inputs with their canonical merged form
//! - **Generators**: Proptest strategies for permission sets, role tables and records
//! - **Fixtures**: An in-memory [`Controller`](fieldgate::Controller) over a JSON record
//!
//! ## Golden Vectors
//!
//! ```rust
//! use fieldgate_testkit::vectors::{all_vectors, merge_vector};
//!
//! for vector in all_vectors() {
//!     let merged = merge_vector(&vector).unwrap();
//!     assert_eq!(merged.to_string(), vector.expected);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use fieldgate_testkit::generators::{record_with_permissions, roles};
//! use fieldgate_perms::compute_default_permissions;
//!
//! proptest! {
//!     #[test]
//!     fn merge_keeps_shape((record, perms) in record_with_permissions(3), roles in roles()) {
//!         let applied = compute_default_permissions(&perms, &roles);
//!         prop_assert_eq!(applied.leaves().len(), perms.leaves().len());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use fieldgate::ControllerConfig;
//! use fieldgate_testkit::fixtures::{sample_user, sample_user_permissions, MemoryController};
//!
//! let users = MemoryController::new(sample_user(), sample_user_permissions())
//!     .with_roles("alice", ["user"])
//!     .with_owner_field("id")
//!     .into_instance(ControllerConfig::default());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{merge_patch, sample_user, sample_user_permissions, FailPoint, MemoryController, OWNER_ROLE};
pub use generators::{record, record_with_permissions, role_permissions, shorthand};
pub use vectors::{all_vectors, merge_vector, verify_all_vectors, GoldenVector};
