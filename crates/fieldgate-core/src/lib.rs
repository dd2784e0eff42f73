//! # fieldgate core
//!
//! Pure primitives for field-level access control: the permission shorthand
//! codec, dotted field paths, and the recursive tree transforms every other
//! fieldgate component is built from.
//!
//! This crate contains no I/O and no async code.
//!
//! ## Key Types
//!
//! - [`Permission`] / [`PermissionSet`] - the four field operations, as a 4-bit set
//! - [`Shorthand`] - compact `"CRUD"` encoding, always in canonical order
//! - [`PermissionSpec`] - either representation, as written in configuration
//! - [`Tree`] - explicit branch/leaf nesting shared by records, permission
//!   tables and responses
//! - [`FieldPath`] - dotted access path such as `"profile.bio"`
//!
//! ## Example
//!
//! ```rust
//! use fieldgate_core::{merge, Shorthand};
//!
//! let admin: Shorthand = "CR".parse().unwrap();
//! let user: Shorthand = "U".parse().unwrap();
//! assert_eq!(merge([admin, user]).to_string(), "CRU");
//! ```

pub mod error;
pub mod path;
pub mod permission;
pub mod tree;

pub use error::{CoreError, Result};
pub use path::FieldPath;
pub use permission::{
    expand, merge, parse_shorthand, to_shorthand, Permission, PermissionSet, PermissionSpec,
    Shorthand,
};
pub use tree::{join, tag_paths, tag_paths_under, Joined, Tagged, Tree};
