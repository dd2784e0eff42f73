//! Error types for fieldgate core.

use thiserror::Error;

/// Errors raised while decoding permission notation or field paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A shorthand contained a character outside `C`, `R`, `U`, `D`.
    #[error("invalid permission shorthand {input:?}: unexpected character {found:?}")]
    InvalidShorthand { input: String, found: char },

    /// A permission name other than create/read/update/delete.
    #[error("unknown permission name: {0}")]
    UnknownPermission(String),

    /// A dotted path with an empty segment (`"a..b"`, `".a"`).
    #[error("invalid field path: {0:?}")]
    InvalidPath(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
