//! Dotted field paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Dotted access path to a field, e.g. `"profile.address.city"`.
///
/// The root path is the empty string. Keys are appended with `.`; keys
/// themselves are not escaped.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// The empty root path.
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path of `key` nested under this path.
    ///
    /// Keys are not escaped. An empty key under the root yields the root
    /// path itself, and a key containing `.` reads back from
    /// [`segments`](Self::segments) as several keys. Records whose keys are
    /// empty or dotted cannot be addressed unambiguously by path.
    pub fn child(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{}", self.0, key))
        }
    }

    /// The path as a dotted string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The keys along this path, outermost first. Empty for the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    /// The last key, if any.
    pub fn leaf_key(&self) -> Option<&str> {
        self.segments().last()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldPath({:?})", self.0)
    }
}

impl FromStr for FieldPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        if !s.is_empty() && s.split('.').any(str::is_empty) {
            return Err(CoreError::InvalidPath(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for FieldPath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FieldPath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_paths() {
        let root = FieldPath::root();
        assert!(root.is_root());

        let profile = root.child("profile");
        assert_eq!(profile, "profile");

        let bio = profile.child("bio");
        assert_eq!(bio.as_str(), "profile.bio");
        assert_eq!(bio.leaf_key(), Some("bio"));
    }

    #[test]
    fn test_segments() {
        let path: FieldPath = "a.b.c".parse().unwrap();
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(FieldPath::root().segments().count(), 0);
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!("a..b".parse::<FieldPath>().is_err());
        assert!(".a".parse::<FieldPath>().is_err());
        assert!("a.".parse::<FieldPath>().is_err());
        assert!("".parse::<FieldPath>().unwrap().is_root());
    }

    #[test]
    fn test_serde_transparent() {
        let path = FieldPath::root().child("name");
        assert_eq!(serde_json::to_string(&path).unwrap(), r#""name""#);
    }

    #[test]
    fn test_child_does_not_escape_keys() {
        let root = FieldPath::root();
        assert!(root.child("").is_root());

        let dotted = root.child("a.b");
        assert_eq!(dotted.segments().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(dotted, root.child("a").child("b"));
    }
}
