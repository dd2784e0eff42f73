//! Permission codec.
//!
//! A field's access is a set drawn from four operations. Internally the set is
//! a 4-bit [`PermissionSet`]; at configuration and wire boundaries it is written
//! either as a list of names (`["create", "read"]`) or as a [`Shorthand`]
//! string (`"CR"`). Shorthand letters are always emitted in the fixed order
//! `C`, `R`, `U`, `D`, whatever order they were parsed in.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// One of the four field operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Create,
    Read,
    Update,
    Delete,
}

impl Permission {
    /// All permissions in canonical order.
    pub const ALL: [Permission; 4] = [
        Permission::Create,
        Permission::Read,
        Permission::Update,
        Permission::Delete,
    ];

    /// The shorthand letter reserved for this permission.
    pub const fn letter(self) -> char {
        match self {
            Permission::Create => 'C',
            Permission::Read => 'R',
            Permission::Update => 'U',
            Permission::Delete => 'D',
        }
    }

    /// Decode a single shorthand letter.
    pub const fn from_letter(c: char) -> Option<Self> {
        match c {
            'C' => Some(Permission::Create),
            'R' => Some(Permission::Read),
            'U' => Some(Permission::Update),
            'D' => Some(Permission::Delete),
            _ => None,
        }
    }

    /// The lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Permission::Create => "create",
            Permission::Read => "read",
            Permission::Update => "update",
            Permission::Delete => "delete",
        }
    }

    const fn flag(self) -> PermissionSet {
        match self {
            Permission::Create => PermissionSet::CREATE,
            Permission::Read => PermissionSet::READ,
            Permission::Update => PermissionSet::UPDATE,
            Permission::Delete => PermissionSet::DELETE,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::UnknownPermission(s.to_string()))
    }
}

bitflags! {
    /// A set of [`Permission`]s packed into four bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PermissionSet: u8 {
        const CREATE = 0b0001;
        const READ   = 0b0010;
        const UPDATE = 0b0100;
        const DELETE = 0b1000;
    }
}

impl PermissionSet {
    /// No access.
    pub const NONE: Self = Self::empty();

    /// Full create/read/update/delete access.
    pub const CRUD: Self = Self::all();

    /// Check whether a single permission is present.
    pub fn allows(&self, permission: Permission) -> bool {
        self.contains(permission.flag())
    }

    /// Add a single permission.
    pub fn grant(&mut self, permission: Permission) {
        self.insert(permission.flag());
    }

    /// Iterate the contained permissions in canonical order.
    pub fn permissions(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.into_iter().filter(|p| self.allows(*p))
    }

    /// Collect the contained permissions in canonical order.
    pub fn to_vec(&self) -> Vec<Permission> {
        self.permissions().collect()
    }

    /// Encode as shorthand.
    pub fn to_shorthand(self) -> Shorthand {
        Shorthand(self)
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        PermissionSet::NONE
    }
}

impl From<Permission> for PermissionSet {
    fn from(permission: Permission) -> Self {
        permission.flag()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter()
            .fold(PermissionSet::NONE, |set, p| set | p.flag())
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.bits().count_ones() as usize))?;
        for permission in self.permissions() {
            seq.serialize_element(&permission)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = PermissionSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of permission names")
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<PermissionSet, A::Error> {
                let mut set = PermissionSet::NONE;
                while let Some(permission) = seq.next_element::<Permission>()? {
                    set.grant(permission);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(SetVisitor)
    }
}

/// Compact string encoding of a [`PermissionSet`].
///
/// Only membership is meaningful: `"RC"`, `"CR"` and `"CRC"` all parse to
/// the same value, which displays as `"CR"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shorthand(PermissionSet);

impl Shorthand {
    /// The empty shorthand `""`.
    pub const EMPTY: Self = Self(PermissionSet::NONE);

    /// The full shorthand `"CRUD"`.
    pub const CRUD: Self = Self(PermissionSet::CRUD);

    /// Wrap a permission set.
    pub const fn new(set: PermissionSet) -> Self {
        Self(set)
    }

    /// Parse a shorthand string, rejecting unknown letters.
    pub fn parse(input: &str) -> Result<Self> {
        parse_shorthand(input).map(Self)
    }

    /// The decoded permission set.
    pub const fn permissions(&self) -> PermissionSet {
        self.0
    }

    /// Whether this grants nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a single permission is granted.
    pub fn allows(&self, permission: Permission) -> bool {
        self.0.allows(permission)
    }
}

impl fmt::Display for Shorthand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for permission in self.0.permissions() {
            write!(f, "{}", permission.letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Shorthand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shorthand({:?})", self.to_string())
    }
}

impl FromStr for Shorthand {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Shorthand {
    type Error = CoreError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<PermissionSet> for Shorthand {
    fn from(set: PermissionSet) -> Self {
        Self(set)
    }
}

impl From<Shorthand> for PermissionSet {
    fn from(shorthand: Shorthand) -> Self {
        shorthand.0
    }
}

impl Serialize for Shorthand {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Shorthand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Shorthand::parse(&s).map_err(de::Error::custom)
    }
}

/// Permissions as configured for a role: either an explicit set or a shorthand.
///
/// Deserializes from a JSON list of names or from a shorthand string and keeps
/// whichever form it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionSpec {
    Set(PermissionSet),
    Shorthand(Shorthand),
}

impl PermissionSpec {
    /// Decode to a permission set.
    pub fn expand(&self) -> PermissionSet {
        expand(self)
    }

    /// Normalize to shorthand.
    pub fn to_shorthand(&self) -> Shorthand {
        self.expand().to_shorthand()
    }
}

impl From<PermissionSet> for PermissionSpec {
    fn from(set: PermissionSet) -> Self {
        PermissionSpec::Set(set)
    }
}

impl From<Shorthand> for PermissionSpec {
    fn from(shorthand: Shorthand) -> Self {
        PermissionSpec::Shorthand(shorthand)
    }
}

impl From<Permission> for PermissionSpec {
    fn from(permission: Permission) -> Self {
        PermissionSpec::Set(permission.into())
    }
}

impl FromStr for PermissionSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Shorthand::parse(s).map(PermissionSpec::Shorthand)
    }
}

/// Encode a permission set as shorthand.
pub fn to_shorthand(permissions: PermissionSet) -> Shorthand {
    permissions.to_shorthand()
}

/// Decode a shorthand string.
///
/// Letters may appear in any order and more than once. Any character outside
/// `C`, `R`, `U`, `D` is a configuration error.
pub fn parse_shorthand(input: &str) -> Result<PermissionSet> {
    let mut set = PermissionSet::NONE;
    for c in input.chars() {
        let permission = Permission::from_letter(c).ok_or_else(|| CoreError::InvalidShorthand {
            input: input.to_string(),
            found: c,
        })?;
        set.grant(permission);
    }
    Ok(set)
}

/// Decode either representation to a permission set. A set is returned as is.
pub fn expand(spec: &PermissionSpec) -> PermissionSet {
    match spec {
        PermissionSpec::Set(set) => *set,
        PermissionSpec::Shorthand(shorthand) => shorthand.permissions(),
    }
}

/// Union of every input. Merging nothing yields the empty shorthand.
pub fn merge<I>(shorthands: I) -> Shorthand
where
    I: IntoIterator<Item = Shorthand>,
{
    Shorthand(
        shorthands
            .into_iter()
            .fold(PermissionSet::NONE, |acc, s| acc | s.0),
    )
}
