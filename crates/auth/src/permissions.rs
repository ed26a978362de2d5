use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque string tags (e.g. "read", "delete"). There is no
/// wildcard: a role holds exactly the tags its policy entry lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const READ: Permission = Permission(Cow::Borrowed("read"));
    pub const WRITE: Permission = Permission(Cow::Borrowed("write"));
    pub const DELETE: Permission = Permission(Cow::Borrowed("delete"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The (possibly empty) set of permissions a role holds.
pub type PermissionSet = BTreeSet<Permission>;
