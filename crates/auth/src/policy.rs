//! Role -> permission policy.

use std::collections::HashMap;

use crate::{Permission, PermissionSet, Role};

/// Read-only mapping from role to granted permissions.
///
/// `permissions_of` is total: a role without an entry holds nothing.
pub trait PolicyTable: Send + Sync {
    fn permissions_of(&self, role: Role) -> PermissionSet;

    fn grants(&self, role: Role, permission: &Permission) -> bool {
        self.permissions_of(role).contains(permission)
    }
}

/// Policy table fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPolicyTable {
    entries: HashMap<Role, PermissionSet>,
}

impl StaticPolicyTable {
    pub fn builder() -> StaticPolicyTableBuilder {
        StaticPolicyTableBuilder::default()
    }

    /// Entries in [`Role::ALL`] order.
    pub fn entries(&self) -> impl Iterator<Item = (Role, PermissionSet)> + '_ {
        Role::ALL
            .into_iter()
            .map(|role| (role, self.permissions_of(role)))
    }
}

impl Default for StaticPolicyTable {
    fn default() -> Self {
        Self::builder()
            .grant(
                Role::Admin,
                [Permission::READ, Permission::WRITE, Permission::DELETE],
            )
            .grant(Role::User, [Permission::READ, Permission::WRITE])
            .grant(Role::Guest, [Permission::READ])
            .build()
    }
}

impl PolicyTable for StaticPolicyTable {
    fn permissions_of(&self, role: Role) -> PermissionSet {
        self.entries.get(&role).cloned().unwrap_or_default()
    }

    fn grants(&self, role: Role, permission: &Permission) -> bool {
        self.entries
            .get(&role)
            .is_some_and(|perms| perms.contains(permission))
    }
}

#[derive(Debug, Default)]
pub struct StaticPolicyTableBuilder {
    entries: HashMap<Role, PermissionSet>,
}

impl StaticPolicyTableBuilder {
    /// Add permissions to a role (cumulative across calls).
    pub fn grant(mut self, role: Role, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.entries.entry(role).or_default().extend(permissions);
        self
    }

    /// Roles never granted anything get an explicit empty entry.
    pub fn build(mut self) -> StaticPolicyTable {
        for role in Role::ALL {
            self.entries.entry(role).or_default();
        }
        StaticPolicyTable {
            entries: self.entries,
        }
    }
}
