//! Role and permission checks against a bound identity.
//!
//! No IO and no panics: every outcome is `Ok(())` or an [`AuthzError`].

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::{IdentityClaim, Permission, PolicyTable, Role, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no identity bound to the request")]
    MissingIdentity,

    #[error("forbidden: role '{0}' is not allowed")]
    RoleNotAllowed(Role),

    #[error("forbidden: role '{role}' lacks permission '{permission}'")]
    MissingPermission { role: Role, permission: Permission },
}

/// Allow the request only if the bound role is one of `allowed`.
pub fn authorize_role(
    claim: Option<&IdentityClaim>,
    allowed: &BTreeSet<Role>,
) -> Result<(), AuthzError> {
    let claim = claim.ok_or(AuthzError::MissingIdentity)?;

    if allowed.contains(&claim.role) {
        Ok(())
    } else {
        Err(AuthzError::RoleNotAllowed(claim.role))
    }
}

/// Allow the request only if the policy grants `required` to the bound role.
pub fn authorize_permission<P>(
    claim: Option<&IdentityClaim>,
    policy: &P,
    required: &Permission,
) -> Result<(), AuthzError>
where
    P: PolicyTable + ?Sized,
{
    let claim = claim.ok_or(AuthzError::MissingIdentity)?;

    if policy.grants(claim.role, required) {
        Ok(())
    } else {
        Err(AuthzError::MissingPermission {
            role: claim.role,
            permission: required.clone(),
        })
    }
}

/// Audit view of a permission decision ("why was this denied?").
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub user_id: UserId,
    pub role: Role,
    pub required_permission: Permission,
    pub granted: bool,
    pub reason: String,
    /// Sorted.
    pub effective_permissions: Vec<Permission>,
}

pub fn explain_permission<P>(
    claim: &IdentityClaim,
    policy: &P,
    required: &Permission,
) -> AuthorizationExplanation
where
    P: PolicyTable + ?Sized,
{
    let effective = policy.permissions_of(claim.role);
    let granted = effective.contains(required);

    let reason = if granted {
        format!("role '{}' grants '{}'", claim.role, required)
    } else if effective.is_empty() {
        format!("role '{}' holds no permissions", claim.role)
    } else {
        format!("role '{}' does not grant '{}'", claim.role, required)
    };

    AuthorizationExplanation {
        user_id: claim.id.clone(),
        role: claim.role,
        required_permission: required.clone(),
        granted,
        reason,
        effective_permissions: effective.into_iter().collect(),
    }
}
