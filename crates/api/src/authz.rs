//! Role and permission gates.
//!
//! Both run after [`crate::middleware::authenticate`] and only read the bound
//! [`Identity`](crate::context::Identity). Layering several gates on a route
//! requires all of them to pass.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{extract::State, middleware::Next, response::Response};

use storefront_auth::{authorize_permission, authorize_role, Permission, PolicyTable, Role};

use crate::app::errors::AuthRejection;
use crate::context::Identity;

type Request = axum::http::Request<axum::body::Body>;

/// State for [`require_role`].
#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Arc<BTreeSet<Role>>,
}

impl RoleGate {
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: Arc::new(allowed.into_iter().collect()),
        }
    }
}

/// State for [`require_permission`].
#[derive(Clone)]
pub struct PermissionGate {
    required: Permission,
    policy: Arc<dyn PolicyTable>,
}

impl PermissionGate {
    pub fn new(required: Permission, policy: Arc<dyn PolicyTable>) -> Self {
        Self { required, policy }
    }
}

pub async fn require_role(
    State(gate): State<RoleGate>,
    req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let claim = Identity::from_extensions(req.extensions());

    authorize_role(claim, &gate.allowed).map_err(|e| {
        tracing::warn!(
            path = %req.uri().path(),
            user_id = ?claim.map(|c| c.id.as_str()),
            allowed = ?gate.allowed,
            reason = %e,
            "role gate denied"
        );
        AuthRejection::Forbidden(e)
    })?;

    Ok(next.run(req).await)
}

pub async fn require_permission(
    State(gate): State<PermissionGate>,
    req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let claim = Identity::from_extensions(req.extensions());

    authorize_permission(claim, gate.policy.as_ref(), &gate.required).map_err(|e| {
        tracing::warn!(
            path = %req.uri().path(),
            user_id = ?claim.map(|c| c.id.as_str()),
            required = %gate.required,
            reason = %e,
            "permission gate denied"
        );
        AuthRejection::Forbidden(e)
    })?;

    Ok(next.run(req).await)
}
