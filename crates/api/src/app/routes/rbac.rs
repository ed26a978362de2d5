//! RBAC audit endpoints ("why was this request denied?").

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use storefront_auth::{explain_permission, Permission, Role};

use crate::app::{errors::json_error, AppState};
use crate::context::Identity;

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub permission: String,
}

#[derive(Debug, Serialize)]
pub struct RoleView {
    pub name: Role,
    pub permissions: Vec<Permission>,
}

fn role_view(state: &AppState, role: Role) -> RoleView {
    RoleView {
        name: role,
        permissions: state.policy.permissions_of(role).into_iter().collect(),
    }
}

/// GET /rbac/explain?permission=... - would the caller's role grant `permission`?
pub async fn explain(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ExplainQuery>,
) -> impl IntoResponse {
    let required = Permission::new(query.permission);
    Json(explain_permission(identity.claim(), state.policy.as_ref(), &required))
}

/// GET /admin/rbac/roles - every role with its permissions.
pub async fn list_roles(State(state): State<AppState>) -> impl IntoResponse {
    let roles: Vec<RoleView> = Role::ALL
        .into_iter()
        .map(|role| role_view(&state, role))
        .collect();

    Json(serde_json::json!({ "roles": roles }))
}

/// GET /admin/rbac/roles/:name
pub async fn get_role(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match name.parse::<Role>() {
        Ok(role) => Json(role_view(&state, role)).into_response(),
        Err(e) => json_error(StatusCode::NOT_FOUND, "not_found", e.to_string()),
    }
}
