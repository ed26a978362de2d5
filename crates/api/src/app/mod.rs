//! HTTP API application wiring (Axum router + shared state).
//!
//! - `routes/`: HTTP handlers (one file per area)
//! - `errors.rs`: auth rejections and JSON error bodies

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};

use storefront_auth::{
    CredentialStore, Hs256Verifier, Permission, PolicyTable, Role, StaticPolicyTable,
    StaticSecret, TokenVerifier,
};

use crate::authz::{self, PermissionGate, RoleGate};
use crate::config::ApiConfig;
use crate::middleware::{self, AuthState};

pub mod errors;
pub mod routes;

/// Process-wide collaborators; read-only once the router is built.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub policy: Arc<dyn PolicyTable>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        policy: Arc<dyn PolicyTable>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            verifier,
            policy,
            credentials,
        }
    }

    /// HS256 verifier over the configured secret and the default policy table.
    pub fn from_config(config: &ApiConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        let verifier = Hs256Verifier::new(StaticSecret::new(config.jwt_secret.clone()))
            .with_leeway(config.jwt_leeway_secs);

        Self::new(
            Arc::new(verifier),
            Arc::new(StaticPolicyTable::default()),
            credentials,
        )
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: AppState) -> Router {
    let auth_state = AuthState::new(state.verifier.clone());

    let admin = Router::new()
        .route("/rbac/roles", get(routes::rbac::list_roles))
        .route(
            "/rbac/roles/:name",
            get(routes::rbac::get_role).route_layer(from_fn_with_state(
                PermissionGate::new(Permission::READ, state.policy.clone()),
                authz::require_permission,
            )),
        )
        .route_layer(from_fn_with_state(
            RoleGate::new([Role::Admin]),
            authz::require_role,
        ));

    // Protected routes: identity must be bound before any gate runs.
    let protected = Router::new()
        .route("/whoami", get(routes::system::whoami))
        .route("/me", get(routes::system::me))
        .route("/rbac/explain", get(routes::rbac::explain))
        .nest("/admin", admin)
        .route_layer(from_fn_with_state(auth_state, middleware::authenticate));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .with_state(state)
}
