use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::app::{errors::json_error, AppState};
use crate::context::Identity;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The identity bound from the token, without touching the credential store.
pub async fn whoami(identity: Identity) -> impl IntoResponse {
    Json(serde_json::json!({
        "id": identity.id(),
        "role": identity.role(),
        "expires_at": identity.claim().expires_at,
    }))
}

/// Fresh user record for the caller.
pub async fn me(State(state): State<AppState>, identity: Identity) -> Response {
    match state.credentials.find_by_id(identity.id()).await {
        Ok(Some(user)) => Json(user).into_response(),
        Ok(None) => {
            tracing::info!(user_id = %identity.id(), "token subject no longer exists");
            json_error(StatusCode::NOT_FOUND, "not_found", "user not found")
        }
        Err(e) => {
            tracing::error!(user_id = %identity.id(), error = %e, "credential lookup failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "credential_store_error",
                e.to_string(),
            )
        }
    }
}
