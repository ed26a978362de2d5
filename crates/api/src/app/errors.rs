use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use storefront_auth::{AuthzError, VerifyError};

/// Terminal outcome of the auth chain.
///
/// Rendered as a bare status code: 401 when no usable credential was offered,
/// 403 for everything else. The inner errors are for logs only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("no bearer credential presented")]
    Unauthenticated,

    #[error("bearer token rejected: {0}")]
    InvalidToken(#[source] VerifyError),

    #[error(transparent)]
    Forbidden(#[from] AuthzError),
}

impl AuthRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthRejection::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthRejection::InvalidToken(_) | AuthRejection::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
