use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use storefront_auth::TokenVerifier;

use crate::app::errors::AuthRejection;
use crate::context::Identity;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AuthState {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }
}

/// Verify the bearer token and bind the caller's [`Identity`].
///
/// 401 when no `Bearer <token>` credential is offered (the verifier is not
/// consulted), 403 when the token fails verification.
pub async fn authenticate(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = extract_bearer(req.headers()).inspect_err(|_| {
        tracing::warn!(path = %req.uri().path(), "no bearer credential");
    })?;

    let claim = state.verifier.verify(token, Utc::now()).map_err(|e| {
        tracing::warn!(path = %req.uri().path(), reason = %e, "bearer token rejected");
        AuthRejection::InvalidToken(e)
    })?;

    tracing::debug!(user_id = %claim.id, role = %claim.role, "identity bound");
    if !Identity::bind(req.extensions_mut(), claim) {
        tracing::debug!("identity already bound; keeping the first");
    }

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthRejection::Unauthenticated)?;

    let header = header
        .to_str()
        .map_err(|_| AuthRejection::Unauthenticated)?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or(AuthRejection::Unauthenticated)?;
    if scheme != "Bearer" {
        return Err(AuthRejection::Unauthenticated);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthRejection::Unauthenticated);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        body::Body,
        http::{HeaderValue, Request, StatusCode},
        routing::get,
        Router,
    };
    use storefront_auth::{IdentityClaim, Role, VerifyError};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support;

    /// Counts calls into the real verifier.
    struct CountingVerifier {
        inner: Arc<dyn TokenVerifier>,
        calls: AtomicUsize,
    }

    impl TokenVerifier for CountingVerifier {
        fn verify(
            &self,
            token: &str,
            now: chrono::DateTime<Utc>,
        ) -> Result<IdentityClaim, VerifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.verify(token, now)
        }
    }

    struct Harness {
        app: Router,
        verifier: Arc<CountingVerifier>,
        hits: Arc<AtomicUsize>,
    }

    fn harness() -> Harness {
        let verifier = Arc::new(CountingVerifier {
            inner: test_support::verifier(),
            calls: AtomicUsize::new(0),
        });
        let hits = Arc::new(AtomicUsize::new(0));

        let handler_hits = hits.clone();
        let app = Router::new()
            .route(
                "/protected",
                get(move |identity: Identity| {
                    let hits = handler_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        format!("{}:{}", identity.id(), identity.role())
                    }
                }),
            )
            .route_layer(axum::middleware::from_fn_with_state(
                AuthState::new(verifier.clone()),
                authenticate,
            ));

        Harness { app, verifier, hits }
    }

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_string(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_401_without_verification() {
        let h = harness();

        let res = h.app.oneshot(request(None)).await.unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(h.verifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.hits.load(Ordering::SeqCst), 0);
        assert!(body_string(res).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_header_is_401() {
        for value in ["InvalidFormat", "Bearer", "Bearer ", "Basic dXNlcjpwdw==", "bearer abc"] {
            let h = harness();

            let res = h.app.oneshot(request(Some(value))).await.unwrap();

            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "header {value:?}");
            assert_eq!(h.verifier.calls.load(Ordering::SeqCst), 0);
            assert_eq!(h.hits.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn non_ascii_header_is_401_without_verification() {
        let h = harness();
        let mut req = request(None);
        req.headers_mut().insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff").unwrap(),
        );

        let res = h.app.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(h.verifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_token_is_403_and_next_not_called() {
        let cases = [
            "Bearer invalid-token".to_string(),
            format!("Bearer {}", test_support::token_with_secret("wrong", "u1", Role::Admin, 600)),
            format!("Bearer {}", test_support::token("u1", Role::Admin, -10)),
        ];

        for value in cases {
            let h = harness();

            let res = h.app.oneshot(request(Some(&value))).await.unwrap();

            assert_eq!(res.status(), StatusCode::FORBIDDEN, "header {value:?}");
            assert_eq!(h.verifier.calls.load(Ordering::SeqCst), 1);
            assert_eq!(h.hits.load(Ordering::SeqCst), 0);
            assert!(body_string(res).await.is_empty());
        }
    }

    #[tokio::test]
    async fn valid_token_binds_identity_and_calls_next_once() {
        let h = harness();
        let token = test_support::token("user123", Role::Admin, 600);

        let res = h
            .app
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(h.hits.load(Ordering::SeqCst), 1);
        assert_eq!(h.verifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(body_string(res).await, "user123:admin");
    }

    #[tokio::test]
    async fn extra_whitespace_around_token_is_tolerated() {
        let h = harness();
        let token = test_support::token("u2", Role::User, 600);

        let res = h
            .app
            .oneshot(request(Some(&format!("Bearer   {token} "))))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), Err(AuthRejection::Unauthenticated));

        headers.insert(AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Ok("abc.def"));
    }

    #[test]
    fn second_bind_keeps_first_identity() {
        let mut extensions = axum::http::Extensions::new();
        let first = test_support::claim("first", Role::Admin);
        let second = test_support::claim("second", Role::Guest);

        assert!(Identity::bind(&mut extensions, first.clone()));
        assert!(!Identity::bind(&mut extensions, second));
        assert_eq!(Identity::from_extensions(&extensions), Some(&first));
    }
}
