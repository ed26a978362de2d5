//! Token minting for unit tests.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;

use storefront_auth::{
    Hs256Verifier, IdentityClaim, Role, StaticSecret, TokenVerifier, UserId,
};

pub const SECRET: &str = "test-secret";

pub fn verifier() -> Arc<dyn TokenVerifier> {
    Arc::new(Hs256Verifier::new(StaticSecret::new(SECRET)))
}

/// Token signed with [`SECRET`], expiring `ttl_secs` from now (negative = already expired).
pub fn token(id: &str, role: Role, ttl_secs: i64) -> String {
    token_with_secret(SECRET, id, role, ttl_secs)
}

pub fn token_with_secret(secret: &str, id: &str, role: Role, ttl_secs: i64) -> String {
    let now = Utc::now().timestamp();
    jsonwebtoken::encode(
        &Header::default(),
        &json!({ "id": id, "role": role.as_str(), "iat": now, "exp": now + ttl_secs }),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

pub fn claim(id: &str, role: Role) -> IdentityClaim {
    IdentityClaim {
        id: UserId::new(id),
        role,
        issued_at: None,
        expires_at: Utc::now() + Duration::minutes(10),
    }
}
