use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Role, UserId};

/// Verified identity extracted from a bearer token.
///
/// Produced only by a [`crate::TokenVerifier`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityClaim {
    /// Subject / user identifier.
    pub id: UserId,

    pub role: Role,

    /// Issued-at timestamp, when the token carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// JWT payload as it appears on the wire, before structural checks.
///
/// Every field is optional so that missing claims surface as
/// [`crate::VerifyError::Malformed`] instead of a generic decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Standard subject claim; used when `id` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}
