//! Bearer token verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::claims::WireClaims;
use crate::{IdentityClaim, Role, SecretProvider, UserId};

/// Why a presented token was rejected.
///
/// Callers treat every variant the same way (the request is refused); the
/// distinction exists for logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed: {0}")]
    Malformed(String),
}

impl VerifyError {
    fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Pluggable token backend.
///
/// Implementations must be pure: the same `(token, now)` always yields the same
/// outcome for a given key configuration.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaim, VerifyError>;
}

/// HS256 JWT verifier backed by a shared secret.
///
/// Checks run in a fixed order: signature, then expiry, then claim structure.
pub struct Hs256Verifier<P> {
    secrets: P,
    validation: Validation,
    leeway_secs: i64,
}

impl<P: SecretProvider> Hs256Verifier<P> {
    pub fn new(secrets: P) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller-supplied clock below.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            secrets,
            validation,
            leeway_secs: 0,
        }
    }

    /// Accept tokens up to `secs` seconds past their `exp`.
    pub fn with_leeway(mut self, secs: u64) -> Self {
        self.leeway_secs = i64::try_from(secs).unwrap_or(i64::MAX);
        self
    }

    fn decode(&self, token: &str) -> Result<WireClaims, VerifyError> {
        let key = DecodingKey::from_secret(self.secrets.secret());
        jsonwebtoken::decode::<WireClaims>(token, &key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::InvalidKeyFormat => VerifyError::InvalidSignature,
                _ => VerifyError::malformed(e.to_string()),
            })
    }
}

impl<P: SecretProvider> TokenVerifier for Hs256Verifier<P> {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaim, VerifyError> {
        let wire = self.decode(token)?;

        let exp = wire
            .exp
            .ok_or_else(|| VerifyError::malformed("missing exp claim"))?;
        if now.timestamp() >= exp.saturating_add(self.leeway_secs) {
            return Err(VerifyError::Expired);
        }
        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| VerifyError::malformed("exp out of range"))?;

        let issued_at = match wire.iat {
            Some(iat) => Some(
                DateTime::from_timestamp(iat, 0)
                    .ok_or_else(|| VerifyError::malformed("iat out of range"))?,
            ),
            None => None,
        };

        let non_blank = |id: &String| !id.trim().is_empty();
        let id = wire
            .id
            .filter(non_blank)
            .or(wire.sub.filter(non_blank))
            .ok_or_else(|| VerifyError::malformed("missing subject id"))?;

        let role = wire
            .role
            .ok_or_else(|| VerifyError::malformed("missing role"))?
            .parse::<Role>()
            .map_err(|e| VerifyError::malformed(e.to_string()))?;

        Ok(IdentityClaim {
            id: UserId::new(id),
            role,
            issued_at,
            expires_at,
        })
    }
}
