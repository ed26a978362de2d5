//! Environment-driven configuration.

use std::net::SocketAddr;

use thiserror::Error;

const DEV_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET is set but empty")]
    EmptySecret,

    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Seconds a token is still accepted past its `exp`.
    pub jwt_leeway_secs: u64,
}

impl ApiConfig {
    /// Read `JWT_SECRET`, `BIND_ADDR` and `JWT_LEEWAY_SECS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if secret.is_empty() => return Err(ConfigError::EmptySecret),
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_SECRET.to_string()
            }
        };

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: raw,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let jwt_leeway_secs = match lookup("JWT_LEEWAY_SECS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "JWT_LEEWAY_SECS",
                value: raw,
            })?,
            None => 0,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            jwt_leeway_secs,
        })
    }
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_leeway_secs", &self.jwt_leeway_secs)
            .finish()
    }
}
