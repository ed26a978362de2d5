use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, Extensions},
};

use storefront_auth::{IdentityClaim, Role, UserId};

use crate::app::errors::AuthRejection;

/// Identity bound to a request by [`crate::middleware::authenticate`].
///
/// Lives in the request extensions; written once, read by the RBAC gates and
/// by handlers (as an extractor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    claim: IdentityClaim,
}

impl Identity {
    pub fn claim(&self) -> &IdentityClaim {
        &self.claim
    }

    pub fn id(&self) -> &UserId {
        &self.claim.id
    }

    pub fn role(&self) -> Role {
        self.claim.role
    }

    /// Bind `claim` unless an identity is already present.
    ///
    /// Returns `false` (leaving the existing identity untouched) on a second bind.
    pub(crate) fn bind(extensions: &mut Extensions, claim: IdentityClaim) -> bool {
        if extensions.get::<Identity>().is_some() {
            return false;
        }
        extensions.insert(Identity { claim });
        true
    }

    pub(crate) fn from_extensions(extensions: &Extensions) -> Option<&IdentityClaim> {
        extensions.get::<Identity>().map(Identity::claim)
    }
}

/// Handlers reached without an authentication layer see `401`.
#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthRejection::Unauthenticated)
    }
}
