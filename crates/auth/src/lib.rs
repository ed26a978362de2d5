//! `storefront-auth` — token verification and RBAC policy (no HTTP, no storage).
//!
//! The API crate wires these pieces into request middleware.

pub mod authorize;
pub mod claims;
pub mod credentials;
pub mod permissions;
pub mod policy;
pub mod principal;
pub mod roles;
pub mod secret;
pub mod verifier;

pub use authorize::{
    authorize_permission, authorize_role, explain_permission, AuthorizationExplanation, AuthzError,
};
pub use claims::IdentityClaim;
pub use credentials::{CredentialStore, CredentialStoreError, InMemoryCredentialStore, UserRecord};
pub use permissions::{Permission, PermissionSet};
pub use policy::{PolicyTable, StaticPolicyTable, StaticPolicyTableBuilder};
pub use principal::UserId;
pub use roles::{Role, UnknownRole};
pub use secret::{SecretProvider, StaticSecret};
pub use verifier::{Hs256Verifier, TokenVerifier, VerifyError};
