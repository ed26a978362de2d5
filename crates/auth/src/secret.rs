/// Source of the shared HS256 signing secret.
///
/// Injected into the verifier so tests (and key rotation) can substitute
/// their own provider instead of reading process globals.
pub trait SecretProvider: Send + Sync {
    fn secret(&self) -> &[u8];
}

/// A secret fixed at construction time.
#[derive(Clone)]
pub struct StaticSecret(Vec<u8>);

impl StaticSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }
}

impl SecretProvider for StaticSecret {
    fn secret(&self) -> &[u8] {
        &self.0
    }
}

// Never print key material.
impl core::fmt::Debug for StaticSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("StaticSecret").field(&"<redacted>").finish()
    }
}
